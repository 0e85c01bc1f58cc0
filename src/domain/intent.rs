use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::TradeError;

/// 下单意图。仅在入口链接与订单提交之间短暂存在, 不落库。
///
/// 编码后的票据随 URL 流转, 字段名与渠道回跳报文保持 camelCase。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub merchant_id: i64,
    pub app_id: String,
    pub store_id: i64,
    pub subject: String,
    pub body: String,
    pub channel: String,
}

impl PaymentIntent {
    /// 编码为可随 URL 携带的不透明票据 (URL-safe base64, 无填充)。
    pub fn encode_token(&self) -> Result<String, TradeError> {
        let json = serde_json::to_vec(self)
            .map_err(|e| TradeError::InvalidParameter(format!("意图编码失败: {e}")))?;
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(json))
    }

    /// 从票据还原意图, 与 [`PaymentIntent::encode_token`] 互逆。
    pub fn decode_token(token: &str) -> Result<Self, TradeError> {
        let bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| TradeError::InvalidParameter(format!("票据解码失败: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| TradeError::InvalidParameter(format!("票据内容无效: {e}")))
    }
}
