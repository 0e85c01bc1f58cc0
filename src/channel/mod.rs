pub mod agent_client;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::channel_param::ChannelParam;
use crate::error::TradeError;

pub use agent_client::HttpChannelAgent;

/// 渠道下单载荷。金额为两位小数的元字符串, 由编排层完成分转元;
/// 过期时间与订单行的 expire_time 一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOrderPayload {
    pub trade_no: String,
    pub amount_major: String,
    pub subject: String,
    pub body: String,
    pub store_id: i64,
    pub expire_time: DateTime<Utc>,
}

/// 渠道代理的原始应答。`content` 为渠道方要求透传给客户端的
/// 跳转地址或表单内容, `raw` 保留代理返回的其余字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterResponse {
    pub content: String,
    #[serde(default)]
    pub raw: serde_json::Value,
}

/// 支付渠道代理契约。代理服务屏蔽各支付渠道的报文差异,
/// 编排层只透传渠道参数与统一载荷。
#[async_trait]
pub trait ChannelAgentService: Send + Sync {
    async fn create_order(
        &self,
        param: &ChannelParam,
        payload: &ChannelOrderPayload,
    ) -> Result<AdapterResponse, TradeError>;
}
