use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::domain::order::PayChannel;

/// 渠道参数, 以 (app_id, platform_channel, pay_channel) 唯一确定。
///
/// 编排层只透传 `param`, 具体结构由渠道代理约定; 逐次查询, 不缓存。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelParam {
    pub app_id: String,
    pub platform_channel: String,
    pub pay_channel: PayChannel,
    pub param_name: String,
    pub param: serde_json::Value,
    pub create_time: DateTime<Utc>,
}

impl ChannelParam {
    /// 将不透明参数解析为结构化视图, 供需要具体字段的适配器使用。
    pub fn decode_param<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.param.clone())
    }
}
