use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::channel::{AdapterResponse, ChannelAgentService, ChannelOrderPayload};
use crate::domain::channel_param::ChannelParam;
use crate::error::TradeError;

/// 渠道代理 HTTP 客户端。
///
/// 代理侧应答统一为 `{code, message, data}` 信封, code 为 0 表示成功。
/// 传输层故障 (不可达/超时) 与代理返回的业务失败分开上抛,
/// 前者可重试, 后者不可。
pub struct HttpChannelAgent {
    base_url: String,
    request_timeout: Duration,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct AgentEnvelope {
    code: i32,
    message: Option<String>,
    data: Option<AdapterResponse>,
}

impl HttpChannelAgent {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChannelAgentService for HttpChannelAgent {
    async fn create_order(
        &self,
        param: &ChannelParam,
        payload: &ChannelOrderPayload,
    ) -> Result<AdapterResponse, TradeError> {
        let url = format!("{}/agent/orders", self.base_url);

        // 组装代理请求: 渠道参数原样透传
        let body = serde_json::json!({
            "appId": param.app_id,
            "platformChannel": param.platform_channel,
            "payChannel": param.pay_channel,
            "param": param.param,
            "payload": payload,
        });

        debug!(trade_no = %payload.trade_no, url = %url, "calling channel agent");

        let response = self
            .client
            .post(&url)
            .header("request-id", Uuid::new_v4().to_string())
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TradeError::Adapter(format!("渠道代理返回 HTTP {status}")));
        }

        let envelope: AgentEnvelope = response
            .json()
            .await
            .map_err(|e| TradeError::Adapter(format!("渠道代理应答解析失败: {e}")))?;

        if envelope.code != 0 {
            return Err(TradeError::Adapter(
                envelope
                    .message
                    .unwrap_or_else(|| format!("渠道代理返回错误码 {}", envelope.code)),
            ));
        }

        envelope
            .data
            .ok_or_else(|| TradeError::Adapter("渠道代理应答缺少数据".to_string()))
    }
}
