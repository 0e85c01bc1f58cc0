use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::TradeError;
use crate::services::ownership::OwnershipService;

/// 商户服务 HTTP 客户端, 提供应用/门店归属断言。
///
/// 商户服务的任何异常 (HTTP 错误、信封错误码、应答缺失) 都按瞬时
/// 故障上抛, 归属校验绝不把"查不到"折算成 false。
pub struct HttpMerchantService {
    base_url: String,
    request_timeout: Duration,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct PredicateEnvelope {
    code: i32,
    message: Option<String>,
    data: Option<bool>,
}

impl HttpMerchantService {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout,
            client: Client::new(),
        }
    }

    async fn fetch_predicate(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<bool, TradeError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("request-id", Uuid::new_v4().to_string())
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TradeError::Transport(format!("商户服务返回 HTTP {status}")));
        }

        let envelope: PredicateEnvelope = response
            .json()
            .await
            .map_err(|e| TradeError::Transport(format!("商户服务应答解析失败: {e}")))?;

        if envelope.code != 0 {
            return Err(TradeError::Transport(
                envelope
                    .message
                    .unwrap_or_else(|| format!("商户服务返回错误码 {}", envelope.code)),
            ));
        }

        envelope
            .data
            .ok_or_else(|| TradeError::Transport("商户服务应答缺少数据".to_string()))
    }
}

#[async_trait]
impl OwnershipService for HttpMerchantService {
    async fn is_app_owned_by_merchant(
        &self,
        app_id: &str,
        merchant_id: i64,
    ) -> Result<bool, TradeError> {
        self.fetch_predicate(
            "/merchants/apps/ownership",
            &[
                ("appId", app_id.to_string()),
                ("merchantId", merchant_id.to_string()),
            ],
        )
        .await
    }

    async fn is_store_owned_by_merchant(
        &self,
        store_id: i64,
        merchant_id: i64,
    ) -> Result<bool, TradeError> {
        self.fetch_predicate(
            "/merchants/stores/ownership",
            &[
                ("storeId", store_id.to_string()),
                ("merchantId", merchant_id.to_string()),
            ],
        )
        .await
    }
}
