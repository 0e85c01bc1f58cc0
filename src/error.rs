use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 交易服务统一业务错误。
///
/// 每个变体携带一个对外稳定的错误码, 已发布的取值不得变更;
/// 调用方依据错误码而不是错误消息做分支处理。
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("应用不属于当前商户")]
    AppNotOwned,

    #[error("门店不属于当前商户")]
    StoreNotOwned,

    #[error("订单金额转换异常: {0}")]
    AmountConversion(String),

    #[error("支付渠道参数未配置: {app_id}/{platform_channel}/{pay_channel}")]
    ChannelNotConfigured {
        app_id: String,
        platform_channel: String,
        pay_channel: String,
    },

    #[error("传入参数与接口不匹配: {0}")]
    InvalidParameter(String),

    #[error("查询结果为空: {0}")]
    OrderNotFound(String),

    #[error("提交数据异常: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("调用支付渠道代理服务异常: {0}")]
    Adapter(String),

    #[error("调用外部服务超时或不可达: {0}")]
    Transport(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl TradeError {
    /// 对外稳定的业务错误码。
    pub fn err_code(&self) -> u32 {
        match self {
            TradeError::AppNotOwned => 200005,
            TradeError::StoreNotOwned => 200006,
            TradeError::AmountConversion(_) => 300006,
            TradeError::ChannelNotConfigured { .. } => 300007,
            TradeError::InvalidParameter(_) => 100101,
            TradeError::OrderNotFound(_) => 100102,
            TradeError::Persistence(_) => 999994,
            TradeError::Adapter(_) => 999991,
            TradeError::Transport(_) => 999995,
            TradeError::Internal(_) => 999999,
        }
    }

    pub fn err_message(&self) -> String {
        self.to_string()
    }

    /// 瞬时故障可带退避重试, 业务错误不可。
    pub fn is_transient(&self) -> bool {
        matches!(self, TradeError::Transport(_))
    }
}

impl From<reqwest::Error> for TradeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TradeError::Transport(format!("请求超时: {err}"))
        } else {
            TradeError::Transport(err.to_string())
        }
    }
}

/// 返回给调用方的错误报文体。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub err_code: String,
    pub err_message: String,
}

impl From<&TradeError> for ErrorResponse {
    fn from(err: &TradeError) -> Self {
        Self {
            err_code: err.err_code().to_string(),
            err_message: err.err_message(),
        }
    }
}
