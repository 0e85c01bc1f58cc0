use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::domain::money::Currency;

/// 门店扫码收银的平台侧渠道标识。入口票据一律锁定为该值。
pub const PLATFORM_CHANNEL_STORE_SCAN: &str = "store-scan";

/// 订单状态机。
///
/// CREATED 为所有订单的初态; PAYING 为保留中间态, 本版本没有任何
/// 操作会写入; SUCCESS / CLOSED / FAILED 为终态。数字编码随订单
/// 落库并出现在渠道回调中, 不得变更。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeState {
    #[strum(serialize = "CREATED")]
    Created,
    #[strum(serialize = "PAYING")]
    Paying,
    #[strum(serialize = "SUCCESS")]
    Success,
    #[strum(serialize = "CLOSED")]
    Closed,
    #[strum(serialize = "FAILED")]
    Failed,
}

impl TradeState {
    pub fn code(&self) -> i16 {
        match self {
            TradeState::Created => 0,
            TradeState::Paying => 1,
            TradeState::Success => 2,
            TradeState::Closed => 4,
            TradeState::Failed => 5,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(TradeState::Created),
            1 => Some(TradeState::Paying),
            2 => Some(TradeState::Success),
            4 => Some(TradeState::Closed),
            5 => Some(TradeState::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TradeState::Success | TradeState::Closed | TradeState::Failed
        )
    }

    /// 状态机允许的前向迁移。渠道回调不强制校验该表,
    /// 仅用于识别乱序上报并记录告警。
    pub fn can_transition_to(&self, next: TradeState) -> bool {
        // 同状态重放视为幂等, 始终允许
        if *self == next {
            return true;
        }
        match self {
            TradeState::Created => true,
            TradeState::Paying => next.is_terminal(),
            _ => false,
        }
    }
}

/// 支付渠道 (支付通道中的具体支付方式)。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayChannel {
    #[strum(serialize = "ALIPAY_WAP")]
    AlipayWap,
}

impl PayChannel {
    pub fn description(&self) -> &'static str {
        match self {
            PayChannel::AlipayWap => "支付宝手机网页支付",
        }
    }
}

/// 支付订单。交易号一经分配不再变更, 记录只增不删。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayOrder {
    pub trade_no: String,
    pub merchant_id: i64,
    pub app_id: String,
    pub store_id: i64,
    pub subject: String,
    pub body: String,
    /// 以分为单位。
    pub total_amount: i64,
    pub currency: Currency,
    pub trade_state: TradeState,
    pub pay_channel: PayChannel,
    /// 渠道侧交易流水号, 由渠道回调写入。
    pub pay_channel_trade_no: Option<String>,
    pub create_time: DateTime<Utc>,
    /// 自创建时刻起固定, 任何操作都不延长。
    pub expire_time: DateTime<Utc>,
    pub pay_success_time: Option<DateTime<Utc>>,
}

impl PayOrder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_no: String,
        merchant_id: i64,
        app_id: String,
        store_id: i64,
        subject: String,
        body: String,
        total_amount: i64,
        pay_channel: PayChannel,
        expire_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            trade_no,
            merchant_id,
            app_id,
            store_id,
            subject,
            body,
            total_amount,
            currency: Currency::CNY,
            trade_state: TradeState::Created,
            pay_channel,
            pay_channel_trade_no: None,
            create_time: now,
            expire_time: now + Duration::minutes(expire_minutes),
            pay_success_time: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.trade_state == TradeState::Success
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self.trade_state,
            TradeState::Closed | TradeState::Failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn sample_order() -> PayOrder {
        PayOrder::new(
            "628210023456789".to_string(),
            1234,
            "app-0001".to_string(),
            8001,
            "奶茶店收款".to_string(),
            "门店扫码点单".to_string(),
            10050,
            PayChannel::AlipayWap,
            30,
        )
    }

    #[test]
    fn test_state_codes_round_trip() {
        for state in TradeState::iter() {
            assert_eq!(TradeState::from_code(state.code()), Some(state));
        }
        assert_eq!(TradeState::from_code(3), None);
        assert_eq!(TradeState::from_code(99), None);
    }

    #[test]
    fn test_state_code_values() {
        assert_eq!(TradeState::Created.code(), 0);
        assert_eq!(TradeState::Paying.code(), 1);
        assert_eq!(TradeState::Success.code(), 2);
        assert_eq!(TradeState::Closed.code(), 4);
        assert_eq!(TradeState::Failed.code(), 5);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TradeState::Created.to_string(), "CREATED");
        assert_eq!(TradeState::Success.to_string(), "SUCCESS");
        assert_eq!(PayChannel::AlipayWap.to_string(), "ALIPAY_WAP");
    }

    #[test]
    fn test_transitions() {
        assert!(TradeState::Created.can_transition_to(TradeState::Paying));
        assert!(TradeState::Created.can_transition_to(TradeState::Success));
        assert!(TradeState::Created.can_transition_to(TradeState::Closed));
        assert!(TradeState::Created.can_transition_to(TradeState::Failed));
        assert!(TradeState::Paying.can_transition_to(TradeState::Success));

        // 终态只接受幂等重放
        assert!(TradeState::Success.can_transition_to(TradeState::Success));
        assert!(!TradeState::Success.can_transition_to(TradeState::Failed));
        assert!(!TradeState::Closed.can_transition_to(TradeState::Created));
        assert!(!TradeState::Paying.can_transition_to(TradeState::Created));
    }

    #[test]
    fn test_new_order_initial_shape() {
        let order = sample_order();
        assert_eq!(order.trade_state, TradeState::Created);
        assert_eq!(order.currency, Currency::CNY);
        assert!(order.pay_channel_trade_no.is_none());
        assert!(order.pay_success_time.is_none());
        assert_eq!(
            order.expire_time - order.create_time,
            Duration::minutes(30)
        );
        assert!(!order.is_paid());
        assert!(!order.is_closed());
    }

    #[test]
    fn test_pay_channel_from_str() {
        use std::str::FromStr;
        assert_eq!(
            PayChannel::from_str("ALIPAY_WAP").unwrap(),
            PayChannel::AlipayWap
        );
        assert!(PayChannel::from_str("WX_JSAPI").is_err());
    }
}
