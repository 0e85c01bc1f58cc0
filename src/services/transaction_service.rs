use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::channel::{AdapterResponse, ChannelAgentService, ChannelOrderPayload};
use crate::config::TradeSettings;
use crate::domain::intent::PaymentIntent;
use crate::domain::money;
use crate::domain::order::{PayChannel, PayOrder, TradeState, PLATFORM_CHANNEL_STORE_SCAN};
use crate::error::TradeError;
use crate::repository::{ChannelParamRepository, OrderRepository};
use crate::services::ownership::{OwnershipService, OwnershipVerifier};
use crate::utils::trade_no::TradeNoGenerator;

/// 商户侧下单请求。金额以分为单位, 元转换由编排层负责。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub merchant_id: i64,
    pub app_id: String,
    pub store_id: i64,
    pub subject: String,
    pub body: String,
    /// 以分为单位。
    pub total_amount: i64,
    pub pay_channel: PayChannel,
}

/// 交易编排服务。
///
/// 串联归属校验、金额换算、订单落库、渠道参数解析与渠道代理下单。
/// 自身无状态, 所有协作方经 `Arc<dyn …>` 注入, 可按请求并发调用。
pub struct TransactionService {
    verifier: OwnershipVerifier,
    orders: Arc<dyn OrderRepository>,
    channel_params: Arc<dyn ChannelParamRepository>,
    agent: Arc<dyn ChannelAgentService>,
    trade_no: Arc<TradeNoGenerator>,
    entry_base_url: String,
    order_expire_minutes: i64,
}

impl TransactionService {
    pub fn new(
        ownership: Arc<dyn OwnershipService>,
        orders: Arc<dyn OrderRepository>,
        channel_params: Arc<dyn ChannelParamRepository>,
        agent: Arc<dyn ChannelAgentService>,
        trade_no: Arc<TradeNoGenerator>,
        settings: &TradeSettings,
    ) -> Self {
        Self {
            verifier: OwnershipVerifier::new(ownership),
            orders,
            channel_params,
            agent,
            trade_no,
            entry_base_url: settings.entry_base_url.clone(),
            order_expire_minutes: settings.order_expire_minutes,
        }
    }

    /// 生成门店收银入口地址。
    ///
    /// 校验归属后把意图编码为可随二维码携带的票据, 拼到入口基址上。
    /// 渠道字段一律锁定为门店扫码, 调用方传入的值不生效。
    /// 此处不产生任何订单记录, 订单在消费者确认金额提交时才创建。
    pub async fn build_entry_url(&self, intent: &PaymentIntent) -> Result<String, TradeError> {
        self.verifier
            .verify(intent.merchant_id, &intent.app_id, intent.store_id)
            .await?;

        let fixed = PaymentIntent {
            channel: PLATFORM_CHANNEL_STORE_SCAN.to_string(),
            ..intent.clone()
        };
        let token = fixed.encode_token()?;

        info!(
            merchant_id = intent.merchant_id,
            store_id = intent.store_id,
            "store entry url issued"
        );

        Ok(format!("{}{}", self.entry_base_url, token))
    }

    /// 还原入口票据携带的支付意图, 供落地流程使用。
    pub fn decode_entry_token(&self, token: &str) -> Result<PaymentIntent, TradeError> {
        PaymentIntent::decode_token(token)
    }

    /// 消费者确认金额后提交订单。
    ///
    /// 归属校验与金额换算都在落库之前, 二者任一失败不会产生订单;
    /// 订单一旦落库, 渠道参数缺失或代理调用失败都不回滚,
    /// 订单保持 CREATED, 可按交易号查询后重试或对账。
    pub async fn submit_order(
        &self,
        request: OrderRequest,
    ) -> Result<AdapterResponse, TradeError> {
        self.verifier
            .verify(request.merchant_id, &request.app_id, request.store_id)
            .await?;

        let amount_major = money::minor_to_major(request.total_amount)?;

        let trade_no = self.trade_no.next_trade_no();
        let order = PayOrder::new(
            trade_no.clone(),
            request.merchant_id,
            request.app_id.clone(),
            request.store_id,
            request.subject.clone(),
            request.body.clone(),
            request.total_amount,
            request.pay_channel,
            self.order_expire_minutes,
        );

        self.orders.insert(&order).await.map_err(|e| {
            error!(trade_no = %trade_no, error = %e, "failed to persist pay order");
            e
        })?;

        info!(
            trade_no = %trade_no,
            merchant_id = request.merchant_id,
            total_amount = request.total_amount,
            "pay order created"
        );

        let param = self
            .channel_params
            .find(&request.app_id, PLATFORM_CHANNEL_STORE_SCAN, request.pay_channel)
            .await?
            .ok_or_else(|| TradeError::ChannelNotConfigured {
                app_id: request.app_id.clone(),
                platform_channel: PLATFORM_CHANNEL_STORE_SCAN.to_string(),
                pay_channel: request.pay_channel.to_string(),
            })?;

        let payload = ChannelOrderPayload {
            trade_no: trade_no.clone(),
            amount_major,
            subject: request.subject,
            body: request.body,
            store_id: request.store_id,
            expire_time: order.expire_time,
        };

        self.agent.create_order(&param, &payload).await.map_err(|e| {
            warn!(
                trade_no = %trade_no,
                error = %e,
                "channel adapter call failed, order stays CREATED"
            );
            e
        })
    }

    /// 按交易号查询订单。
    pub async fn query_order(&self, trade_no: &str) -> Result<PayOrder, TradeError> {
        self.orders
            .find_by_trade_no(trade_no)
            .await?
            .ok_or_else(|| TradeError::OrderNotFound(trade_no.to_string()))
    }

    /// 接收渠道侧的状态上报。
    ///
    /// 渠道回调可能乱序、重复送达, 统一按最后写入生效;
    /// 越过状态机的跳转只告警留痕, 不拒绝。成功时间只在
    /// 首次成功上报时写入, 之后的重复上报不再改动。
    pub async fn report_status(
        &self,
        trade_no: &str,
        pay_channel_trade_no: &str,
        state: TradeState,
    ) -> Result<(), TradeError> {
        let current = self.query_order(trade_no).await?;

        if !current.trade_state.can_transition_to(state) {
            warn!(
                trade_no = %trade_no,
                from = %current.trade_state,
                to = %state,
                "out-of-order status report, applying last-write-wins"
            );
        }

        let pay_success_time = (state == TradeState::Success).then(Utc::now);

        let affected = self
            .orders
            .update_state(trade_no, state, pay_channel_trade_no, pay_success_time)
            .await?;

        if affected == 0 {
            // 预读已确认订单存在, 0 行变更即内容一致的重复上报。
            info!(trade_no = %trade_no, state = %state, "duplicate status report, nothing changed");
        } else {
            info!(trade_no = %trade_no, state = %state, "trade state updated");
        }

        Ok(())
    }
}
