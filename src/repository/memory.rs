use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::channel_param::ChannelParam;
use crate::domain::order::{PayChannel, PayOrder, TradeState};
use crate::error::TradeError;
use crate::repository::channel_param_repository::ChannelParamRepository;
use crate::repository::order_repository::OrderRepository;

/// 订单账本的内存实现, 供编排测试与无数据库环境使用。
///
/// `update_state` 与 MySQL 实现保持同样的 changed-rows 语义:
/// 内容未变化的重放返回 0。
#[derive(Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<String, PayOrder>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<PayOrder> {
        self.orders.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: &PayOrder) -> Result<(), TradeError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.trade_no) {
            return Err(TradeError::Internal(format!(
                "交易号重复: {}",
                order.trade_no
            )));
        }
        orders.insert(order.trade_no.clone(), order.clone());
        Ok(())
    }

    async fn find_by_trade_no(&self, trade_no: &str) -> Result<Option<PayOrder>, TradeError> {
        let orders = self.orders.read().await;
        Ok(orders.get(trade_no).cloned())
    }

    async fn update_state(
        &self,
        trade_no: &str,
        state: TradeState,
        pay_channel_trade_no: &str,
        pay_success_time: Option<DateTime<Utc>>,
    ) -> Result<u64, TradeError> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(trade_no) else {
            return Ok(0);
        };

        let next_ref = Some(pay_channel_trade_no.to_string());
        // 成功时间只写一次
        let next_success_time = order.pay_success_time.or(pay_success_time);

        let changed = order.trade_state != state
            || order.pay_channel_trade_no != next_ref
            || order.pay_success_time != next_success_time;

        order.trade_state = state;
        order.pay_channel_trade_no = next_ref;
        order.pay_success_time = next_success_time;

        Ok(u64::from(changed))
    }
}

/// 渠道参数存储的内存实现。
#[derive(Default, Clone)]
pub struct InMemoryChannelParamRepository {
    params: Arc<RwLock<HashMap<(String, String, String), ChannelParam>>>,
}

impl InMemoryChannelParamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, param: ChannelParam) {
        let key = (
            param.app_id.clone(),
            param.platform_channel.clone(),
            param.pay_channel.to_string(),
        );
        self.params.write().await.insert(key, param);
    }
}

#[async_trait]
impl ChannelParamRepository for InMemoryChannelParamRepository {
    async fn find(
        &self,
        app_id: &str,
        platform_channel: &str,
        pay_channel: PayChannel,
    ) -> Result<Option<ChannelParam>, TradeError> {
        let key = (
            app_id.to_string(),
            platform_channel.to_string(),
            pay_channel.to_string(),
        );
        let params = self.params.read().await;
        Ok(params.get(&key).cloned())
    }
}
