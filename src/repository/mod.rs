pub mod channel_param_repository;
pub mod memory;
pub mod order_repository;

pub use channel_param_repository::{ChannelParamRepository, MySqlChannelParamRepository};
pub use order_repository::{MySqlOrderRepository, OrderRepository};
