pub mod app;
pub mod channel;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod repository;
pub mod services;
pub mod utils;

// 重新导出关键组件, 便于外部调用
pub use app::AppState;
pub use channel::{AdapterResponse, ChannelAgentService, ChannelOrderPayload};
pub use config::AppSettings;
pub use domain::{ChannelParam, Currency, PayChannel, PayOrder, PaymentIntent, TradeState};
pub use error::{ErrorResponse, TradeError};
pub use services::{OrderRequest, OwnershipService, TransactionService};
