pub mod channel_param;
pub mod intent;
pub mod money;
pub mod order;

pub use channel_param::ChannelParam;
pub use intent::PaymentIntent;
pub use money::Currency;
pub use order::{PLATFORM_CHANNEL_STORE_SCAN, PayChannel, PayOrder, TradeState};
