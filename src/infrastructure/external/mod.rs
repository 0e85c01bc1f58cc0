pub mod merchant_client;

pub use merchant_client::HttpMerchantService;
