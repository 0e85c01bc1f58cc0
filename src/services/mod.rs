pub mod ownership;
pub mod transaction_service;

pub use ownership::{OwnershipService, OwnershipVerifier};
pub use transaction_service::{OrderRequest, TransactionService};
