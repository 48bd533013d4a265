//! Seams to the on-chain collaborators. The traits are what the workflows
//! program against; the `Onchain*` types implement them over the typed
//! contract bindings with a simulate, estimate, submit, confirm pipeline.

pub mod order_book;
pub mod tokens;

pub use order_book::{OnchainOrderBook, OrderBookInteracting, OrderPlacement};
pub use tokens::{OnchainTokens, TokenInteracting};

#[cfg(test)]
pub use order_book::MockOrderBookInteracting;
#[cfg(test)]
pub use tokens::MockTokenInteracting;
