//! Hand-written, strongly-typed bindings for the two on-chain collaborators:
//! the ERC-20 asset tokens and the order book contract. Each binding exposes
//! one method per contract call so that argument order and result shapes are
//! checked by the compiler instead of at runtime.

pub mod erc20;
pub mod order_book;

pub use erc20::Erc20;
pub use order_book::{OrderBook, OrderBookError};
