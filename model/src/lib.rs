//! Domain types shared between the contract bindings and the trading
//! workflows. Everything in here is plain data; conversions to and from the
//! contract's wire encoding live next to the types they belong to.

pub mod order;
pub mod trade;
pub mod u256_decimal;

pub use order::{Order, OrderSide, OrderStatus, OrderType, UnknownCodeError};
pub use trade::{OrderCreation, TradeParams};
