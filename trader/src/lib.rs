//! Client workflows for trading against the on-chain order book: wallet
//! context, approval sizing, order submission and cancellation, and the
//! market data plumbing used by the command line frontend.

pub mod approval;
pub mod arguments;
pub mod data_source;
pub mod interactions;
pub mod notifications;
pub mod polling;
pub mod trade;
pub mod wallet;
