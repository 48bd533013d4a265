//! Trade input as entered by the user and the wire-level order creation
//! payload derived from it.

use crate::{
    order::{OrderSide, OrderType},
    u256_decimal,
};
use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};

/// One trade as requested through the UI. Amounts are kept as the decimal
/// strings the user entered; parsing and validation happen when the trade is
/// submitted so that a malformed value fails fast without any network call.
///
/// Constructed fresh per submission and not mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeParams {
    pub token_asset: H160,
    pub payment_asset: H160,
    /// Token units, decimal string.
    pub amount: String,
    /// Payment units per token unit, decimal string. Ignored and zeroed for
    /// market orders.
    #[serde(default)]
    pub price: String,
    pub order_type: OrderType,
    pub order_side: OrderSide,
}

/// The validated, fixed-point form of a trade, ready to be encoded into a
/// `createOrder` call.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreation {
    pub token_asset: H160,
    pub payment_asset: H160,
    #[serde(with = "u256_decimal")]
    pub amount: U256,
    #[serde(with = "u256_decimal")]
    pub price: U256,
    pub order_type: OrderType,
    pub order_side: OrderSide,
}
