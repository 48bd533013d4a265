//! Orders as reported by the order book contract.
//!
//! The contract transmits order type, side and status as small integers. The
//! mapping here must stay exact in both directions; an unexpected code is an
//! error, never a default.

use crate::u256_decimal;
use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCodeError {
    pub kind: &'static str,
    pub code: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Limit => 0,
            Self::Market => 1,
        }
    }
}

impl TryFrom<u8> for OrderType {
    type Error = UnknownCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Limit),
            1 => Ok(Self::Market),
            code => Err(UnknownCodeError {
                kind: "order type",
                code,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Buy => 0,
            Self::Sell => 1,
        }
    }
}

impl TryFrom<u8> for OrderSide {
    type Error = UnknownCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Buy),
            1 => Ok(Self::Sell),
            code => Err(UnknownCodeError {
                kind: "order side",
                code,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Open,
    Filled,
    PartialFilled,
    Cancelled,
    Expired,
}

impl OrderStatus {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Filled => 1,
            Self::PartialFilled => 2,
            Self::Cancelled => 3,
            Self::Expired => 4,
        }
    }

    /// Whether the contract would still accept a cancellation request. The
    /// contract is the authority; this is only used for display.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Open | Self::PartialFilled)
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = UnknownCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Open),
            1 => Ok(Self::Filled),
            2 => Ok(Self::PartialFilled),
            3 => Ok(Self::Cancelled),
            4 => Ok(Self::Expired),
            code => Err(UnknownCodeError {
                kind: "order status",
                code,
            }),
        }
    }
}

/// One order record as stored by the order book contract. The contract owns
/// the full lifecycle; this type is a read-only mirror and in particular does
/// not enforce `filled <= amount`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(with = "u256_decimal")]
    pub id: U256,
    pub trader: H160,
    pub token_asset: H160,
    pub payment_asset: H160,
    #[serde(with = "u256_decimal")]
    pub amount: U256,
    #[serde(with = "u256_decimal")]
    pub price: U256,
    #[serde(with = "u256_decimal")]
    pub filled: U256,
    pub timestamp: u64,
    pub expiry: u64,
    pub order_type: OrderType,
    pub order_side: OrderSide,
    pub status: OrderStatus,
}

impl Order {
    pub fn remaining(&self) -> U256 {
        self.amount.saturating_sub(self.filled)
    }
}

impl Default for Order {
    fn default() -> Self {
        Self {
            id: U256::zero(),
            trader: H160::zero(),
            token_asset: H160::zero(),
            payment_asset: H160::zero(),
            amount: U256::zero(),
            price: U256::zero(),
            filled: U256::zero(),
            timestamp: 0,
            expiry: 0,
            order_type: OrderType::Limit,
            order_side: OrderSide::Buy,
            status: OrderStatus::Open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use serde_json::json;

    #[test]
    fn order_type_codes_round_trip() {
        for (variant, code) in [(OrderType::Limit, 0), (OrderType::Market, 1)] {
            assert_eq!(variant.as_u8(), code);
            assert_eq!(OrderType::try_from(code).unwrap(), variant);
        }
        assert!(OrderType::try_from(2).is_err());
    }

    #[test]
    fn order_side_codes_round_trip() {
        for (variant, code) in [(OrderSide::Buy, 0), (OrderSide::Sell, 1)] {
            assert_eq!(variant.as_u8(), code);
            assert_eq!(OrderSide::try_from(code).unwrap(), variant);
        }
        assert!(OrderSide::try_from(2).is_err());
    }

    #[test]
    fn order_status_codes_round_trip() {
        let table = [
            (OrderStatus::Open, 0),
            (OrderStatus::Filled, 1),
            (OrderStatus::PartialFilled, 2),
            (OrderStatus::Cancelled, 3),
            (OrderStatus::Expired, 4),
        ];
        for (variant, code) in table {
            assert_eq!(variant.as_u8(), code);
            assert_eq!(OrderStatus::try_from(code).unwrap(), variant);
        }
        assert!(OrderStatus::try_from(5).is_err());
    }

    #[test]
    fn unknown_code_error_names_the_enum() {
        let err = OrderStatus::try_from(9).unwrap_err();
        assert_eq!(err.to_string(), "unknown order status code 9");
    }

    #[test]
    fn cancellable_statuses() {
        assert!(OrderStatus::Open.is_cancellable());
        assert!(OrderStatus::PartialFilled.is_cancellable());
        assert!(!OrderStatus::Filled.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
        assert!(!OrderStatus::Expired.is_cancellable());
    }

    #[test]
    fn remaining_saturates() {
        let order = Order {
            amount: 10.into(),
            filled: 12.into(),
            ..Default::default()
        };
        assert_eq!(order.remaining(), U256::zero());
    }

    #[test]
    fn order_serialization() {
        let order = Order {
            id: 7.into(),
            trader: H160(hex!("63fc2ad3d021a4d7e64323529a55a9442c444da0")),
            amount: U256::from(10u32) * U256::exp10(18),
            price: U256::from(2u32) * U256::exp10(18),
            filled: U256::zero(),
            timestamp: 1_600_000_000,
            expiry: 1_600_086_400,
            order_side: OrderSide::Sell,
            status: OrderStatus::PartialFilled,
            ..Default::default()
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["id"], json!("7"));
        assert_eq!(value["amount"], json!("10000000000000000000"));
        assert_eq!(value["orderSide"], json!("sell"));
        assert_eq!(value["status"], json!("partialFilled"));
        let back: Order = serde_json::from_value(value).unwrap();
        assert_eq!(back, order);
    }
}
