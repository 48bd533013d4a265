//! Approval sizing for trades. The order book can only settle an order if
//! the trader granted it a sufficient allowance on the right asset, so the
//! submission workflow derives from each order which asset to approve and
//! for how much.

use model::{OrderCreation, OrderSide};
use primitive_types::{H160, U256};
use shared::conversions::{self, DecimalError, FIXED_POINT_DECIMALS};

/// Percent approved on top of the required allowance. Approval and order
/// are two separate transactions; the buffer absorbs small price or amount
/// re-entries between them without another approval round trip, while still
/// bounding what a compromised spender could move.
pub const APPROVAL_BUFFER_PERCENT: u32 = 5;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalRequirement {
    /// The asset the order book must be able to transfer.
    pub asset: H160,
    /// Minimum allowance for the order to settle.
    pub required: U256,
    /// Amount actually approved when an approval turns out to be needed.
    pub buffered: U256,
}

/// The decision derived from an on-chain allowance read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Approval {
    /// The existing allowance is sufficient, so no `approve` is required.
    Sufficient,
    /// An `approve` must be confirmed before the order is submitted.
    Approve { asset: H160, amount: U256 },
}

impl ApprovalRequirement {
    /// BUY orders must be able to pay the full notional in the payment
    /// asset; SELL orders must be able to deliver the full token amount.
    /// The price plays no role for SELL sizing.
    pub fn for_order(order: &OrderCreation) -> Result<Self, DecimalError> {
        let (asset, required) = match order.order_side {
            OrderSide::Buy => (
                order.payment_asset,
                conversions::fixed_point_mul(order.amount, order.price, FIXED_POINT_DECIMALS)?,
            ),
            OrderSide::Sell => (order.token_asset, order.amount),
        };
        let buffered =
            conversions::apply_factor(required, 100 + APPROVAL_BUFFER_PERCENT, 100)?;
        Ok(Self {
            asset,
            required,
            buffered,
        })
    }

    pub fn against_allowance(&self, allowance: U256) -> Approval {
        if allowance < self.required {
            Approval::Approve {
                asset: self.asset,
                amount: self.buffered,
            }
        } else {
            Approval::Sufficient
        }
    }
}
