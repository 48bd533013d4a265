//! Outcome handling for state-changing contract calls: turning provider
//! errors and mined receipts into one small taxonomy the workflows can act
//! on.
//!
//! The distinction between `Provider` and `Reverted` matters: a provider
//! failure leaves the transaction state unknown and must never be reported
//! as a revert.

use primitive_types::{H256, U256};
use thiserror::Error;
use web3::types::{TransactionReceipt, U64};

/// Percent added on top of the node's gas estimate before submission.
pub const GAS_LIMIT_HEADROOM_PERCENT: u32 = 20;

/// A transaction included in a mined block with a successful status.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxConfirmation {
    pub transaction_hash: H256,
    pub block_number: u64,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ExecutionError {
    /// The signer declined to sign. Recoverable by deliberate retry only.
    #[error("signature request rejected")]
    Rejected,
    /// The contract rejected the call, either during simulation or after the
    /// transaction was mined.
    #[error("transaction reverted: {0}")]
    Reverted(String),
    /// RPC or network failure. The transaction state is unknown.
    #[error("provider error: {0}")]
    Provider(String),
}

// EIP-1193 user rejection, forwarded by wallet providers as an RPC error.
const USER_REJECTED_CODE: i64 = 4001;

impl From<web3::Error> for ExecutionError {
    fn from(err: web3::Error) -> Self {
        match &err {
            web3::Error::Rpc(rpc) => {
                let message = rpc.message.to_lowercase();
                if let Some(reason) = revert_reason(&rpc.message) {
                    Self::Reverted(reason)
                } else if rpc.code.code() == USER_REJECTED_CODE
                    || message.contains("rejected")
                    || message.contains("denied")
                {
                    Self::Rejected
                } else {
                    Self::Provider(err.to_string())
                }
            }
            _ => Self::Provider(err.to_string()),
        }
    }
}

impl From<web3::contract::Error> for ExecutionError {
    fn from(err: web3::contract::Error) -> Self {
        match err {
            web3::contract::Error::Api(inner) => inner.into(),
            other => Self::Provider(other.to_string()),
        }
    }
}

/// Extracts the human readable reason from an `execution reverted` style RPC
/// message, if there is one.
pub fn revert_reason(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    let position = lower.find("revert")?;
    let after = message
        .get(position..)
        .and_then(|tail| tail.split_once(": "))
        .map(|(_, reason)| reason);
    match after {
        Some(reason) if !reason.trim().is_empty() => Some(reason.trim().to_string()),
        _ => Some(message.trim().to_string()),
    }
}

/// Checks a mined receipt and reduces it to a confirmation. A zero status
/// means the call was included but reverted; no reason string is available
/// at this point.
pub fn confirm_receipt(receipt: TransactionReceipt) -> Result<TxConfirmation, ExecutionError> {
    if receipt.status == Some(U64::zero()) {
        return Err(ExecutionError::Reverted(
            "transaction mined but reverted".to_string(),
        ));
    }
    let block_number = receipt
        .block_number
        .ok_or_else(|| {
            ExecutionError::Provider("confirmed receipt is missing a block number".to_string())
        })?
        .as_u64();
    Ok(TxConfirmation {
        transaction_hash: receipt.transaction_hash,
        block_number,
    })
}

/// Adds the configured headroom to a gas estimate.
pub fn gas_with_headroom(estimate: U256) -> U256 {
    estimate.saturating_mul(U256::from(100 + GAS_LIMIT_HEADROOM_PERCENT)) / U256::from(100u32)
}
