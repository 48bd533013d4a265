//! The order submission and cancellation workflows.
//!
//! Submission performs up to two transactions: an `approve` when the current
//! allowance is short of the order's requirement, then the `createOrder`
//! itself. The approval is always confirmed before the order is submitted;
//! submitting both in parallel could mine the order against the old
//! allowance and revert it spuriously.
//!
//! Nothing here retries. A failed transaction is surfaced and the user has
//! to re-initiate deliberately; retrying a financial transaction blindly
//! risks a duplicate submission. A confirmed approval followed by a failed
//! order still reports an overall failure, but the allowance stays on chain
//! for the next attempt to reuse.

use crate::{
    approval::{Approval, ApprovalRequirement},
    interactions::{OrderBookInteracting, OrderPlacement, TokenInteracting},
    notifications::Notifying,
    wallet::{Wallet, WalletContext},
};
use model::{OrderCreation, OrderSide, OrderType, TradeParams};
use primitive_types::U256;
use shared::{
    conversions::{self, FIXED_POINT_DECIMALS},
    transactions::{ExecutionError, TxConfirmation},
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TradeError {
    /// A local precondition failed. Nothing was sent to the network.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("approval rejected by signer")]
    ApprovalRejected,
    #[error("approval reverted: {0}")]
    ApprovalReverted(String),
    #[error("order rejected by signer")]
    OrderRejected,
    #[error("order reverted: {0}")]
    OrderReverted(String),
    /// RPC or network failure. The transaction state is unknown and must
    /// not be assumed failed.
    #[error("provider error: {0}")]
    Provider(String),
}

enum Phase {
    Approval,
    Order,
}

impl TradeError {
    fn from_execution(phase: Phase, err: ExecutionError) -> Self {
        match (phase, err) {
            (Phase::Approval, ExecutionError::Rejected) => Self::ApprovalRejected,
            (Phase::Approval, ExecutionError::Reverted(reason)) => Self::ApprovalReverted(reason),
            (Phase::Order, ExecutionError::Rejected) => Self::OrderRejected,
            (Phase::Order, ExecutionError::Reverted(reason)) => Self::OrderReverted(reason),
            (_, ExecutionError::Provider(message)) => Self::Provider(message),
        }
    }

    fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    fn provider(err: anyhow::Error) -> Self {
        Self::Provider(format!("{:#}", err))
    }
}

/// Turns user entered trade parameters into the wire level order, enforcing
/// the local preconditions: the amount must be a positive decimal and limit
/// orders need a positive price. Market orders are priced by the book on
/// execution, so their price is forced to zero.
pub fn validated_order(params: &TradeParams) -> Result<OrderCreation, TradeError> {
    let amount = conversions::decimal_to_fixed_point(&params.amount, FIXED_POINT_DECIMALS)
        .map_err(|err| TradeError::invalid_input(format!("amount: {}", err)))?;
    if amount.is_zero() {
        return Err(TradeError::invalid_input("amount must be positive"));
    }
    let price = match params.order_type {
        OrderType::Limit => {
            let price = conversions::decimal_to_fixed_point(&params.price, FIXED_POINT_DECIMALS)
                .map_err(|err| TradeError::invalid_input(format!("price: {}", err)))?;
            if price.is_zero() {
                return Err(TradeError::invalid_input(
                    "price must be positive for limit orders",
                ));
            }
            price
        }
        OrderType::Market => U256::zero(),
    };
    Ok(OrderCreation {
        token_asset: params.token_asset,
        payment_asset: params.payment_asset,
        amount,
        price,
        order_type: params.order_type,
        order_side: params.order_side,
    })
}

pub struct TradeSubmitter {
    wallet: Arc<WalletContext>,
    tokens: Arc<dyn TokenInteracting>,
    order_book: Arc<dyn OrderBookInteracting>,
    notifier: Arc<dyn Notifying>,
}

impl TradeSubmitter {
    pub fn new(
        wallet: Arc<WalletContext>,
        tokens: Arc<dyn TokenInteracting>,
        order_book: Arc<dyn OrderBookInteracting>,
        notifier: Arc<dyn Notifying>,
    ) -> Self {
        Self {
            wallet,
            tokens,
            order_book,
            notifier,
        }
    }

    /// Submits one trade. The pending notification opens once the local
    /// preconditions pass and is resolved on every path after that.
    pub async fn submit_trade(&self, params: &TradeParams) -> Result<OrderPlacement, TradeError> {
        let wallet = self.connected_wallet()?;
        let order = validated_order(params)?;
        let requirement = ApprovalRequirement::for_order(&order)
            .map_err(|err| TradeError::invalid_input(err.to_string()))?;

        let side = match order.order_side {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        };
        let pending = self.notifier.pending(&format!(
            "submitting {} order for {} tokens",
            side,
            conversions::fixed_point_to_decimal(order.amount, FIXED_POINT_DECIMALS),
        ));
        let result = self.place_order(&wallet, order, requirement).await;
        match &result {
            Ok(placement) => self.notifier.resolve_success(
                pending,
                &format!(
                    "order confirmed in block {}",
                    placement.confirmation.block_number
                ),
            ),
            Err(err) => self.notifier.resolve_error(pending, &err.to_string()),
        }
        result
    }

    async fn place_order(
        &self,
        wallet: &Wallet,
        order: OrderCreation,
        requirement: ApprovalRequirement,
    ) -> Result<OrderPlacement, TradeError> {
        let spender = self.order_book.address();
        let allowance = self
            .tokens
            .allowance(requirement.asset, wallet.address(), spender)
            .await
            .map_err(TradeError::provider)?;
        match requirement.against_allowance(allowance) {
            Approval::Sufficient => {
                tracing::debug!(%allowance, "allowance sufficient, skipping approval");
            }
            Approval::Approve { asset, amount } => {
                self.notifier.info(&format!(
                    "approving {} for trading",
                    conversions::fixed_point_to_decimal(amount, FIXED_POINT_DECIMALS),
                ));
                self.tokens
                    .approve(wallet.clone(), asset, spender, amount)
                    .await
                    .map_err(|err| TradeError::from_execution(Phase::Approval, err))?;
            }
        }
        self.order_book
            .create_order(wallet.clone(), order)
            .await
            .map_err(|err| TradeError::from_execution(Phase::Order, err))
    }

    /// Cancels an order. No local ownership or status checks; the contract
    /// is the sole authority and reverts cancellations it does not accept.
    pub async fn cancel_order(&self, order_id: U256) -> Result<TxConfirmation, TradeError> {
        let wallet = self.connected_wallet()?;
        let pending = self
            .notifier
            .pending(&format!("cancelling order {}", order_id));
        let result = self
            .order_book
            .cancel_order(wallet, order_id)
            .await
            .map_err(|err| TradeError::from_execution(Phase::Order, err));
        match &result {
            Ok(confirmation) => self.notifier.resolve_success(
                pending,
                &format!(
                    "order {} cancelled in block {}",
                    order_id, confirmation.block_number
                ),
            ),
            Err(err) => self.notifier.resolve_error(pending, &err.to_string()),
        }
        result
    }

    fn connected_wallet(&self) -> Result<Wallet, TradeError> {
        self.wallet
            .wallet()
            .ok_or_else(|| TradeError::invalid_input("wallet not connected"))
    }
}
