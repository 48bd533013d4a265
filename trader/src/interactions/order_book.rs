use crate::wallet::Wallet;
use anyhow::{Context, Result};
use async_trait::async_trait;
use contracts::OrderBook;
use model::{Order, OrderCreation};
use primitive_types::{H160, U256};
use shared::transactions::{self, ExecutionError, TxConfirmation};
use web3::{contract::Options, Transport, Web3};

/// Outcome of a confirmed `createOrder`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderPlacement {
    /// Id announced by the contract's `OrderCreated` event. `None` when the
    /// event was missing from the receipt; the order is confirmed anyway.
    pub order_id: Option<U256>,
    pub confirmation: TxConfirmation,
}

/// Order book interactions the workflows need.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderBookInteracting: Send + Sync {
    /// Address orders settle through, which is also the spender approvals
    /// are granted to.
    fn address(&self) -> H160;

    async fn create_order(
        &self,
        wallet: Wallet,
        order: OrderCreation,
    ) -> Result<OrderPlacement, ExecutionError>;

    async fn cancel_order(
        &self,
        wallet: Wallet,
        order_id: U256,
    ) -> Result<TxConfirmation, ExecutionError>;

    async fn get_best_prices(
        &self,
        token_asset: H160,
        payment_asset: H160,
    ) -> Result<(U256, U256)>;

    async fn get_trader_orders(
        &self,
        trader: H160,
        offset: U256,
        limit: U256,
    ) -> Result<Vec<U256>>;

    async fn order(&self, id: U256) -> Result<Order>;
}

pub struct OnchainOrderBook<T: Transport> {
    book: OrderBook<T>,
    confirmations: usize,
}

impl<T: Transport> OnchainOrderBook<T> {
    pub fn new(web3: &Web3<T>, address: H160, confirmations: usize) -> Self {
        Self {
            book: OrderBook::at(web3, address),
            confirmations,
        }
    }
}

#[async_trait]
impl<T> OrderBookInteracting for OnchainOrderBook<T>
where
    T: Transport + Send + Sync + 'static,
    T::Out: Send,
{
    fn address(&self) -> H160 {
        self.book.address()
    }

    async fn create_order(
        &self,
        wallet: Wallet,
        order: OrderCreation,
    ) -> Result<OrderPlacement, ExecutionError> {
        self.book
            .simulate_create_order(wallet.address(), &order)
            .await?;
        let estimate = self
            .book
            .estimate_create_order_gas(wallet.address(), &order)
            .await?;
        let gas = transactions::gas_with_headroom(estimate);
        tracing::debug!(?order, %gas, "submitting order");
        let receipt = self
            .book
            .create_order(
                wallet.signer(),
                &order,
                Options::with(|options| options.gas = Some(gas)),
                self.confirmations,
            )
            .await?;
        let order_id = self.book.order_id_from_receipt(&receipt);
        if order_id.is_none() {
            tracing::warn!(
                transaction = ?receipt.transaction_hash,
                "createOrder receipt carries no OrderCreated event"
            );
        }
        let confirmation = transactions::confirm_receipt(receipt)?;
        Ok(OrderPlacement {
            order_id,
            confirmation,
        })
    }

    async fn cancel_order(
        &self,
        wallet: Wallet,
        order_id: U256,
    ) -> Result<TxConfirmation, ExecutionError> {
        self.book
            .simulate_cancel_order(wallet.address(), order_id)
            .await?;
        let estimate = self
            .book
            .estimate_cancel_order_gas(wallet.address(), order_id)
            .await?;
        let gas = transactions::gas_with_headroom(estimate);
        tracing::debug!(%order_id, %gas, "submitting cancellation");
        let receipt = self
            .book
            .cancel_order(
                wallet.signer(),
                order_id,
                Options::with(|options| options.gas = Some(gas)),
                self.confirmations,
            )
            .await?;
        transactions::confirm_receipt(receipt)
    }

    async fn get_best_prices(
        &self,
        token_asset: H160,
        payment_asset: H160,
    ) -> Result<(U256, U256)> {
        self.book
            .get_best_prices(token_asset, payment_asset)
            .await
            .context("getBestPrices call failed")
    }

    async fn get_trader_orders(
        &self,
        trader: H160,
        offset: U256,
        limit: U256,
    ) -> Result<Vec<U256>> {
        self.book
            .get_trader_orders(trader, offset, limit)
            .await
            .context("getTraderOrders call failed")
    }

    async fn order(&self, id: U256) -> Result<Order> {
        self.book
            .order(id)
            .await
            .with_context(|| format!("failed to read order {}", id))
    }
}
