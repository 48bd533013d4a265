use crate::wallet::Wallet;
use anyhow::{Context, Result};
use async_trait::async_trait;
use contracts::Erc20;
use primitive_types::{H160, U256};
use shared::transactions::{self, ExecutionError, TxConfirmation};
use web3::{contract::Options, Transport, Web3};

/// Asset token interactions the trade workflow needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenInteracting: Send + Sync {
    /// Current allowance granted by `owner` to `spender` on `token`.
    async fn allowance(&self, token: H160, owner: H160, spender: H160) -> Result<U256>;

    async fn balance_of(&self, token: H160, owner: H160) -> Result<U256>;

    /// Submits an `approve` and waits for it to be mined.
    async fn approve(
        &self,
        wallet: Wallet,
        token: H160,
        spender: H160,
        amount: U256,
    ) -> Result<TxConfirmation, ExecutionError>;
}

pub struct OnchainTokens<T: Transport> {
    web3: Web3<T>,
    confirmations: usize,
}

impl<T: Transport> OnchainTokens<T> {
    pub fn new(web3: Web3<T>, confirmations: usize) -> Self {
        Self {
            web3,
            confirmations,
        }
    }
}

#[async_trait]
impl<T> TokenInteracting for OnchainTokens<T>
where
    T: Transport + Send + Sync + 'static,
    T::Out: Send,
{
    async fn allowance(&self, token: H160, owner: H160, spender: H160) -> Result<U256> {
        Erc20::at(&self.web3, token)
            .allowance(owner, spender)
            .await
            .context("allowance call failed")
    }

    async fn balance_of(&self, token: H160, owner: H160) -> Result<U256> {
        Erc20::at(&self.web3, token)
            .balance_of(owner)
            .await
            .context("balanceOf call failed")
    }

    async fn approve(
        &self,
        wallet: Wallet,
        token: H160,
        spender: H160,
        amount: U256,
    ) -> Result<TxConfirmation, ExecutionError> {
        let token = Erc20::at(&self.web3, token);
        // A simulated call surfaces the revert reason before gas is spent.
        token
            .simulate_approve(wallet.address(), spender, amount)
            .await?;
        let estimate = token
            .estimate_approve_gas(wallet.address(), spender, amount)
            .await?;
        let gas = transactions::gas_with_headroom(estimate);
        tracing::debug!(%amount, ?spender, %gas, "submitting approval");
        let receipt = token
            .approve(
                wallet.signer(),
                spender,
                amount,
                Options::with(|options| options.gas = Some(gas)),
                self.confirmations,
            )
            .await?;
        transactions::confirm_receipt(receipt)
    }
}
