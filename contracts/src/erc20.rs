use primitive_types::{H160, U256};
use web3::{
    contract::{Contract, Error as ContractError, Options},
    signing::Key,
    types::TransactionReceipt,
    Transport, Web3,
};

const ABI_JSON: &[u8] = include_bytes!("../abi/ERC20.json");

/// The ERC-20 surface this client touches: allowance management and balance
/// reads. `approve` is the only state-changing call.
#[derive(Clone, Debug)]
pub struct Erc20<T: Transport> {
    contract: Contract<T>,
}

impl<T: Transport> Erc20<T> {
    pub fn at(web3: &Web3<T>, address: H160) -> Self {
        let contract = Contract::from_json(web3.eth(), address, ABI_JSON)
            .expect("embedded ERC20 ABI is valid");
        Self { contract }
    }

    pub fn address(&self) -> H160 {
        self.contract.address()
    }

    pub async fn allowance(&self, owner: H160, spender: H160) -> Result<U256, ContractError> {
        self.contract
            .query("allowance", (owner, spender), None, Options::default(), None)
            .await
    }

    pub async fn balance_of(&self, account: H160) -> Result<U256, ContractError> {
        self.contract
            .query("balanceOf", (account,), None, Options::default(), None)
            .await
    }

    /// Runs `approve` as a read-only call from `from`. Surfaces a revert
    /// reason before any gas is spent.
    pub async fn simulate_approve(
        &self,
        from: H160,
        spender: H160,
        amount: U256,
    ) -> Result<bool, ContractError> {
        self.contract
            .query("approve", (spender, amount), from, Options::default(), None)
            .await
    }

    pub async fn estimate_approve_gas(
        &self,
        from: H160,
        spender: H160,
        amount: U256,
    ) -> Result<U256, ContractError> {
        self.contract
            .estimate_gas("approve", (spender, amount), from, Options::default())
            .await
    }

    pub async fn approve(
        &self,
        key: impl Key,
        spender: H160,
        amount: U256,
        options: Options,
        confirmations: usize,
    ) -> web3::error::Result<TransactionReceipt> {
        self.contract
            .signed_call_with_confirmations("approve", (spender, amount), options, confirmations, key)
            .await
    }
}
