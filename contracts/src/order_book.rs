use model::{Order, OrderCreation, OrderSide, OrderStatus, OrderType, UnknownCodeError};
use primitive_types::{H160, H256, U256};
use thiserror::Error;
use web3::{
    contract::{Contract, Error as ContractError, Options},
    signing::{keccak256, Key},
    types::TransactionReceipt,
    Transport, Web3,
};

const ABI_JSON: &[u8] = include_bytes!("../abi/OrderBook.json");

/// A raw `orders(id)` record before enum codes are checked.
type RawOrder = (
    U256, // id
    H160, // trader
    H160, // tokenAsset
    H160, // paymentAsset
    U256, // amount
    U256, // price
    U256, // filled
    U256, // timestamp
    U256, // expiry
    U256, // orderType
    U256, // orderSide
    U256, // status
);

#[derive(Debug, Error)]
pub enum OrderBookError {
    #[error("contract call failed: {0}")]
    Call(#[from] ContractError),
    #[error(transparent)]
    UnknownCode(#[from] UnknownCodeError),
    #[error("order field {0} out of range")]
    OutOfRange(&'static str),
}

/// Typed binding for the order book contract. Orders are created and
/// cancelled through it; everything else is read-only.
#[derive(Clone, Debug)]
pub struct OrderBook<T: Transport> {
    contract: Contract<T>,
}

impl<T: Transport> OrderBook<T> {
    pub fn at(web3: &Web3<T>, address: H160) -> Self {
        let contract = Contract::from_json(web3.eth(), address, ABI_JSON)
            .expect("embedded OrderBook ABI is valid");
        Self { contract }
    }

    pub fn address(&self) -> H160 {
        self.contract.address()
    }

    pub async fn get_best_prices(
        &self,
        token_asset: H160,
        payment_asset: H160,
    ) -> Result<(U256, U256), ContractError> {
        self.contract
            .query(
                "getBestPrices",
                (token_asset, payment_asset),
                None,
                Options::default(),
                None,
            )
            .await
    }

    pub async fn get_trader_orders(
        &self,
        trader: H160,
        offset: U256,
        limit: U256,
    ) -> Result<Vec<U256>, ContractError> {
        self.contract
            .query(
                "getTraderOrders",
                (trader, offset, limit),
                None,
                Options::default(),
                None,
            )
            .await
    }

    pub async fn order(&self, id: U256) -> Result<Order, OrderBookError> {
        let raw: RawOrder = self
            .contract
            .query("orders", (id,), None, Options::default(), None)
            .await?;
        order_from_raw(raw)
    }

    pub async fn simulate_create_order(
        &self,
        from: H160,
        order: &OrderCreation,
    ) -> Result<U256, ContractError> {
        self.contract
            .query(
                "createOrder",
                create_order_params(order),
                from,
                Options::default(),
                None,
            )
            .await
    }

    pub async fn estimate_create_order_gas(
        &self,
        from: H160,
        order: &OrderCreation,
    ) -> Result<U256, ContractError> {
        self.contract
            .estimate_gas("createOrder", create_order_params(order), from, Options::default())
            .await
    }

    pub async fn create_order(
        &self,
        key: impl Key,
        order: &OrderCreation,
        options: Options,
        confirmations: usize,
    ) -> web3::error::Result<TransactionReceipt> {
        self.contract
            .signed_call_with_confirmations(
                "createOrder",
                create_order_params(order),
                options,
                confirmations,
                key,
            )
            .await
    }

    pub async fn simulate_cancel_order(
        &self,
        from: H160,
        order_id: U256,
    ) -> Result<bool, ContractError> {
        self.contract
            .query("cancelOrder", (order_id,), from, Options::default(), None)
            .await
    }

    pub async fn estimate_cancel_order_gas(
        &self,
        from: H160,
        order_id: U256,
    ) -> Result<U256, ContractError> {
        self.contract
            .estimate_gas("cancelOrder", (order_id,), from, Options::default())
            .await
    }

    pub async fn cancel_order(
        &self,
        key: impl Key,
        order_id: U256,
        options: Options,
        confirmations: usize,
    ) -> web3::error::Result<TransactionReceipt> {
        self.contract
            .signed_call_with_confirmations("cancelOrder", (order_id,), options, confirmations, key)
            .await
    }

    /// Pulls the order id out of the `OrderCreated` event of a mined
    /// `createOrder` receipt. Returns `None` if the contract did not emit
    /// the event; the transaction itself still counts as confirmed.
    pub fn order_id_from_receipt(&self, receipt: &TransactionReceipt) -> Option<U256> {
        let signature = order_created_topic();
        receipt.logs.iter().find_map(|log| {
            if log.address != self.contract.address() || log.topics.first() != Some(&signature) {
                return None;
            }
            // Both event parameters are indexed, so the id is the second
            // topic.
            let id = log.topics.get(1)?;
            Some(U256::from_big_endian(id.as_bytes()))
        })
    }
}

/// `keccak256("OrderCreated(uint256,address)")`, the first topic of every
/// `OrderCreated` log.
fn order_created_topic() -> H256 {
    H256(keccak256(b"OrderCreated(uint256,address)"))
}

fn create_order_params(order: &OrderCreation) -> (H160, H160, U256, U256, U256, U256) {
    (
        order.token_asset,
        order.payment_asset,
        order.amount,
        order.price,
        U256::from(order.order_type.as_u8()),
        U256::from(order.order_side.as_u8()),
    )
}

fn order_from_raw(raw: RawOrder) -> Result<Order, OrderBookError> {
    let (
        id,
        trader,
        token_asset,
        payment_asset,
        amount,
        price,
        filled,
        timestamp,
        expiry,
        order_type,
        order_side,
        status,
    ) = raw;
    Ok(Order {
        id,
        trader,
        token_asset,
        payment_asset,
        amount,
        price,
        filled,
        timestamp: checked_u64(timestamp, "timestamp")?,
        expiry: checked_u64(expiry, "expiry")?,
        order_type: OrderType::try_from(small_code(order_type, "order type")?)?,
        order_side: OrderSide::try_from(small_code(order_side, "order side")?)?,
        status: OrderStatus::try_from(small_code(status, "order status")?)?,
    })
}

fn checked_u64(value: U256, field: &'static str) -> Result<u64, OrderBookError> {
    if value > U256::from(u64::MAX) {
        return Err(OrderBookError::OutOfRange(field));
    }
    Ok(value.low_u64())
}

fn small_code(value: U256, field: &'static str) -> Result<u8, OrderBookError> {
    if value > U256::from(u8::MAX) {
        return Err(OrderBookError::OutOfRange(field));
    }
    Ok(value.low_u64() as u8)
}
