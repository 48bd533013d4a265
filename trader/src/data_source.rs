//! Market data access behind an explicit capability switch. The simulated
//! source exists for environments without a deployed order book and is only
//! ever selected through configuration, never as a silent fallback.

use crate::interactions::OrderBookInteracting;
use anyhow::Result;
use async_trait::async_trait;
use model::{Order, OrderSide, OrderStatus, OrderType};
use primitive_types::{H160, U256};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

/// Top of the book for one trading pair: the highest bid and the lowest
/// ask, as 18 decimal fixed-point prices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BestPrices {
    pub best_buy: U256,
    pub best_sell: U256,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn best_prices(&self, token_asset: H160, payment_asset: H160) -> Result<BestPrices>;

    /// Full order records for one page of a trader's orders.
    async fn trader_orders(&self, trader: H160, offset: U256, limit: U256) -> Result<Vec<Order>>;
}

pub struct OnchainMarketData {
    order_book: Arc<dyn OrderBookInteracting>,
}

impl OnchainMarketData {
    pub fn new(order_book: Arc<dyn OrderBookInteracting>) -> Self {
        Self { order_book }
    }
}

#[async_trait]
impl MarketDataSource for OnchainMarketData {
    async fn best_prices(&self, token_asset: H160, payment_asset: H160) -> Result<BestPrices> {
        let (best_buy, best_sell) = self
            .order_book
            .get_best_prices(token_asset, payment_asset)
            .await?;
        Ok(BestPrices {
            best_buy,
            best_sell,
        })
    }

    async fn trader_orders(&self, trader: H160, offset: U256, limit: U256) -> Result<Vec<Order>> {
        let ids = self
            .order_book
            .get_trader_orders(trader, offset, limit)
            .await?;
        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            orders.push(self.order_book.order(id).await?);
        }
        Ok(orders)
    }
}

/// Deterministic generated market data. The same inputs always produce the
/// same outputs so tests and demos are reproducible.
pub struct SimulatedMarketData {
    seed: u64,
}

impl SimulatedMarketData {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self, a: H160, b: H160) -> StdRng {
        let mut seed = self.seed;
        for byte in a.0.iter().chain(b.0.iter()) {
            seed = seed.wrapping_mul(31).wrapping_add(u64::from(*byte));
        }
        StdRng::seed_from_u64(seed)
    }
}

#[async_trait]
impl MarketDataSource for SimulatedMarketData {
    async fn best_prices(&self, token_asset: H160, payment_asset: H160) -> Result<BestPrices> {
        let mut rng = self.rng(token_asset, payment_asset);
        // Prices around one payment unit per token, bid below ask.
        let bid: u64 = rng.gen_range(500_000_000..2_000_000_000);
        let spread: u64 = rng.gen_range(1_000_000..10_000_000);
        let scale = U256::exp10(9);
        Ok(BestPrices {
            best_buy: U256::from(bid) * scale,
            best_sell: U256::from(bid + spread) * scale,
        })
    }

    async fn trader_orders(&self, trader: H160, offset: U256, limit: U256) -> Result<Vec<Order>> {
        let mut rng = self.rng(trader, H160::zero());
        let count = limit.min(U256::from(3u32)).low_u64();
        let orders = (0..count)
            .map(|index| {
                let amount: u64 = rng.gen_range(1..50);
                let price: u64 = rng.gen_range(1..5);
                Order {
                    id: offset + U256::from(index),
                    trader,
                    token_asset: H160::repeat_byte(0x01),
                    payment_asset: H160::repeat_byte(0x02),
                    amount: U256::from(amount) * U256::exp10(18),
                    price: U256::from(price) * U256::exp10(18),
                    filled: U256::zero(),
                    timestamp: 1_600_000_000 + index,
                    expiry: 1_600_086_400 + index,
                    order_type: OrderType::Limit,
                    order_side: if index % 2 == 0 {
                        OrderSide::Buy
                    } else {
                        OrderSide::Sell
                    },
                    status: OrderStatus::Open,
                }
            })
            .collect();
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::MockOrderBookInteracting;
    use shared::addr;

    fn token() -> H160 {
        addr!("0101010101010101010101010101010101010101")
    }

    fn payment() -> H160 {
        addr!("0202020202020202020202020202020202020202")
    }

    #[tokio::test]
    async fn onchain_source_maps_the_price_pair() {
        let mut book = MockOrderBookInteracting::new();
        book.expect_get_best_prices()
            .returning(|_, _| Ok((U256::from(2u32), U256::from(3u32))));
        let source = OnchainMarketData::new(Arc::new(book));

        let prices = source.best_prices(token(), payment()).await.unwrap();
        assert_eq!(prices.best_buy, U256::from(2u32));
        assert_eq!(prices.best_sell, U256::from(3u32));
    }

    #[tokio::test]
    async fn onchain_source_resolves_each_order_id() {
        let mut book = MockOrderBookInteracting::new();
        book.expect_get_trader_orders()
            .returning(|_, _, _| Ok(vec![U256::from(1u32), U256::from(5u32)]));
        book.expect_order().times(2).returning(|id| {
            Ok(Order {
                id,
                ..Default::default()
            })
        });
        let source = OnchainMarketData::new(Arc::new(book));

        let orders = source
            .trader_orders(token(), U256::zero(), U256::from(10u32))
            .await
            .unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, U256::from(1u32));
        assert_eq!(orders[1].id, U256::from(5u32));
    }

    #[tokio::test]
    async fn simulated_prices_are_deterministic_per_pair() {
        let source = SimulatedMarketData::new(0);
        let first = source.best_prices(token(), payment()).await.unwrap();
        let second = source.best_prices(token(), payment()).await.unwrap();
        assert_eq!(first, second);

        let other = source.best_prices(payment(), token()).await.unwrap();
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn simulated_bid_stays_below_ask() {
        let source = SimulatedMarketData::new(7);
        let prices = source.best_prices(token(), payment()).await.unwrap();
        assert!(prices.best_buy < prices.best_sell);
    }

    #[tokio::test]
    async fn simulated_orders_respect_the_page_limit() {
        let source = SimulatedMarketData::new(0);
        let orders = source
            .trader_orders(token(), U256::from(10u32), U256::from(2u32))
            .await
            .unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, U256::from(10u32));
        assert_eq!(orders[0].trader, token());
        assert!(orders.iter().all(|order| order.status == OrderStatus::Open));
    }
}
