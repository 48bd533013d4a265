//! Periodic market data refresh. There is no push feed from the chain, so
//! the top of the book is polled and yielded whenever it changes. Interval
//! and jitter are configuration, not literals; the jitter spreads
//! independent clients so their polls do not align on the node.

use crate::data_source::{BestPrices, MarketDataSource};
use futures::Stream;
use primitive_types::H160;
use rand::Rng;
use std::{sync::Arc, time::Duration};

#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    pub interval: Duration,
    /// Upper bound of the random extra delay added to every tick.
    pub jitter: Duration,
}

impl PollConfig {
    fn delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.interval;
        }
        let jitter_ms = rand::thread_rng().gen_range(0..=self.jitter.as_millis());
        self.interval + Duration::from_millis(jitter_ms as u64)
    }
}

/// A stream of top of book snapshots that yields whenever the prices
/// change. Poll failures are logged and retried on the next tick; the
/// stream itself never ends.
pub fn best_price_stream(
    source: Arc<dyn MarketDataSource>,
    token_asset: H160,
    payment_asset: H160,
    config: PollConfig,
) -> impl Stream<Item = BestPrices> {
    futures::stream::unfold(None::<BestPrices>, move |previous| {
        let source = source.clone();
        async move {
            loop {
                tokio::time::sleep(config.delay()).await;
                let prices = match source.best_prices(token_asset, payment_asset).await {
                    Ok(prices) => prices,
                    Err(err) => {
                        tracing::warn!("failed to poll best prices: {:?}", err);
                        continue;
                    }
                };
                if previous == Some(prices) {
                    continue;
                }
                return Some((prices, Some(prices)));
            }
        }
    })
}
