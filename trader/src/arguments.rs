//! Command line configuration for the trader binary.

use anyhow::{anyhow, Context, Result};
use primitive_types::{H160, U256};
use std::time::Duration;
use structopt::StructOpt;
use strum::{EnumString, EnumVariantNames, VariantNames};

/// Where market data is read from. `Simulated` is an explicit opt in for
/// environments without a deployed order book.
#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumString, EnumVariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum DataSourceKind {
    Onchain,
    Simulated,
}

#[derive(Debug, StructOpt)]
#[structopt(name = "trader", about = "command line client for the on-chain order book")]
pub struct Arguments {
    /// JSON-RPC endpoint of the node.
    #[structopt(long, env = "NODE_URL", default_value = "http://localhost:8545")]
    pub node_url: String,

    /// Address of the order book contract.
    #[structopt(long, env = "ORDER_BOOK", parse(try_from_str = parse_address))]
    pub order_book: H160,

    /// Hex encoded private key of the trading account. Read commands work
    /// without one.
    #[structopt(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    #[structopt(long, default_value = "onchain", possible_values = DataSourceKind::VARIANTS)]
    pub data_source: DataSourceKind,

    /// Blocks to wait before a transaction counts as confirmed.
    #[structopt(long, default_value = "1")]
    pub confirmations: usize,

    /// Seconds between market data polls.
    #[structopt(long, default_value = "10", parse(try_from_str = duration_from_seconds))]
    pub poll_interval: Duration,

    /// Upper bound in seconds of the random extra delay added to each poll.
    #[structopt(long, default_value = "2", parse(try_from_str = duration_from_seconds))]
    pub poll_jitter: Duration,

    #[structopt(long, env = "LOG_FILTER", default_value = "info")]
    pub log_filter: String,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Submit a buy order.
    Buy(TradeArguments),
    /// Submit a sell order.
    Sell(TradeArguments),
    /// Cancel one of your orders.
    Cancel {
        #[structopt(long, parse(try_from_str = parse_u256))]
        id: U256,
    },
    /// List a trader's orders.
    Orders {
        /// Defaults to the configured wallet's account.
        #[structopt(long, parse(try_from_str = parse_address))]
        trader: Option<H160>,
        #[structopt(long, default_value = "0", parse(try_from_str = parse_u256))]
        offset: U256,
        #[structopt(long, default_value = "25", parse(try_from_str = parse_u256))]
        limit: U256,
    },
    /// Show the wallet's balances in both assets of a pair.
    Balances(PairArguments),
    /// Show the top of the book for a pair.
    BestPrices(PairArguments),
    /// Poll the top of the book and print every change.
    Watch(PairArguments),
}

#[derive(Debug, StructOpt)]
pub struct PairArguments {
    #[structopt(long, parse(try_from_str = parse_address))]
    pub token: H160,
    #[structopt(long, parse(try_from_str = parse_address))]
    pub payment: H160,
}

#[derive(Debug, StructOpt)]
pub struct TradeArguments {
    #[structopt(flatten)]
    pub pair: PairArguments,

    /// Token amount, decimal.
    #[structopt(long)]
    pub amount: String,

    /// Limit price in payment units per token, decimal.
    #[structopt(long)]
    pub price: Option<String>,

    /// Submit at the best available price instead of a limit price.
    #[structopt(long)]
    pub market: bool,
}

pub fn duration_from_seconds(s: &str) -> Result<Duration, std::num::ParseFloatError> {
    Ok(Duration::from_secs_f64(s.parse()?))
}

pub fn parse_address(s: &str) -> Result<H160> {
    let hex_part = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(hex_part).context("address is not hex encoded")?;
    if bytes.len() != 20 {
        return Err(anyhow!("address must be 20 bytes, got {}", bytes.len()));
    }
    Ok(H160::from_slice(&bytes))
}

pub fn parse_u256(s: &str) -> Result<U256> {
    U256::from_dec_str(s).map_err(|err| anyhow!("invalid decimal integer {:?}: {:?}", s, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::addr;

    #[test]
    fn parses_addresses_with_and_without_prefix() {
        let expected = addr!("0101010101010101010101010101010101010101");
        assert_eq!(
            parse_address("0x0101010101010101010101010101010101010101").unwrap(),
            expected
        );
        assert_eq!(
            parse_address("0101010101010101010101010101010101010101").unwrap(),
            expected
        );
        assert!(parse_address("0x01").is_err());
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn parses_durations_as_seconds() {
        assert_eq!(duration_from_seconds("10").unwrap(), Duration::from_secs(10));
        assert_eq!(
            duration_from_seconds("0.5").unwrap(),
            Duration::from_millis(500)
        );
        assert!(duration_from_seconds("ten").is_err());
    }

    #[test]
    fn parses_order_ids_as_decimal() {
        assert_eq!(parse_u256("42").unwrap(), U256::from(42u32));
        assert!(parse_u256("0x2a").is_err());
    }

    #[test]
    fn parses_a_buy_command_line() {
        let args = Arguments::from_iter_safe(vec![
            "trader",
            "--order-book",
            "0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b",
            "buy",
            "--token",
            "0x0101010101010101010101010101010101010101",
            "--payment",
            "0x0202020202020202020202020202020202020202",
            "--amount",
            "10",
            "--price",
            "2.00",
        ])
        .unwrap();
        assert_eq!(
            args.order_book,
            addr!("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b")
        );
        assert_eq!(args.data_source, DataSourceKind::Onchain);
        match args.command {
            Command::Buy(trade) => {
                assert_eq!(trade.amount, "10");
                assert_eq!(trade.price.as_deref(), Some("2.00"));
                assert!(!trade.market);
            }
            other => panic!("expected buy, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_data_source() {
        let result = Arguments::from_iter_safe(vec![
            "trader",
            "--order-book",
            "0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b",
            "--data-source",
            "imaginary",
            "best-prices",
            "--token",
            "0x0101010101010101010101010101010101010101",
            "--payment",
            "0x0202020202020202020202020202020202020202",
        ]);
        assert!(result.is_err());
    }
}
