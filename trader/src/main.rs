use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use model::{OrderSide, OrderType, TradeParams};
use secp256k1::SecretKey;
use shared::conversions::{fixed_point_to_decimal, FIXED_POINT_DECIMALS};
use std::{str::FromStr, sync::Arc};
use structopt::StructOpt;
use trader::{
    arguments::{Arguments, Command, DataSourceKind, TradeArguments},
    data_source::{BestPrices, MarketDataSource, OnchainMarketData, SimulatedMarketData},
    interactions::{OnchainOrderBook, OnchainTokens, OrderBookInteracting, TokenInteracting},
    notifications::LogNotifier,
    polling::{best_price_stream, PollConfig},
    trade::TradeSubmitter,
    wallet::{Wallet, WalletContext},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::from_args();
    shared::tracing_setup::initialize(&args.log_filter);
    tracing::info!(node_url = %args.node_url, order_book = ?args.order_book, "starting trader");

    let transport =
        web3::transports::Http::new(&args.node_url).context("failed to create transport")?;
    let web3 = web3::Web3::new(transport);

    let wallet_context = Arc::new(WalletContext::new());
    if let Some(private_key) = &args.private_key {
        let key = SecretKey::from_str(private_key.strip_prefix("0x").unwrap_or(private_key))
            .map_err(|_| anyhow!("malformed private key"))?;
        let chain_id = web3.eth().chain_id().await.ok().map(|id| id.as_u64());
        let account = wallet_context.connect(Wallet::new(key, chain_id));
        tracing::info!(?account, ?chain_id, "wallet connected");
    }

    let order_book: Arc<dyn OrderBookInteracting> = Arc::new(OnchainOrderBook::new(
        &web3,
        args.order_book,
        args.confirmations,
    ));
    let tokens: Arc<dyn TokenInteracting> =
        Arc::new(OnchainTokens::new(web3.clone(), args.confirmations));
    let market_data: Arc<dyn MarketDataSource> = match args.data_source {
        DataSourceKind::Onchain => Arc::new(OnchainMarketData::new(order_book.clone())),
        DataSourceKind::Simulated => Arc::new(SimulatedMarketData::new(0)),
    };
    let submitter = TradeSubmitter::new(
        wallet_context.clone(),
        tokens.clone(),
        order_book,
        Arc::new(LogNotifier::default()),
    );

    match args.command {
        Command::Buy(trade) => submit(&submitter, trade, OrderSide::Buy).await,
        Command::Sell(trade) => submit(&submitter, trade, OrderSide::Sell).await,
        Command::Cancel { id } => {
            let confirmation = submitter.cancel_order(id).await?;
            println!(
                "order {} cancelled in block {} ({:?})",
                id, confirmation.block_number, confirmation.transaction_hash
            );
            Ok(())
        }
        Command::Orders {
            trader,
            offset,
            limit,
        } => {
            let account = trader
                .or_else(|| wallet_context.account())
                .ok_or_else(|| anyhow!("pass --trader or configure a private key"))?;
            let orders = market_data.trader_orders(account, offset, limit).await?;
            if orders.is_empty() {
                println!("no orders");
            }
            for order in orders {
                println!(
                    "#{} {:?} {:?}: amount {} price {} filled {} [{:?}]{}",
                    order.id,
                    order.order_side,
                    order.order_type,
                    fixed_point_to_decimal(order.amount, FIXED_POINT_DECIMALS),
                    fixed_point_to_decimal(order.price, FIXED_POINT_DECIMALS),
                    fixed_point_to_decimal(order.filled, FIXED_POINT_DECIMALS),
                    order.status,
                    if order.status.is_cancellable() {
                        " cancellable"
                    } else {
                        ""
                    },
                );
            }
            Ok(())
        }
        Command::Balances(pair) => {
            let account = wallet_context
                .account()
                .ok_or_else(|| anyhow!("configure a private key"))?;
            let token_balance = tokens.balance_of(pair.token, account).await?;
            let payment_balance = tokens.balance_of(pair.payment, account).await?;
            println!(
                "token {} / payment {}",
                fixed_point_to_decimal(token_balance, FIXED_POINT_DECIMALS),
                fixed_point_to_decimal(payment_balance, FIXED_POINT_DECIMALS),
            );
            Ok(())
        }
        Command::BestPrices(pair) => {
            let prices = market_data.best_prices(pair.token, pair.payment).await?;
            print_prices(&prices);
            Ok(())
        }
        Command::Watch(pair) => {
            let stream = best_price_stream(
                market_data,
                pair.token,
                pair.payment,
                PollConfig {
                    interval: args.poll_interval,
                    jitter: args.poll_jitter,
                },
            );
            futures::pin_mut!(stream);
            while let Some(prices) = stream.next().await {
                print_prices(&prices);
            }
            Ok(())
        }
    }
}

async fn submit(
    submitter: &TradeSubmitter,
    trade: TradeArguments,
    order_side: OrderSide,
) -> Result<()> {
    let order_type = if trade.market {
        OrderType::Market
    } else {
        OrderType::Limit
    };
    let params = TradeParams {
        token_asset: trade.pair.token,
        payment_asset: trade.pair.payment,
        amount: trade.amount,
        price: trade.price.unwrap_or_default(),
        order_type,
        order_side,
    };
    let placement = submitter.submit_trade(&params).await?;
    match placement.order_id {
        Some(id) => println!(
            "order #{} confirmed in block {} ({:?})",
            id, placement.confirmation.block_number, placement.confirmation.transaction_hash
        ),
        None => println!(
            "order confirmed in block {} ({:?})",
            placement.confirmation.block_number, placement.confirmation.transaction_hash
        ),
    }
    Ok(())
}

fn print_prices(prices: &BestPrices) {
    println!(
        "best buy {} / best sell {}",
        fixed_point_to_decimal(prices.best_buy, FIXED_POINT_DECIMALS),
        fixed_point_to_decimal(prices.best_sell, FIXED_POINT_DECIMALS),
    );
}
