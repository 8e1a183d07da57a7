use coinboard::CoinboardError;
use coinboard::config::fetch_config;
use coinboard::gateway::UpbitGateway;
use coinboard::store::{Hub, StartupOutcome};
use tokio::task::LocalSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CoinboardError> {
    // Initialize tracing subscriber for logging output, honouring RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app_config = fetch_config()?;
    let gateway = UpbitGateway::new(app_config.upbit)?;

    LocalSet::new()
        .run_until(async move {
            let hub = Hub::new(gateway);

            match hub.run_startup().await {
                StartupOutcome::Completed { markets } => info!(markets, "Dashboard data ready"),
                StartupOutcome::CatalogFailed(failure) | StartupOutcome::SeriesFailed(failure) => {
                    error!(error = %failure, "Dashboard data incomplete");
                }
            }

            let state = hub.state();
            let mut markets: Vec<_> = state.candle.data.iter().collect();
            markets.sort_by(|a, b| a.0.cmp(b.0));
            for (market, record) in markets {
                let name = state.market_name.data.get(market).map_or("?", String::as_str);
                info!(
                    market = market.as_str(),
                    name,
                    candles = record.candles.len(),
                    acc_trade_price = %record.acc_trade_price,
                    change_rate = %record.change_rate,
                    "Market"
                );
            }
        })
        .await;

    Ok(())
}
