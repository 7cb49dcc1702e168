use std::sync::Arc;

use anyhow::Context;

use ledgerd_api::{app, config::Config, rates};
use ledgerd_convert::Convertor;
use ledgerd_store::PostgresLedgerStore;

/// Currency balances are stored in.
const NATIVE_CURRENCY: &str = "RUB";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ledgerd_observability::init();

    let cfg = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect(&cfg.database_url)
        .await
        .context("failed to connect to database")?;

    let store = PostgresLedgerStore::new(pool);
    store
        .migrate()
        .await
        .context("failed to apply migrations")?;

    // One snapshot for the process lifetime, fetched before any traffic.
    let rate_table = rates::fetch_rate_table(&cfg.exchangerates_token)
        .await
        .context("failed to fetch exchange rates")?;
    let convertor = Convertor::new(rate_table, NATIVE_CURRENCY);

    let app = app::build_app(Arc::new(store), convertor);

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
