use anyhow::Context;
use blogicum::{repository::PgRepository, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting blogicum");
    tracing::info!("Web server will listen on: {}", config.web_addr());

    let db_pool = blogicum::db::create_pool(
        &config.database_url,
        config.max_connections,
        config.acquire_timeout(),
    )
    .await
    .context("Failed to connect to database")?;

    blogicum::db::run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;

    let state = blogicum::web::AppState::new(PgRepository::new(db_pool));
    let app = blogicum::web::app(state, &config.static_dir);

    blogicum::web::serve(config.web_addr(), app).await?;

    Ok(())
}
