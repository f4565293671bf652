use mondo_api::{
    config::{get_config, init_config, LogFormat},
    database::pool::{create_pool, run_migrations},
    routes::build_router,
    services::token_cleanup::start_token_cleanup,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    init_tracing(config.log_format);

    let pool = create_pool().await?;
    run_migrations(&pool).await?;

    let app_state = AppState::new(pool)?;
    if !app_state.extraction_service.is_enabled() {
        tracing::warn!("OPENAI_API_KEY is not set; question extraction is disabled");
    }

    // Dropping the scheduler stops the job, so it lives for the whole process.
    let _token_cleanup = start_token_cleanup(app_state.auth_service.clone()).await?;

    let app = build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
