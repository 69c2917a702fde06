use tokio::net::TcpListener;
use tracing::info;
use voyage::config::AppConfig;
use voyage::error::AppError;
use voyage::routes::create_router;
use voyage::services::{attachments::AttachmentRegistry, places::PlaceLookup, store::TripStore};
use voyage::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    let store = TripStore::new(config.data_root.clone());
    store.ensure_structure().await?;
    let trips = store.load_trips().await?;
    info!(trips = trips.len(), "trip collection ready");

    let attachments = AttachmentRegistry::new();
    let places = PlaceLookup::new(
        config.places_url.clone(),
        config.places_user_agent.clone(),
    );

    let state = AppState::new(config.clone(), store, attachments, places);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,voyage=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
