// ============================================================================
// agent-server — HTTP surface for the Sui Agent
// ============================================================================
// Wires the core components to their production collaborators and exposes
// them under /api/v1: chat, execute, contacts/save, contacts/list, health.
// ============================================================================

mod error;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{
    ActionDispatcher, ContactVault, DryRunBuilder, InMemoryVaultIndex, IntentClassifier,
    OpenAiClassifier, SealCipher, Settings, SuiRpcGateway, TransactionExecutor, WalrusStore,
};

/// Request timeout for the whole surface; external collaborators own any
/// tighter deadlines.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn IntentClassifier>,
    pub dispatcher: Arc<ActionDispatcher>,
    pub executor: Arc<TransactionExecutor>,
    pub vault: Arc<ContactVault>,
}

impl AppState {
    fn from_settings(settings: &Settings) -> Self {
        let classifier: Arc<dyn IntentClassifier> = Arc::new(OpenAiClassifier::new(
            settings.classifier_api_url.clone(),
            settings.classifier_api_key.clone(),
            settings.classifier_model.clone(),
        ));
        let gateway = Arc::new(SuiRpcGateway::new(settings.clone()));
        let cipher = Arc::new(SealCipher::new(settings.seal_service_url.clone()));
        let store = Arc::new(WalrusStore::new(
            settings.walrus_publisher_url.clone(),
            settings.walrus_aggregator_url.clone(),
        ));

        let dispatcher = Arc::new(ActionDispatcher::new(
            gateway.clone(),
            cipher.clone(),
            DryRunBuilder::new(classifier.clone()),
        ));
        let executor = Arc::new(TransactionExecutor::new(gateway));
        let vault = Arc::new(ContactVault::new(
            cipher,
            store,
            Arc::new(InMemoryVaultIndex::new()),
        ));

        Self {
            classifier,
            dispatcher,
            executor,
            vault,
        }
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/chat", post(routes::chat))
        .route("/api/v1/execute", post(routes::execute))
        .route("/api/v1/contacts/save", post(routes::save_contact))
        .route("/api/v1/contacts/list", get(routes::list_contacts))
        .route("/api/v1/health", get(routes::health))
        .with_state(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_server=info,agent_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("loading settings")?;
    let bind_addr = format!("{}:{}", settings.api_host, settings.api_port);

    let state = AppState::from_settings(&settings);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(
        address = %bind_addr,
        network = %settings.sui_network,
        "Sui Agent server starting"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
