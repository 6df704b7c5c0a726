mod agent;
mod chat;
mod config;
mod errors;
mod llm_client;
mod models;
mod notification;
mod profile;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::{NotificationTool, Persona, PersonaAgent, Tool};
use crate::chat::orchestrator::TurnOrchestrator;
use crate::chat::session::SessionStore;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notification::SmtpNotifier;
use crate::profile::load_profile;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting persona API v{}", env!("CARGO_PKG_VERSION"));

    // Persona profile: unreadable sources are fatal
    let profile = load_profile(&config.persona_name, &config.resume_path, &config.summary_path)?;

    // Notification gateway + the single tool the agent may use
    let notifier = Arc::new(SmtpNotifier::new(config.notification.clone()));
    let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(NotificationTool::new(notifier))];

    // Reasoning engine
    let llm = LlmClient::new(config.model.clone())?;
    if config.model.api_base.is_none() || config.model.api_key.is_none() {
        warn!("Model credentials are missing; every turn will answer with an error");
    }
    info!("LLM client initialized (deployment: {})", llm.deployment());

    let agent = PersonaAgent::new(
        Persona::from_profile(&profile),
        tools,
        Arc::new(llm),
        config.max_tool_rounds,
    );
    info!(
        "Persona agent ready for {} (max tool rounds: {})",
        profile.display_name, config.max_tool_rounds
    );

    // Build app state
    let state = AppState {
        orchestrator: Arc::new(TurnOrchestrator::new(agent)),
        sessions: Arc::new(SessionStore::new(config.max_sessions)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the chat page has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
