use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use mailflow::adapters::ai::{OpenAIConfig, OpenAIProvider};
use mailflow::adapters::business::HttpBusinessApi;
use mailflow::adapters::http::{app_router, WebhookAppState};
use mailflow::adapters::mcp::{McpClient, McpMailbox};
use mailflow::adapters::simulated::{SimulatedBusinessApi, SimulatedMailbox};
use mailflow::application::tools::{EndpointPolicy, RegistryError};
use mailflow::application::{
    OrchestrationSettings, ProcessEmailHandler, ToolExecutor, ToolRegistry,
};
use mailflow::config::{AppConfig, ConfigError, ValidationError};
use mailflow::domain::conversation::DEFAULT_SYSTEM_PROMPT;
use mailflow::domain::webhook::WebhookGate;
use mailflow::ports::{AIError, AIProvider, BusinessApi, MailboxService, ServiceError};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("reasoning engine client: {0}")]
    Engine(#[from] AIError),

    #[error("tool collaborator client: {0}")]
    Collaborator(#[from] ServiceError),

    #[error("tool registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let provider: Arc<dyn AIProvider> = Arc::new(build_provider(&config)?);
    let engine = provider.provider_info();
    tracing::info!(provider = %engine.name, model = %engine.model, "Reasoning engine configured");

    let (mailbox, business_api) = build_collaborators(&config)?;

    let endpoints = EndpointPolicy::new(config.tools.business_api_endpoint.clone())
        .with_allowed(&config.tools.allowed_endpoints);
    let registry = ToolRegistry::email_tools(mailbox, business_api, endpoints)?;
    let executor = ToolExecutor::new(Arc::new(registry), config.orchestration.tool_timeout());

    let settings = OrchestrationSettings {
        system_prompt: config
            .orchestration
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        turn_budget: config.orchestration.turn_budget()?,
        engine_timeout: config.ai.timeout(),
        temperature: config.ai.temperature,
        run_deadline: config.server.request_timeout(),
    };
    let processor = ProcessEmailHandler::new(provider, executor, settings);
    let gate = WebhookGate::new(config.webhook.client_state()?);

    let app = app_router(WebhookAppState::new(gate, processor));

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        max_turns = config.orchestration.max_turns,
        simulate = config.tools.simulate,
        "mailflow listening"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = if config.is_production() {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.compact().with_target(false).try_init()
    };
}

fn build_provider(config: &AppConfig) -> Result<OpenAIProvider, StartupError> {
    let api_key = config
        .ai
        .openai_api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;

    let provider_config = OpenAIConfig::from_secret(api_key)
        .with_model(config.ai.model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout());

    Ok(OpenAIProvider::new(provider_config)?)
}

fn build_collaborators(
    config: &AppConfig,
) -> Result<(Arc<dyn MailboxService>, Arc<dyn BusinessApi>), StartupError> {
    if config.tools.simulate {
        tracing::warn!("Using simulated tool collaborators");
        return Ok((
            Arc::new(SimulatedMailbox::new()),
            Arc::new(SimulatedBusinessApi::new()),
        ));
    }

    let timeout: Duration = config.orchestration.tool_timeout();
    let client = McpClient::new(config.tools.mcp_server_url.clone(), timeout)?;
    Ok((
        Arc::new(McpMailbox::new(Arc::new(client))),
        Arc::new(HttpBusinessApi::new(timeout)?),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
