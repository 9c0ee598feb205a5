use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use shoe_concierge::adapters::composer::{LlmComposerConfig, LlmReplyComposer, TemplateReplyComposer};
use shoe_concierge::adapters::http::{chat_routes, ChatHandlers};
use shoe_concierge::adapters::{
    InMemorySessionStore, JsonCatalog, JsonOrderRecorder, SimulatedPaymentProcessor,
    TelegramClient, TelegramPoller,
};
use shoe_concierge::application::{
    ChatDispatcher, ConversationService, ConversationSettings, PlaceOrderHandler,
};
use shoe_concierge::config::{AppConfig, ComposerKind, LogFormat, ServerConfig};
use shoe_concierge::ports::ReplyComposer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let catalog = Arc::new(JsonCatalog::new(
        &config.catalog.products_path,
        &config.catalog.inventory_path,
    ));
    let orders = PlaceOrderHandler::new(
        catalog.clone(),
        Arc::new(SimulatedPaymentProcessor::with_decline_all(
            config.payment.decline_all,
        )),
        Arc::new(JsonOrderRecorder::new(&config.catalog.orders_path)),
        config.payment.method.clone(),
        config.collaborators.call_timeout(),
    );
    let service = Arc::new(ConversationService::new(
        Arc::new(InMemorySessionStore::new()),
        catalog,
        build_composer(&config)?,
        orders,
        ConversationSettings {
            page_size: config.dialogue.page_size,
            call_timeout: config.collaborators.call_timeout(),
        },
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = match &config.telegram.bot_token {
        Some(token) if config.telegram.is_enabled() => {
            let client = Arc::new(TelegramClient::new(
                token.clone(),
                config.telegram.api_base.clone(),
                config.telegram.poll_timeout(),
            )?);
            let dispatcher = ChatDispatcher::new(
                service.clone(),
                client.clone(),
                Duration::from_secs(config.dialogue.worker_idle_secs),
            );
            Some(tokio::spawn(
                TelegramPoller::new(client, dispatcher).run(shutdown_rx),
            ))
        }
        _ => {
            tracing::info!("Telegram transport disabled (no bot token)");
            None
        }
    };

    let app = chat_routes(ChatHandlers::new(service))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        products = %config.catalog.products_path.display(),
        "Shoe concierge listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Receiver may already be gone if the poller exited on its own.
    let _ = shutdown_tx.send(true);
    if let Some(handle) = poller {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Telegram poller task failed");
        }
    }
    tracing::info!("Shut down cleanly");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn build_composer(
    config: &AppConfig,
) -> Result<Arc<dyn ReplyComposer>, Box<dyn std::error::Error>> {
    match (config.composer.kind, &config.composer.api_key) {
        (ComposerKind::Llm, Some(api_key)) => {
            let llm = LlmComposerConfig::new(api_key.expose_secret().clone())
                .with_model(config.composer.model.clone())
                .with_base_url(config.composer.base_url.clone())
                .with_timeout(config.composer.timeout());
            tracing::info!(model = %config.composer.model, "Using model-backed reply composer");
            Ok(Arc::new(LlmReplyComposer::new(llm)?))
        }
        _ => Ok(Arc::new(TemplateReplyComposer::new())),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
