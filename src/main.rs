//! IVR dialog engine
//!
//! Answers phone calls for the car and documents hotline: greets the caller,
//! records their answers, transcribes them, and tells the telephony transport
//! what to do next.

mod api;
mod config;
mod runtime;
mod speech;
mod state_machine;

use api::{create_router, AppState};
use config::{IvrConfig, SpeechConfig};
use runtime::{DialogEngine, SessionRegistry};
use speech::{CognitiveSpeechService, TranscriptionGateway};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ivr_engine=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let ivr_config = IvrConfig::from_env();
    let speech_config = SpeechConfig::from_env();
    let api_key = speech_config
        .api_key
        .clone()
        .ok_or("SPEECH_API_KEY must be set")?;

    tracing::info!(
        recording_format = ?ivr_config.recording_format,
        max_record_seconds = ivr_config.max_record_seconds,
        max_topic_retries = ?ivr_config.max_topic_retries,
        locale = %speech_config.locale,
        "Configuration loaded"
    );

    // Speech provider
    let provider = CognitiveSpeechService::new(&speech_config, api_key)?;
    let gateway = TranscriptionGateway::new(Arc::new(provider)).with_timeout(speech_config.timeout);

    // Create application state
    let port = ivr_config.port;
    let engine = DialogEngine::new(Arc::new(SessionRegistry::new()), gateway, ivr_config);
    let state = AppState::new(engine);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("IVR engine listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
