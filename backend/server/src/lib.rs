//! Backend for a website contact form.
//!
//!
//!
//! # Flow
//! - `POST /api/contact` with `fullName`, `email`, `phoneNumber`, `message`
//! - All four must be present and non-empty, otherwise 400 and nothing happens
//! - The submission is saved to Redis first
//! - Only after the save succeeds is an email sent to the site owner
//! - A failed email does **not** remove the saved record, the owner can still find it in Redis
//!
//!
//!
//! # Responses
//!
//! | case                        | status | message                                  |
//! |-----------------------------|--------|------------------------------------------|
//! | saved and emailed           | 200    | `Form submitted successfully!`           |
//! | missing field               | 400    | `All fields are required.`               |
//! | body is not the JSON object | 400    | `Malformed payload`                      |
//! | not saved, or not emailed   | 500    | `Error submitting form. Email not sent.` |
//!
//! Details of any failure only go to the logs.
//!
//!
//!
//! # Setup
//!
//! Environment.
//! ```sh
//! export EMAIL_USER=you@gmail.com
//! export EMAIL_PASS=app-password   # or /run/secrets/EMAIL_PASS
//! export EMAIL_TO=inbox@example.com
//! export REDIS_URL=redis://127.0.0.1:6379
//! export PORT=5000
//! ```
//!
//! Run.
//! ```sh
//! RUST_LOG=info cargo run --bin contact
//! ```
//!
//! Try it.
//! ```sh
//! curl -X POST localhost:5000/api/contact \
//!   -H 'Content-Type: application/json' \
//!   -d '{"fullName":"Jane Doe","email":"jane@x.com","phoneNumber":"555-1234","message":"hi"}'
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod mail;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use error::StartupError;
use routes::{contact_handler, health_handler};
use state::State;

pub async fn start_server() -> Result<(), StartupError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await.inspect_err(|e| {
        error!("Failed to initialize state: {e}");
    })?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(health_handler))
        .route("/api/contact", post(contact_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;

                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
