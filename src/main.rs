//! Demo server for the request validation middleware.
//!
//! ```text
//! GET  /users/{id}   path parameters   → UserPath
//! GET  /users        query string      → UserSearch
//! POST /users        JSON body         → NewUser
//! POST /signup       form body         → Signup
//! POST /import       XML body          → Import
//! ```

use std::path::PathBuf;

use axum::extract::Request;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use validator::Validate;

use request_gate::config::{load_config, GateConfig};
use request_gate::observability::logging;
use request_gate::{Settings, Source, ValidatedExt};

#[derive(Parser)]
#[command(name = "request-gate")]
#[command(about = "Demo server validating path, query, form, JSON and XML input", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct UserPath {
    #[validate(range(min = 1))]
    id: u64,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct UserSearch {
    #[validate(length(min = 1, max = 64))]
    name: Option<String>,
    #[serde(default)]
    tag: Vec<String>,
    #[serde(default)]
    active: bool,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct Profile {
    #[validate(email)]
    email: String,
    #[validate(url)]
    homepage: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct NewUser {
    #[validate(length(min = 1, max = 64))]
    name: String,
    #[validate(range(min = 13, max = 150))]
    age: u8,
    #[validate(nested)]
    profile: Profile,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct Signup {
    #[validate(length(min = 3))]
    username: String,
    #[validate(length(min = 8))]
    password: String,
    #[validate(must_match(other = "password"))]
    confirm: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
struct Import {
    #[validate(length(min = 1))]
    batch: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    sku: Vec<String>,
}

async fn show_user(req: Request) -> Json<serde_json::Value> {
    let path = req.validated::<UserPath>(Source::Params);
    Json(serde_json::json!({ "id": path.id }))
}

async fn search_users(req: Request) -> Json<serde_json::Value> {
    let search = req.validated::<UserSearch>(Source::Query);
    Json(serde_json::json!({ "search": &*search }))
}

async fn create_user(req: Request) -> Json<serde_json::Value> {
    let user = req.validated::<NewUser>(Source::Json);
    tracing::info!(name = %user.name, "user created");
    Json(serde_json::json!({ "created": &*user }))
}

async fn signup(req: Request) -> String {
    let form = req.validated::<Signup>(Source::Form);
    format!("welcome, {}", form.username)
}

async fn import(req: Request) -> String {
    let batch = req.validated::<Import>(Source::Xml);
    format!("imported {} items in batch {}", batch.sku.len(), batch.batch)
}

fn app(settings: &Settings) -> Router {
    Router::new()
        .route(
            "/users/{id}",
            get(show_user).route_layer(settings.layer::<UserPath>(Source::Params)),
        )
        .route(
            "/users",
            get(search_users)
                .route_layer(settings.layer::<UserSearch>(Source::Query))
                .merge(post(create_user).route_layer(settings.layer::<NewUser>(Source::Json))),
        )
        .route(
            "/signup",
            post(signup).route_layer(settings.layer::<Signup>(Source::Form)),
        )
        .route(
            "/import",
            post(import).route_layer(settings.layer::<Import>(Source::Xml)),
        )
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    logging::init(&config.logging)?;

    tracing::info!(
        bind_address = %config.server.bind_address,
        body_limit = config.body.limit_bytes,
        error_format = ?config.errors.format,
        "Configuration loaded"
    );

    let settings = Settings::from_config(&config);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app(&settings))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
