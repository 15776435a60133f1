//! Backend entry-point: wires the in-memory store, REST endpoints and
//! OpenAPI docs.

use std::env;

use actix_web::{web, App, HttpServer};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::bootstrap::{configure_routes, memory_state};
use backend::inbound::http::health::HealthState;
#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::Trace;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let secret_path =
        env::var("TOKEN_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/token_secret".into());
    let secret = match std::fs::read(&secret_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using ephemeral signing secret (dev only)");
                uuid::Uuid::new_v4().as_bytes().to_vec()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read token secret at {secret_path}: {e}"
                )));
            }
        }
    };

    let state = web::Data::new(memory_state(&secret));
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .configure(configure_routes);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(("0.0.0.0", 8080))?;

    health_state.mark_ready();
    server.run().await
}
