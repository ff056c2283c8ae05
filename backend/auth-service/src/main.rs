/// Auth Service Main Entry Point
///
/// Serves session verification for every other Campus service.
use actix_middleware::RequestLogging;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use auth_service::config::Config;
use session_authz::{AuthorizationService, SessionCodec};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        env = %config.app.env,
        host = %config.app.host,
        port = config.app.port,
        "Starting auth-service"
    );

    let service = web::Data::new(AuthorizationService::new(SessionCodec::new(
        config.session_key.clone(),
    )));

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(RequestLogging::new("auth-service"))
            .configure(auth_service::configure)
    })
    .bind(config.app.bind_address())
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server failed")?;

    info!("auth-service stopped");
    Ok(())
}

/// JSON logs unless `LOG_FORMAT=pretty`.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "auth_service=info,info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => builder.pretty().init(),
        _ => builder.json().init(),
    }
}
