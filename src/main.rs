//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod analytics;
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

// Rotas da aplicação (separado do main para os testes montarem o mesmo Router)
pub fn router(app_state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/filters", get(handlers::dashboard::get_filter_options))
        .route("/report", get(handlers::dashboard::get_report))
        .route("/refresh", post(handlers::dashboard::refresh));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Sem credenciais a aplicação não deve iniciar.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("🔥 {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("🔥 Falha ao inicializar o estado da aplicação: {}", e);
            std::process::exit(1);
        }
    };

    let app = router(app_state);

    // Inicia o servidor
    let listener = match TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("🔥 Falha ao iniciar o listener TCP em {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("🚀 Servidor escutando em {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Erro no servidor Axum: {}", e);
        std::process::exit(1);
    }
}
