mod catalog;
mod config;
mod error;
mod llm;
mod routes;
mod services;
mod state;
mod supabase;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let (app, port) = match config::AppConfig::from_env() {
        Ok(cfg) => {
            let llm = llm::LlmClient::from_config(cfg.llm.clone()).expect("LLM client init failed");
            tracing::info!(provider = llm.provider(), model = llm.model(), "LLM client initialized");

            let supabase = Arc::new(supabase::SupabaseClient::new(&cfg.supabase).expect("Supabase client init failed"));
            let state = state::AppState::new(Arc::new(llm), supabase.clone(), supabase)
                .with_cookie_secure(cfg.cookie_secure);

            tracing::info!(static_dir = %cfg.static_dir.display(), "serving page shell");
            (routes::app(state, &cfg.static_dir), cfg.port)
        }
        Err(e) => {
            tracing::warn!(error = %e, "configuration incomplete, serving configuration error page");
            let port = std::env::var("PORT")
                .ok()
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(config::DEFAULT_PORT);
            (routes::config_error_app(&e), port)
        }
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "cctv prompt studio listening");
    axum::serve(listener, app).await.expect("server failed");
}
