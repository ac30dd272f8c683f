//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DocxLoader, GenerationSettings, OpenAiPlanAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use axum::Router;
use lesson_planner_core::{DocumentLoader, LessonPlanController, PlanGenerator};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let loader: Arc<dyn DocumentLoader> = Arc::new(DocxLoader::new());

    // A missing credential keeps the server up with generation disabled.
    let generator: Option<Arc<dyn PlanGenerator>> = match config.credential() {
        Ok(api_key) => {
            info!(model = %config.generation_model, "Generation engine ready.");
            Some(Arc::new(OpenAiPlanAdapter::new(GenerationSettings {
                api_key: api_key.to_string(),
                api_base: config.generation_api_base.clone(),
                model: config.generation_model.clone(),
            })))
        }
        Err(e) => {
            warn!("Generation disabled: {}", e);
            None
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        controller: LessonPlanController::new(loader, generator),
    });

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
