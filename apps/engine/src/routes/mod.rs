pub mod engine;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::openai;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // OpenAI-compatible shim
        .nest("/v1", openai::router())
        // Content
        .route(
            "/api/v1/content/property-description",
            post(engine::handle_property_description),
        )
        .route(
            "/api/v1/content/job-description",
            post(engine::handle_job_description),
        )
        .route(
            "/api/v1/content/marketplace-listing",
            post(engine::handle_marketplace_listing),
        )
        // Analysis
        .route("/api/v1/analysis/task", post(engine::handle_task_analysis))
        // Marketplace
        .route(
            "/api/v1/marketplace/verify",
            post(engine::handle_marketplace_verify),
        )
        .route(
            "/api/v1/marketplace/fraud",
            post(engine::handle_marketplace_fraud),
        )
        .route(
            "/api/v1/marketplace/price",
            post(engine::handle_marketplace_price),
        )
        .route(
            "/api/v1/marketplace/categorize",
            post(engine::handle_marketplace_categorize),
        )
        .route(
            "/api/v1/marketplace/value",
            post(engine::handle_marketplace_value),
        )
        // Jobs & resumes
        .route("/api/v1/jobs/fraud", post(engine::handle_job_fraud))
        .route("/api/v1/jobs/verify", post(engine::handle_job_verify))
        .route("/api/v1/jobs/match", post(engine::handle_job_match))
        .route("/api/v1/resume/skills", post(engine::handle_resume_skills))
        // Verification
        .route(
            "/api/v1/verification/business",
            post(engine::handle_verify_business),
        )
        .route(
            "/api/v1/verification/voucher",
            post(engine::handle_verify_voucher),
        )
        // Images, knowledge graph, availability
        .route("/api/v1/images/city", post(engine::handle_city_image))
        .route("/api/v1/knowledge-graph", post(engine::handle_knowledge_graph))
        .route("/api/v1/similarity", post(engine::handle_similarity))
        .route("/api/v1/availability", get(engine::handle_availability))
        .with_state(state)
}
