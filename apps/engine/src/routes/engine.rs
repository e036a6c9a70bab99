//! Axum route handlers for the engine API (`/api/v1`).

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::heuristics::jobs::{
    detect_job_fraud, verify_job_listing, JobFraudReport, JobListing, JobVerification,
};
use crate::heuristics::marketplace::{
    categorize_marketplace_item, detect_marketplace_fraud, estimate_marketplace_item_value,
    suggest_marketplace_item_price, verify_marketplace_item, CategorySuggestion,
    MarketplaceFraudReport, MarketplaceItem, MarketplaceVerification, PriceSuggestion,
    ValueEstimate,
};
use crate::heuristics::matching::{match_student_to_jobs, JobMatch, JobOpening, StudentProfile};
use crate::heuristics::resume::{extract_resume_skills, ResumeSkills};
use crate::heuristics::task::{
    analyze_task_complexity, analyze_task_scale, analyze_task_urgency, TaskComplexity,
    TaskScale, TaskUrgency,
};
use crate::heuristics::verification::{verify_business, verify_voucher, VerificationResult};
use crate::imaging::generate_city_image;
use crate::knowledge::{generate_knowledge_graph, KnowledgeGraph};
use crate::prng::{cosine_similarity, generate_embeddings};
use crate::state::AppState;
use crate::templates::job::{generate_job_description, JobDescriptionParams};
use crate::templates::marketplace::{generate_marketplace_listing, MarketplaceListingParams};
use crate::templates::property::{generate_property_description, PropertyDescriptionParams};
use crate::templates::{simulate_latency, ANALYSIS_LATENCY_MS, COPY_LATENCY_MS, IMAGE_LATENCY_MS};
use crate::version::{check_availability, Availability};

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
}

fn require_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/content/property-description
pub async fn handle_property_description(
    State(state): State<AppState>,
    AppJson(params): AppJson<PropertyDescriptionParams>,
) -> Result<Json<ContentResponse>, AppError> {
    require_title(&params.title)?;
    simulate_latency(state.config.simulate_latency, COPY_LATENCY_MS).await;
    let content = generate_property_description(&params, &mut rand::thread_rng());
    Ok(Json(ContentResponse { content }))
}

/// POST /api/v1/content/job-description
pub async fn handle_job_description(
    State(state): State<AppState>,
    AppJson(params): AppJson<JobDescriptionParams>,
) -> Result<Json<ContentResponse>, AppError> {
    require_title(&params.title)?;
    simulate_latency(state.config.simulate_latency, COPY_LATENCY_MS).await;
    let content = generate_job_description(&params, &mut rand::thread_rng());
    Ok(Json(ContentResponse { content }))
}

/// POST /api/v1/content/marketplace-listing
pub async fn handle_marketplace_listing(
    State(state): State<AppState>,
    AppJson(params): AppJson<MarketplaceListingParams>,
) -> Result<Json<ContentResponse>, AppError> {
    require_title(&params.title)?;
    simulate_latency(state.config.simulate_latency, COPY_LATENCY_MS).await;
    let content = generate_marketplace_listing(&params, &mut rand::thread_rng());
    Ok(Json(ContentResponse { content }))
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TaskAnalysisRequest {
    pub task: String,
    #[serde(default)]
    pub constraints: String,
}

#[derive(Debug, Serialize)]
pub struct TaskAnalysis {
    pub complexity: TaskComplexity,
    pub urgency: TaskUrgency,
    pub scale: TaskScale,
}

/// POST /api/v1/analysis/task
pub async fn handle_task_analysis(
    State(state): State<AppState>,
    AppJson(req): AppJson<TaskAnalysisRequest>,
) -> Json<TaskAnalysis> {
    simulate_latency(state.config.simulate_latency, ANALYSIS_LATENCY_MS).await;
    Json(TaskAnalysis {
        complexity: analyze_task_complexity(&req.task),
        urgency: analyze_task_urgency(&req.constraints),
        scale: analyze_task_scale(&req.task, &req.constraints),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Marketplace
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/marketplace/verify
pub async fn handle_marketplace_verify(
    AppJson(item): AppJson<MarketplaceItem>,
) -> Json<MarketplaceVerification> {
    Json(verify_marketplace_item(&item))
}

/// POST /api/v1/marketplace/fraud
pub async fn handle_marketplace_fraud(
    AppJson(item): AppJson<MarketplaceItem>,
) -> Json<MarketplaceFraudReport> {
    Json(detect_marketplace_fraud(&item))
}

/// POST /api/v1/marketplace/categorize
pub async fn handle_marketplace_categorize(
    AppJson(item): AppJson<MarketplaceItem>,
) -> Json<CategorySuggestion> {
    Json(categorize_marketplace_item(&item))
}

/// POST /api/v1/marketplace/price
pub async fn handle_marketplace_price(
    AppJson(item): AppJson<MarketplaceItem>,
) -> Json<PriceSuggestion> {
    Json(suggest_marketplace_item_price(&item))
}

/// POST /api/v1/marketplace/value
pub async fn handle_marketplace_value(
    AppJson(item): AppJson<MarketplaceItem>,
) -> Json<ValueEstimate> {
    Json(estimate_marketplace_item_value(&item))
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs & resumes
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/fraud
pub async fn handle_job_fraud(AppJson(job): AppJson<JobListing>) -> Json<JobFraudReport> {
    Json(detect_job_fraud(&job))
}

/// POST /api/v1/jobs/verify
pub async fn handle_job_verify(AppJson(job): AppJson<JobListing>) -> Json<JobVerification> {
    Json(verify_job_listing(&job))
}

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub student: StudentProfile,
    #[serde(default)]
    pub jobs: Vec<JobOpening>,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub matches: Vec<JobMatch>,
}

/// POST /api/v1/jobs/match
pub async fn handle_job_match(AppJson(req): AppJson<JobMatchRequest>) -> Json<JobMatchResponse> {
    Json(JobMatchResponse {
        matches: match_student_to_jobs(&req.student, &req.jobs),
    })
}

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub text: String,
}

/// POST /api/v1/resume/skills
pub async fn handle_resume_skills(AppJson(req): AppJson<ResumeRequest>) -> Json<ResumeSkills> {
    Json(extract_resume_skills(&req.text))
}

// ────────────────────────────────────────────────────────────────────────────
// Verification (raw bodies: malformed JSON yields a low-confidence result, not a 4xx)
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/verification/business
pub async fn handle_verify_business(body: String) -> Json<VerificationResult> {
    Json(verify_business(&body))
}

/// POST /api/v1/verification/voucher
pub async fn handle_verify_voucher(body: String) -> Json<VerificationResult> {
    Json(verify_voucher(&body, Utc::now().date_naive()))
}

// ────────────────────────────────────────────────────────────────────────────
// Images, knowledge graph, availability
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CityImageRequest {
    pub city: String,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityImageResponse {
    pub image_url: String,
}

/// POST /api/v1/images/city
pub async fn handle_city_image(
    State(state): State<AppState>,
    AppJson(req): AppJson<CityImageRequest>,
) -> Result<Json<CityImageResponse>, AppError> {
    simulate_latency(state.config.simulate_latency, IMAGE_LATENCY_MS).await;
    let style = req.style.as_deref().unwrap_or("photorealistic");
    let image_url = generate_city_image(&req.city, style)?;
    Ok(Json(CityImageResponse { image_url }))
}

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub similarity: f32,
}

/// POST /api/v1/similarity
///
/// Cosine similarity of the two texts' fingerprint embeddings. Lexical, not semantic.
pub async fn handle_similarity(
    AppJson(req): AppJson<SimilarityRequest>,
) -> Json<SimilarityResponse> {
    let similarity = cosine_similarity(&generate_embeddings(&req.a), &generate_embeddings(&req.b));
    Json(SimilarityResponse { similarity })
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeGraphRequest {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub concepts: Vec<String>,
}

/// POST /api/v1/knowledge-graph
pub async fn handle_knowledge_graph(
    State(state): State<AppState>,
    AppJson(req): AppJson<KnowledgeGraphRequest>,
) -> Json<KnowledgeGraph> {
    simulate_latency(state.config.simulate_latency, ANALYSIS_LATENCY_MS).await;
    Json(generate_knowledge_graph(&req.domain, &req.concepts))
}

/// GET /api/v1/availability
pub async fn handle_availability(State(state): State<AppState>) -> Json<Availability> {
    Json(check_availability(
        &state.version,
        state.chain.names(),
        &mut rand::thread_rng(),
        Utc::now(),
    ))
}
