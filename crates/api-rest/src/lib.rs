//! # API REST
//!
//! HTTP surface for Emporium.
//!
//! Handles:
//! - Text pages at `/text/:slug`, resolved per language and served as HTML
//! - JSON endpoints for health and the commodity catalog
//! - OpenAPI/Swagger documentation, CORS and request tracing
//!
//! Content logic lives in `emporium-core`; this crate only maps it onto routes and status codes.

#![warn(rust_2018_idioms)]

mod page;

pub use page::PageRenderer;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use emporium_core::{
    CatalogStore, CommodityRecord, ContentResult, CoreConfig, LocalizedContentResolver, Resolved,
    Slug, TextStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub const GREETING: &str = "Hello remote world!\n";
const NOT_FOUND_BODY: &str = "Not Found";
const TEXT_ERROR_BODY: &str = "Error retrieving text";

#[derive(OpenApi)]
#[openapi(
    paths(health, list_commodities, show_commodity),
    components(schemas(HealthRes, CommodityRes, ListCommoditiesRes))
)]
struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    texts: TextStore,
    catalog: CatalogStore,
    resolver: Arc<LocalizedContentResolver>,
    pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Result<Self, upon::Error> {
        Ok(Self {
            texts: TextStore::new(cfg.clone()),
            catalog: CatalogStore::new(cfg),
            resolver: Arc::new(LocalizedContentResolver::commonmark()),
            pages: Arc::new(PageRenderer::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/text/:slug", get(show_text))
        .route("/commodities", get(list_commodities))
        .route("/commodities/:name", get(show_commodity))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    GREETING
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthRes)
    )
)]
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Emporium is alive".into(),
    })
}

#[derive(Deserialize)]
struct TextQuery {
    lang: Option<String>,
}

/// Serves a text document as an HTML page.
///
/// A cache fill is written back before responding. If that write fails the page is still served
/// and the next request renders again.
async fn show_text(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<TextQuery>,
) -> Response {
    // A string that cannot be a slug cannot name a stored document.
    let Ok(slug) = Slug::new(&slug) else {
        return (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response();
    };

    let texts = state.texts.clone();
    let resolver = state.resolver.clone();
    let lookup_slug = slug.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        resolve_and_persist(&texts, &resolver, &lookup_slug, query.lang.as_deref())
    })
    .await;

    let resolved = match outcome {
        Ok(Ok(Some(resolved))) => resolved,
        Ok(Ok(None)) => return (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Failed to resolve text {}: {:?}", slug, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, TEXT_ERROR_BODY).into_response();
        }
        Err(e) => {
            tracing::error!("Text task for {} did not complete: {:?}", slug, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, TEXT_ERROR_BODY).into_response();
        }
    };

    match state
        .pages
        .text_page(slug.as_str(), &resolved.html, resolved.variant.language())
    {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page for {}: {:?}", slug, e);
            (StatusCode::INTERNAL_SERVER_ERROR, TEXT_ERROR_BODY).into_response()
        }
    }
}

fn resolve_and_persist(
    texts: &TextStore,
    resolver: &LocalizedContentResolver,
    slug: &Slug,
    language: Option<&str>,
) -> ContentResult<Option<Resolved>> {
    let Some(mut document) = texts.fetch_by_slug(slug)? else {
        return Ok(None);
    };

    let resolved = resolver.resolve_html(&mut document, language)?;
    if resolved.cache_filled {
        if let Err(e) = texts.save(&document) {
            tracing::warn!(%slug, variant = %resolved.variant, "failed to persist rendered html: {}", e);
        }
    }
    Ok(Some(resolved))
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CommodityRes {
    pub id: String,
    pub name: String,
    pub storage: String,
    pub min_level: u32,
    pub max_level: Option<u32>,
    /// Id of the text document describing this commodity, if any.
    pub description_id: Option<String>,
}

impl From<&CommodityRecord> for CommodityRes {
    fn from(record: &CommodityRecord) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            storage: record.storage().to_string(),
            min_level: record.effective_min_level(),
            max_level: record.max_level(),
            description_id: record.description().map(|id| id.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ListCommoditiesRes {
    pub commodities: Vec<CommodityRes>,
}

#[utoipa::path(
    get,
    path = "/commodities",
    responses(
        (status = 200, description = "All commodities, sorted by name", body = ListCommoditiesRes),
        (status = 500, description = "Internal server error")
    )
)]
async fn list_commodities(
    State(state): State<AppState>,
) -> Result<Json<ListCommoditiesRes>, (StatusCode, &'static str)> {
    let catalog = state.catalog.clone();
    let records = tokio::task::spawn_blocking(move || catalog.list())
        .await
        .map_err(|e| {
            tracing::error!("Commodity list task did not complete: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error listing commodities",
            )
        })?;

    Ok(Json(ListCommoditiesRes {
        commodities: records.iter().map(CommodityRes::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/commodities/{name}",
    params(
        ("name" = String, Path, description = "Exact commodity name")
    ),
    responses(
        (status = 200, description = "Commodity found", body = CommodityRes),
        (status = 404, description = "Commodity not found"),
        (status = 500, description = "Internal server error")
    )
)]
async fn show_commodity(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CommodityRes>, (StatusCode, &'static str)> {
    let catalog = state.catalog.clone();
    let lookup = name.clone();
    let found = tokio::task::spawn_blocking(move || catalog.find_by_name(&lookup))
        .await
        .map_err(|e| {
            tracing::error!("Commodity lookup task did not complete: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error retrieving commodity",
            )
        })?
        .map_err(|e| {
            tracing::error!("Failed to look up commodity {}: {:?}", name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error retrieving commodity",
            )
        })?;

    match found {
        Some(record) => Ok(Json(CommodityRes::from(&record))),
        None => Err((StatusCode::NOT_FOUND, NOT_FOUND_BODY)),
    }
}
