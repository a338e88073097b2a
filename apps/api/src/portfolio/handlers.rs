use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::portfolio::ingest::{ingest_resume, IngestOutcome, MSG_SAVED};
use crate::portfolio::models::CandidateRecord;
use crate::portfolio::normalize::normalize;
use crate::portfolio::slug;
use crate::portfolio::store::{self, NewPortfolio};
use crate::state::AppState;

/// POST /api/v1/ai/parse
/// Multipart upload: `resume` (PDF) plus optional `currentUser` email.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut file: Option<(Option<String>, bytes::Bytes)> = None;
    let mut current_user: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("resume") => {
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {e}")))?;
                file = Some((content_type, data));
            }
            Some("currentUser") => {
                current_user = field.text().await.ok();
            }
            _ => {}
        }
    }

    let (content_type, data) =
        file.ok_or_else(|| AppError::InvalidInput("Resume file is required".to_string()))?;

    let outcome = ingest_resume(&state, &data, content_type.as_deref(), current_user.as_deref())
        .await?;

    let body = match outcome {
        IngestOutcome::Persisted(row) => json!({
            "message": MSG_SAVED,
            "portfolio": row,
        }),
        IngestOutcome::Preview { message, portfolio } => json!({
            "message": message,
            "portfolio": portfolio,
        }),
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub user_email: String,
    /// Client-proposed slug; allocated from `name` when absent.
    pub slug: Option<String>,
    #[serde(flatten)]
    pub portfolio: CandidateRecord,
}

/// POST /api/v1/portfolio/publish
/// Idempotent per slug: re-submitting the same draft returns the stored
/// record instead of creating a duplicate.
pub async fn handle_publish(
    State(state): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> Result<Response, AppError> {
    if req.user_email.trim().is_empty() {
        return Err(AppError::InvalidInput("userEmail is required".to_string()));
    }

    let record = normalize(req.portfolio);

    let proposed = match req.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slug::allocate(&record.name, &state.db).await?,
    };

    let result = store::create_or_get_existing(
        &state.db,
        NewPortfolio {
            user_email: req.user_email.trim().to_string(),
            slug: proposed,
            record,
        },
    )
    .await?;

    // The gateway reports found-vs-created itself; a separate existence
    // pre-check could disagree with it under concurrent publishes.
    let (status, message) = if result.created {
        (StatusCode::CREATED, "Portfolio created")
    } else {
        (StatusCode::OK, "Portfolio found")
    };

    Ok((
        status,
        Json(json!({
            "message": message,
            "slug": result.row.slug,
            "portfolio": result.row,
        })),
    )
        .into_response())
}

/// GET /api/v1/portfolio/:slug
pub async fn handle_get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    if slug.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Invalid or missing slug parameter".to_string(),
        ));
    }

    let portfolio = store::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No portfolio for slug '{slug}'")))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": portfolio,
        })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// POST /api/v1/portfolio/lookup
/// Returns the owner's existing portfolio by email, or 404.
pub async fn handle_owner_lookup(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<Response, AppError> {
    if req.email.trim().is_empty() {
        return Err(AppError::InvalidInput("Email not provided".to_string()));
    }

    let portfolio = store::find_by_owner(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No portfolio for owner '{}'", req.email)))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Portfolio found",
            "portfolio": portfolio,
        })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
}

/// POST /api/v1/auth/register
/// Idempotent owner registration.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidInput("Email not provided".to_string()));
    }

    if store::find_owner_by_email(&state.db, email).await?.is_some() {
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Owner already exists" })),
        )
            .into_response());
    }

    let owner = store::create_owner(&state.db, email, req.name.as_deref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Owner registered",
            "owner": owner,
        })),
    )
        .into_response())
}
