use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::owner::OwnerRow;
use crate::models::portfolio::PortfolioRow;
use crate::portfolio::models::Portfolio;
use crate::portfolio::slug::{self, SlugProbe};

/// Fixed literal written when a record is persisted with unknown status.
/// Previews keep `null`; only persistence applies the default.
pub const DEFAULT_STATUS: &str = "Open to opportunities";

/// Bounded retry for the slug check-then-insert race: the unique constraint
/// is the authoritative collision signal; each violation re-allocates.
const MAX_SLUG_ATTEMPTS: u32 = 3;

/// A portfolio ready for first persistence: normalized record plus the
/// identity the gateway doesn't invent (owner email, proposed slug).
#[derive(Debug, Clone)]
pub struct NewPortfolio {
    pub user_email: String,
    pub slug: String,
    pub record: Portfolio,
}

/// Result of `create_or_get_existing`: the stored row plus whether this call
/// inserted it, so callers can report found vs created without a racy
/// pre-check.
#[derive(Debug)]
pub struct PersistResult {
    pub row: PortfolioRow,
    pub created: bool,
}

/// Storage collaborator for the persistence gateway. Production uses
/// `PgPool`; tests drive the gateway with in-memory stubs.
#[async_trait]
pub trait PortfolioBackend: SlugProbe {
    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<PortfolioRow>, sqlx::Error>;
    async fn insert_portfolio(
        &self,
        new: &NewPortfolio,
        slug: &str,
    ) -> Result<PortfolioRow, sqlx::Error>;
    async fn owner_by_email(&self, email: &str) -> Result<Option<OwnerRow>, sqlx::Error>;
    async fn link_owner(&self, portfolio_id: Uuid, email: &str) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl SlugProbe for PgPool {
    async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM portfolios WHERE slug = $1")
            .bind(slug)
            .fetch_one(self)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl PortfolioBackend for PgPool {
    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<PortfolioRow>, sqlx::Error> {
        find_by_slug(self, slug).await
    }

    async fn insert_portfolio(
        &self,
        new: &NewPortfolio,
        slug: &str,
    ) -> Result<PortfolioRow, sqlx::Error> {
        let status = new
            .record
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        sqlx::query_as(
            r#"
            INSERT INTO portfolios
                (user_email, slug, name, title, email, about, status, skills,
                 experience, education, projects, social_links)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&new.user_email)
        .bind(slug)
        .bind(&new.record.name)
        .bind(&new.record.title)
        .bind(&new.record.email)
        .bind(&new.record.about)
        .bind(status)
        .bind(&new.record.skills)
        .bind(Json(&new.record.experience))
        .bind(Json(&new.record.education))
        .bind(Json(&new.record.projects))
        .bind(Json(&new.record.social_links))
        .fetch_one(self)
        .await
    }

    async fn owner_by_email(&self, email: &str) -> Result<Option<OwnerRow>, sqlx::Error> {
        find_owner_by_email(self, email).await
    }

    async fn link_owner(&self, portfolio_id: Uuid, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE owners SET portfolio_id = $1 WHERE email = $2")
            .bind(portfolio_id)
            .bind(email)
            .execute(self)
            .await?;
        Ok(())
    }
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<PortfolioRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM portfolios WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_owner(
    pool: &PgPool,
    email: &str,
) -> Result<Option<PortfolioRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM portfolios WHERE user_email = $1 ORDER BY created_at LIMIT 1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_owner_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<OwnerRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM owners WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn create_owner(
    pool: &PgPool,
    email: &str,
    name: Option<&str>,
) -> Result<OwnerRow, sqlx::Error> {
    sqlx::query_as("INSERT INTO owners (email, name) VALUES ($1, $2) RETURNING *")
        .bind(email)
        .bind(name)
        .fetch_one(pool)
        .await
}

/// Idempotent publish entry point: an existing record under the proposed
/// slug is returned unchanged; otherwise a new record is inserted. A unique
/// violation on insert means a concurrent publish won the slug — the slug is
/// re-allocated with a fresh suffix and the insert retried, bounded.
pub async fn create_or_get_existing<B: PortfolioBackend + ?Sized>(
    backend: &B,
    new: NewPortfolio,
) -> Result<PersistResult, AppError> {
    let base = new.slug.clone();
    let mut candidate = new.slug.clone();

    for attempt in 0..MAX_SLUG_ATTEMPTS {
        if let Some(existing) = backend.fetch_by_slug(&candidate).await? {
            return Ok(PersistResult {
                row: existing,
                created: false,
            });
        }

        match backend.insert_portfolio(&new, &candidate).await {
            Ok(row) => {
                info!("Persisted portfolio {} under slug {}", row.id, row.slug);
                // Weak back-reference by design: the portfolio's lifecycle
                // does not depend on the owner row existing.
                if let Err(e) = backend.link_owner(row.id, &row.user_email).await {
                    warn!(
                        "Failed to link owner {} to portfolio {}: {e}",
                        row.user_email, row.id
                    );
                }
                return Ok(PersistResult { row, created: true });
            }
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Slug collision on insert for '{candidate}' (attempt {}), re-allocating",
                    attempt + 1
                );
                candidate = slug::with_suffix(&base);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(anyhow!(
        "slug allocation exhausted after {MAX_SLUG_ATTEMPTS} attempts for base '{base}'"
    )))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
