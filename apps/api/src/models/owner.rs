use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered owner identity. `portfolio_id` is a weak back-reference:
/// the portfolio's lifecycle is independent of this row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRow {
    pub id: Uuid,
    pub email: String,
    /// Display name, used as the slug source when present.
    pub name: Option<String>,
    pub portfolio_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
