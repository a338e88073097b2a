use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::portfolio::models::{EducationItem, ExperienceItem, ProjectItem, SocialLinks};

/// A persisted portfolio. `slug` is unique and immutable once assigned;
/// timestamps are set by the database, never by clients.
///
/// Wire shape uses camelCase keys to match the public contract.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRow {
    pub id: Uuid,
    pub user_email: String,
    pub slug: String,
    pub name: String,
    pub title: String,
    pub email: String,
    pub about: String,
    pub status: Option<String>,
    pub skills: Vec<String>,
    pub experience: Json<Vec<ExperienceItem>>,
    pub education: Json<Vec<EducationItem>>,
    pub projects: Json<Vec<ProjectItem>>,
    pub social_links: Json<SocialLinks>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
