use tracing::info;

use crate::errors::AppError;
use crate::models::owner::OwnerRow;
use crate::models::portfolio::PortfolioRow;
use crate::portfolio::extraction::{
    build_extraction_prompt, decode_extraction, extract_pdf_text, is_accepted_mime,
};
use crate::portfolio::models::Portfolio;
use crate::portfolio::normalize::normalize;
use crate::portfolio::slug;
use crate::portfolio::store::{self, NewPortfolio, PortfolioBackend};
use crate::state::AppState;

/// Terminal outcomes of the ingestion flow.
/// Both are 200-class; failures surface as `AppError` instead.
#[derive(Debug)]
pub enum IngestOutcome {
    Persisted(Box<PortfolioRow>),
    Preview {
        message: &'static str,
        portfolio: Portfolio,
    },
}

pub const MSG_SAVED: &str = "Portfolio saved successfully";
pub const MSG_PREVIEW: &str = "Parsed (preview)";
pub const MSG_OWNER_NOT_FOUND: &str = "Owner not found - returning parsed data for preview";

/// Runs the full ingestion pipeline for an uploaded resume:
/// extract → decode → normalize → preview or persist.
pub async fn ingest_resume(
    state: &AppState,
    file_bytes: &[u8],
    content_type: Option<&str>,
    owner_email: Option<&str>,
) -> Result<IngestOutcome, AppError> {
    if !is_accepted_mime(content_type) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported upload type '{}'; expected application/pdf",
            content_type.unwrap_or("unknown")
        )));
    }

    let resume_text = extract_pdf_text(file_bytes)?;

    let (prompt, system) = build_extraction_prompt(&resume_text);
    let raw = state
        .llm
        .call_text(&prompt, system)
        .await
        .map_err(|e| AppError::ExtractionFailed(e.to_string()))?;

    let candidate = decode_extraction(&raw)?;
    let portfolio = normalize(candidate);

    finish_ingest(&state.db, portfolio, owner_email).await
}

/// Post-normalization half of the pipeline: resolve the owner, allocate a
/// slug, persist — or degrade to preview.
///
/// An owner email that doesn't resolve to a registered owner degrades to the
/// preview outcome rather than failing, so the caller can prompt sign-up
/// without losing the extracted data.
async fn finish_ingest<B: PortfolioBackend + ?Sized>(
    backend: &B,
    portfolio: Portfolio,
    owner_email: Option<&str>,
) -> Result<IngestOutcome, AppError> {
    let owner_email = match owner_email {
        Some(email) if !email.trim().is_empty() => email.trim(),
        _ => {
            return Ok(IngestOutcome::Preview {
                message: MSG_PREVIEW,
                portfolio,
            })
        }
    };

    let owner = match backend.owner_by_email(owner_email).await? {
        Some(owner) => owner,
        None => {
            info!("Owner {owner_email} not registered; degrading to preview");
            return Ok(IngestOutcome::Preview {
                message: MSG_OWNER_NOT_FOUND,
                portfolio,
            });
        }
    };

    let display_name = display_name_for_slug(&owner, &portfolio);
    let allocated = slug::allocate(display_name, backend).await?;

    let result = store::create_or_get_existing(
        backend,
        NewPortfolio {
            user_email: owner_email.to_string(),
            slug: allocated,
            record: portfolio,
        },
    )
    .await?;

    Ok(IngestOutcome::Persisted(Box::new(result.row)))
}

/// Slug source: the owner's display name, falling back to the extracted
/// name. The allocator itself handles the everything-empty fallback.
fn display_name_for_slug<'a>(owner: &'a OwnerRow, portfolio: &'a Portfolio) -> &'a str {
    match owner.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => &portfolio.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    use crate::portfolio::models::CandidateRecord;
    use crate::portfolio::slug::SlugProbe;

    fn owner(name: Option<&str>) -> OwnerRow {
        OwnerRow {
            id: Uuid::new_v4(),
            email: "jane@doe.dev".to_string(),
            name: name.map(String::from),
            portfolio_id: None,
            created_at: Utc::now(),
        }
    }

    fn extracted(name: &str) -> Portfolio {
        normalize(CandidateRecord {
            name: Some(name.to_string()),
            skills: Some(vec!["Go".to_string()]),
            ..Default::default()
        })
    }

    /// Backend with a fixed owner registry and in-memory rows.
    struct StubBackend {
        owners: Vec<OwnerRow>,
        rows: Mutex<Vec<PortfolioRow>>,
    }

    impl StubBackend {
        fn with_owners(owners: Vec<OwnerRow>) -> Self {
            StubBackend {
                owners,
                rows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SlugProbe for StubBackend {
        async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
            Ok(self.rows.lock().unwrap().iter().any(|r| r.slug == slug))
        }
    }

    #[async_trait]
    impl PortfolioBackend for StubBackend {
        async fn fetch_by_slug(&self, slug: &str) -> Result<Option<PortfolioRow>, sqlx::Error> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.slug == slug)
                .cloned())
        }

        async fn insert_portfolio(
            &self,
            new: &NewPortfolio,
            slug: &str,
        ) -> Result<PortfolioRow, sqlx::Error> {
            let row = PortfolioRow {
                id: Uuid::new_v4(),
                user_email: new.user_email.clone(),
                slug: slug.to_string(),
                name: new.record.name.clone(),
                title: new.record.title.clone(),
                email: new.record.email.clone(),
                about: new.record.about.clone(),
                status: new.record.status.clone(),
                skills: new.record.skills.clone(),
                experience: Json(new.record.experience.clone()),
                education: Json(new.record.education.clone()),
                projects: Json(new.record.projects.clone()),
                social_links: Json(new.record.social_links.clone()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn owner_by_email(&self, email: &str) -> Result<Option<OwnerRow>, sqlx::Error> {
            Ok(self.owners.iter().find(|o| o.email == email).cloned())
        }

        async fn link_owner(&self, _portfolio_id: Uuid, _email: &str) -> Result<(), sqlx::Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_no_owner_identity_previews() {
        let backend = StubBackend::with_owners(vec![]);
        let outcome = finish_ingest(&backend, extracted("Jane Doe"), None)
            .await
            .unwrap();
        match outcome {
            IngestOutcome::Preview { message, portfolio } => {
                assert_eq!(message, MSG_PREVIEW);
                assert_eq!(portfolio.name, "Jane Doe");
            }
            other => panic!("expected preview, got {other:?}"),
        }
        assert!(backend.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_owner_degrades_to_preview_with_data() {
        // A non-registered owner must not fail the request; the extracted
        // data comes back for client-side review.
        let backend = StubBackend::with_owners(vec![]);
        let outcome = finish_ingest(&backend, extracted("Jane Doe"), Some("nobody@doe.dev"))
            .await
            .unwrap();
        match outcome {
            IngestOutcome::Preview { message, portfolio } => {
                assert_eq!(message, MSG_OWNER_NOT_FOUND);
                assert_eq!(portfolio.name, "Jane Doe");
                assert_eq!(portfolio.skills, vec!["Go"]);
                assert_eq!(portfolio.status, None);
            }
            other => panic!("expected preview, got {other:?}"),
        }
        assert!(backend.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_known_owner_persists_with_allocated_slug() {
        let backend = StubBackend::with_owners(vec![owner(Some("Jane Doe"))]);
        let outcome = finish_ingest(&backend, extracted("Extracted Name"), Some("jane@doe.dev"))
            .await
            .unwrap();
        match outcome {
            IngestOutcome::Persisted(row) => {
                assert_eq!(row.slug, "jane-doe");
                assert_eq!(row.user_email, "jane@doe.dev");
            }
            other => panic!("expected persisted, got {other:?}"),
        }
        assert_eq!(backend.rows.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_decoded_oracle_output_normalizes_for_preview() {
        // Decode → normalize is the whole preview path minus transport.
        let raw = r#"{"name":"Jane Doe","title":null,"email":null,"about":null,
                      "status":null,"skills":["Go"]}"#;
        let portfolio = normalize(decode_extraction(raw).unwrap());
        assert_eq!(portfolio.name, "Jane Doe");
        assert_eq!(portfolio.status, None);
        assert_eq!(portfolio.skills, vec!["Go"]);
        assert!(portfolio.experience.is_empty());
        assert!(portfolio.projects.is_empty());
    }

    #[test]
    fn test_slug_source_prefers_owner_name() {
        let portfolio = extracted("Extracted Name");
        assert_eq!(
            display_name_for_slug(&owner(Some("Jane Doe")), &portfolio),
            "Jane Doe"
        );
    }

    #[test]
    fn test_slug_source_falls_back_to_extracted_name() {
        let portfolio = extracted("Extracted Name");
        assert_eq!(
            display_name_for_slug(&owner(None), &portfolio),
            "Extracted Name"
        );
        assert_eq!(
            display_name_for_slug(&owner(Some("   ")), &portfolio),
            "Extracted Name"
        );
    }
}
