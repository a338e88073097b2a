use tracing::debug;

use crate::errors::AppError;
use crate::portfolio::models::CandidateRecord;
use crate::portfolio::prompts::{RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM};

/// MIME type accepted by the upload endpoint. Anything else is rejected
/// before extraction is attempted.
pub const ACCEPTED_MIME: &str = "application/pdf";

pub fn is_accepted_mime(content_type: Option<&str>) -> bool {
    // Browsers may append parameters ("application/pdf; charset=...").
    content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim() == ACCEPTED_MIME)
        .unwrap_or(false)
}

/// Reduces the uploaded PDF to plain text for the oracle.
/// Unextractable documents are the uploader's problem, not the oracle's.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::InvalidInput(format!("Could not read PDF: {e}")))?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::InvalidInput(
            "PDF contains no extractable text".to_string(),
        ));
    }
    debug!("Extracted {} chars of resume text", text.len());
    Ok(text)
}

/// Assembles the extraction request sent to the oracle: the fixed field
/// schema and extraction policy, with the resume text embedded.
pub fn build_extraction_prompt(resume_text: &str) -> (String, &'static str) {
    (
        RESUME_PARSE_PROMPT.replace("{resume_text}", resume_text),
        RESUME_PARSE_SYSTEM,
    )
}

/// Decodes the oracle's textual response into a candidate record.
///
/// The response may be wrapped in a fenced code block; fences are stripped
/// and the remainder strictly parsed. A parse failure is reported as
/// `ExtractionDecode` carrying the raw text — it is never silently coerced
/// into a default-filled record, because an unparseable response means the
/// output was not usable at all (incompleteness is normalize's job).
pub fn decode_extraction(raw: &str) -> Result<CandidateRecord, AppError> {
    let cleaned = strip_json_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| AppError::ExtractionDecode {
        message: e.to_string(),
        raw: cleaned.to_string(),
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from oracle output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_mime_pdf() {
        assert!(is_accepted_mime(Some("application/pdf")));
        assert!(is_accepted_mime(Some("application/pdf; charset=binary")));
    }

    #[test]
    fn test_rejected_mime() {
        assert!(!is_accepted_mime(Some("image/png")));
        assert!(!is_accepted_mime(Some("text/plain")));
        assert!(!is_accepted_mime(None));
    }

    #[test]
    fn test_prompt_embeds_resume_text_and_schema() {
        let (prompt, system) = build_extraction_prompt("JANE DOE\nRust engineer");
        assert!(prompt.contains("JANE DOE"));
        for field in [
            "\"name\"",
            "\"title\"",
            "\"email\"",
            "\"about\"",
            "\"status\"",
            "\"socialLinks\"",
            "\"experience\"",
            "\"projects\"",
            "\"education\"",
            "\"skills\"",
        ] {
            assert!(prompt.contains(field), "schema missing {field}");
        }
        assert!(prompt.contains("Use null for missing fields"));
        assert!(system.contains("valid JSON only"));
    }

    #[test]
    fn test_decode_plain_json() {
        let candidate = decode_extraction(r#"{"name":"Jane Doe","skills":["Go"]}"#).unwrap();
        assert_eq!(candidate.name.as_deref(), Some("Jane Doe"));
        assert_eq!(candidate.skills, Some(vec!["Go".to_string()]));
    }

    #[test]
    fn test_decode_fenced_json() {
        let raw = "```json\n{\"name\":\"Jane Doe\"}\n```";
        let candidate = decode_extraction(raw).unwrap();
        assert_eq!(candidate.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_decode_bare_fenced_json() {
        let raw = "```\n{\"name\":\"Jane Doe\"}\n```";
        let candidate = decode_extraction(raw).unwrap();
        assert_eq!(candidate.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_decode_failure_carries_raw_text() {
        let raw = "Sorry, I could not read that resume.";
        let err = decode_extraction(raw).unwrap_err();
        match err {
            AppError::ExtractionDecode { raw: attached, .. } => {
                assert_eq!(attached, raw);
            }
            other => panic!("expected ExtractionDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure_is_not_a_defaulted_record() {
        // Garbage after fence stripping must never produce a record.
        assert!(decode_extraction("```json\nnot json\n```").is_err());
    }
}
