use serde::{Deserialize, Serialize};

/// The oracle's raw structured output, prior to normalization.
///
/// Every field is optional: the oracle is instructed to emit `null` for
/// anything it cannot find, and this shape additionally tolerates omitted
/// keys so that a schema-drifting response still decodes instead of failing.
/// `normalize` turns this into a fully-populated [`Portfolio`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
    pub status: Option<String>,
    pub social_links: Option<SocialLinks>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<ExperienceItem>>,
    pub education: Option<Vec<EducationItem>>,
    pub projects: Option<Vec<CandidateProject>>,
}

/// A project entry as the oracle emits it. `link` may be null or omitted;
/// per-element normalization completes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProject {
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub link: Option<String>,
}

/// A fully-populated portfolio: the normalized record, matching the
/// persisted shape minus identity (id, slug, owner, timestamps).
///
/// Contract: no missing keys downstream. Required text fields are present
/// (possibly empty); identity-like fields are `null` when unknown; sequences
/// are present (possibly empty), never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub name: String,
    pub title: String,
    pub email: String,
    pub about: String,
    pub status: Option<String>,
    pub social_links: SocialLinks,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub projects: Vec<ProjectItem>,
}

/// Each link defaults to present-as-null, never omitted, so consumers can
/// rely on key presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    pub degree: String,
    pub school: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub link: Option<String>,
}
