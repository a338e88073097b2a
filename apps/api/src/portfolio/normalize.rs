use crate::portfolio::models::{CandidateRecord, Portfolio, ProjectItem};

/// Coerces an untrusted candidate record into a fully-populated portfolio.
///
/// Pure and total: never fails for any decoded candidate. Required text
/// fields (name/title/email/about) default to empty string; identity-like
/// fields (`status`, `socialLinks.*`, `projects[].link`) stay `null` to
/// preserve "unknown" vs "known empty"; sequences default to empty so
/// iteration is always safe. Project entries are completed element-wise;
/// partial arrays are never rejected.
///
/// Validation is a separate concern layered on top, not performed here.
pub fn normalize(input: CandidateRecord) -> Portfolio {
    Portfolio {
        name: input.name.unwrap_or_default(),
        title: input.title.unwrap_or_default(),
        email: input.email.unwrap_or_default(),
        about: input.about.unwrap_or_default(),
        status: input.status,
        social_links: input.social_links.unwrap_or_default(),
        skills: input.skills.unwrap_or_default(),
        experience: input.experience.unwrap_or_default(),
        education: input.education.unwrap_or_default(),
        projects: input
            .projects
            .unwrap_or_default()
            .into_iter()
            .map(|p| ProjectItem {
                title: p.title,
                description: p.description,
                tech: p.tech,
                link: p.link,
            })
            .collect(),
    }
}
