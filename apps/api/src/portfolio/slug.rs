use async_trait::async_trait;
use rand::Rng;

/// Base used when the display name slugifies to nothing.
const FALLBACK_BASE: &str = "portfolio";
const SUFFIX_LEN: usize = 4;
const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Uniqueness-check collaborator for slug allocation.
/// Implemented by the persistence gateway; tests supply stubs.
#[async_trait]
pub trait SlugProbe: Sync {
    async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error>;
}

/// Lower-cases and URL-safe-slugifies a display name.
/// Non-alphanumeric runs collapse to a single `-`; never returns empty.
pub fn base_slug(display_name: &str) -> String {
    let mut slug = String::with_capacity(display_name.len());
    let mut pending_dash = false;
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        slug
    }
}

/// Computes a slug for `display_name`, resolving collisions with a short
/// random suffix.
///
/// The base candidate is probed once; on collision the suffixed candidate is
/// returned WITHOUT re-probing. Collision probability of the suffix is
/// negligible but not zero; the storage layer's unique constraint is the
/// actual backstop (see the gateway's retry loop).
pub async fn allocate<P: SlugProbe + ?Sized>(
    display_name: &str,
    probe: &P,
) -> Result<String, sqlx::Error> {
    let base = base_slug(display_name);
    if !probe.slug_exists(&base).await? {
        return Ok(base);
    }
    Ok(with_suffix(&base))
}

/// Appends a fresh random suffix to a base slug.
pub fn with_suffix(base: &str) -> String {
    format!("{base}-{}", random_suffix())
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe {
        taken: Vec<&'static str>,
    }

    #[async_trait]
    impl SlugProbe for FixedProbe {
        async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
            Ok(self.taken.contains(&slug))
        }
    }

    #[test]
    fn test_base_slug_simple_name() {
        assert_eq!(base_slug("Jane Doe"), "jane-doe");
    }

    #[test]
    fn test_base_slug_collapses_symbol_runs() {
        assert_eq!(base_slug("  Jane   Q. Doe!! "), "jane-q-doe");
    }

    #[test]
    fn test_base_slug_empty_falls_back() {
        assert_eq!(base_slug(""), "portfolio");
    }

    #[test]
    fn test_base_slug_symbols_only_falls_back() {
        assert_eq!(base_slug("!!! ###"), "portfolio");
    }

    #[tokio::test]
    async fn test_allocate_returns_base_when_free() {
        let probe = FixedProbe { taken: vec![] };
        let slug = allocate("Jane Doe", &probe).await.unwrap();
        assert_eq!(slug, "jane-doe");
    }

    #[tokio::test]
    async fn test_allocate_suffixes_on_collision() {
        let probe = FixedProbe {
            taken: vec!["jane-doe"],
        };
        let slug = allocate("Jane Doe", &probe).await.unwrap();
        assert_ne!(slug, "jane-doe");
        let suffix = slug.strip_prefix("jane-doe-").expect("suffixed base");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_allocate_unslugifiable_name_still_valid() {
        let probe = FixedProbe { taken: vec![] };
        let slug = allocate("@#$%", &probe).await.unwrap();
        assert_eq!(slug, "portfolio");
    }

    #[test]
    fn test_suffix_charset_and_length() {
        for _ in 0..50 {
            let s = random_suffix();
            assert_eq!(s.len(), SUFFIX_LEN);
            assert!(s
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
