use crate::error::{ShotlistError, ShotlistResult};

/// Presence of an API credential in the hosting environment.
///
/// Generation commands depend on this through `require()` instead of reading
/// env vars directly, so the core stays testable without ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ApiCredential {
    #[default]
    Unknown,
    Unavailable,
    Available(String),
}

impl ApiCredential {
    /// Resolve the credential from the named environment variable.
    /// Loads `.env` first so project-local keys work, like the TTS engines do.
    pub fn resolve(env_var: &str) -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => ApiCredential::Available(key),
            _ => ApiCredential::Unavailable,
        }
    }

    pub fn require(&self) -> ShotlistResult<&str> {
        match self {
            ApiCredential::Available(key) => Ok(key),
            _ => Err(ShotlistError::CapabilityUnavailable),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ApiCredential::Available(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_available() {
        let cred = ApiCredential::Available("abc123".into());
        assert_eq!(cred.require().unwrap(), "abc123");
        assert!(cred.is_available());
    }

    #[test]
    fn test_require_unavailable() {
        let cred = ApiCredential::Unavailable;
        assert!(matches!(
            cred.require().unwrap_err(),
            ShotlistError::CapabilityUnavailable
        ));
        assert!(!cred.is_available());
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(ApiCredential::default(), ApiCredential::Unknown);
        assert!(ApiCredential::Unknown.require().is_err());
    }

    #[test]
    fn test_resolve_empty_var_is_unavailable() {
        std::env::set_var("SHOTLIST_TEST_EMPTY_KEY", "  ");
        assert_eq!(
            ApiCredential::resolve("SHOTLIST_TEST_EMPTY_KEY"),
            ApiCredential::Unavailable
        );
        std::env::remove_var("SHOTLIST_TEST_EMPTY_KEY");
    }
}
