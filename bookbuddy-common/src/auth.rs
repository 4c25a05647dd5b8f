//! Authorization for protected reads
//!
//! Reading submitted feedback is gated by an [`Authorizer`]. The only
//! implementation today is [`SharedSecretAuthorizer`], a placeholder that
//! compares the client-supplied credential with one configured string. It is
//! not suitable for production; swap in a token/session scheme behind the
//! same trait.

/// Capability check for protected operations
pub trait Authorizer: Send + Sync {
    /// Whether `credential` grants access. `None` means the client sent none.
    fn is_authorized(&self, credential: Option<&str>) -> bool;
}

/// Exact-match shared secret
///
/// An empty configured secret authorizes nobody.
#[derive(Clone)]
pub struct SharedSecretAuthorizer {
    secret: String,
}

impl SharedSecretAuthorizer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for SharedSecretAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretAuthorizer")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Authorizer for SharedSecretAuthorizer {
    fn is_authorized(&self, credential: Option<&str>) -> bool {
        match credential {
            Some(provided) => !self.secret.is_empty() && provided == self.secret,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let auth = SharedSecretAuthorizer::new("s3cret");
        assert!(auth.is_authorized(Some("s3cret")));
        assert!(!auth.is_authorized(Some("S3CRET")));
        assert!(!auth.is_authorized(Some("s3cret ")));
        assert!(!auth.is_authorized(Some("")));
        assert!(!auth.is_authorized(None));
    }

    #[test]
    fn test_empty_secret_denies_everyone() {
        let auth = SharedSecretAuthorizer::new("");
        assert!(!auth.is_authorized(Some("")));
        assert!(!auth.is_authorized(None));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let auth = SharedSecretAuthorizer::new("s3cret");
        assert!(!format!("{auth:?}").contains("s3cret"));
    }
}
