//! Symmetric signing key.

use secrecy::{ExposeSecret, SecretString};

/// Key used to sign and verify session tokens.
///
/// Never empty. `Debug` output is redacted and there is no equality.
#[derive(Debug)]
pub struct Secret(SecretString);

impl Secret {
    /// Wrap a key. Returns `None` for an empty or whitespace-only key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return None;
        }
        Some(Self(SecretString::from(key)))
    }

    /// Raw key bytes for the codec.
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        assert!(Secret::new("").is_none());
        assert!(Secret::new("   ").is_none());
    }

    #[test]
    fn test_secret_exposes_bytes() {
        let secret = Secret::new("s1").unwrap();
        assert_eq!(secret.expose(), b"s1");
    }

    #[test]
    fn test_debug_does_not_leak() {
        let secret = Secret::new("super-secret-signing-key").unwrap();
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("super-secret-signing-key"));
    }
}
