use std::fmt;

use thiserror::Error;

/// Personal API token used to authenticate every request.
///
/// ClickUp expects the raw token in the `Authorization` header, without a
/// `Bearer` prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_token: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntoCredentialsError {
    #[error("Missing API token")]
    MissingApiToken,
}

impl Credentials {
    pub fn new(api_token: impl Into<String>) -> Result<Self, IntoCredentialsError> {
        let api_token = api_token.into().trim().to_string();
        if api_token.is_empty() {
            return Err(IntoCredentialsError::MissingApiToken);
        }

        Ok(Self { api_token })
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// The first ten characters of the token followed by an ellipsis, safe to
    /// show back to the user.
    pub fn masked(&self) -> String {
        let prefix: String = self.api_token.chars().take(10).collect();
        format!("{}...", prefix)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &self.masked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_rejected() {
        assert_eq!(
            Credentials::new("   ").unwrap_err(),
            IntoCredentialsError::MissingApiToken
        );
    }

    #[test]
    fn token_is_trimmed() {
        let credentials = Credentials::new(" pk_123 \n").unwrap();
        assert_eq!(credentials.api_token(), "pk_123");
    }

    #[test]
    fn debug_output_does_not_leak_token() {
        let credentials = Credentials::new("pk_1234567890_SECRET").unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("SECRET"));
        assert!(debug.contains("pk_1234567..."));
    }
}
