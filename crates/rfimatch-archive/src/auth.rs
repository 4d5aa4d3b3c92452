use async_trait::async_trait;
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::ports::CredentialProvider;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bearer token read from a JSON token file (`{"access_token": ...}`)
///
/// The file is re-read on every call so an external login or refresh takes
/// effect without restarting.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct StoredTokens {
    access_token: String,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialProvider for TokenFile {
    async fn bearer_token(&self) -> Result<String> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RfiMatchError::Credential {
                reason: format!("Failed to read token file {}: {}", self.path.display(), e),
            }
        })?;

        let tokens: StoredTokens =
            serde_json::from_str(&content).map_err(|e| RfiMatchError::Credential {
                reason: format!("Token file {} has no access_token: {}", self.path.display(), e),
            })?;

        if tokens.access_token.trim().is_empty() {
            return Err(RfiMatchError::Credential {
                reason: format!("Token file {} holds an empty access_token", self.path.display()),
            });
        }

        Ok(tokens.access_token)
    }
}

/// Fixed bearer token
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_token_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"access_token": "abc.def", "refresh_token": "r"}}"#).unwrap();

        let token = TokenFile::new(file.path()).bearer_token().await.unwrap();
        assert_eq!(token, "abc.def");
    }

    #[tokio::test]
    async fn test_missing_token_file_is_credential_error() {
        let err = TokenFile::new("/nonexistent/tokens.json").bearer_token().await.unwrap_err();
        assert!(matches!(err, RfiMatchError::Credential { .. }));
    }

    #[tokio::test]
    async fn test_token_file_without_access_token() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"refresh_token": "r"}}"#).unwrap();

        let err = TokenFile::new(file.path()).bearer_token().await.unwrap_err();
        assert!(matches!(err, RfiMatchError::Credential { .. }));
    }

    #[test]
    fn test_static_token_is_redacted() {
        assert_eq!(format!("{:?}", StaticToken::new("secret")), "StaticToken(***)");
    }
}
