use async_trait::async_trait;

use crate::error::Result;

/// Port supplying a bearer credential for archive calls
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token; a failure here is fatal for the caller
    async fn bearer_token(&self) -> Result<String>;
}
