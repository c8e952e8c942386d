use async_trait::async_trait;
use shared::discogs::Candidate;

use crate::error::Result;

/// Transport used by the resolver to talk to Discogs.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Authenticated GET returning the decoded JSON body.
    async fn fetch_json(&self, url: &str, token: &str) -> Result<serde_json::Value>;

    /// GET of raw image bytes; no token is sent.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Reduces several search candidates to one.
///
/// Returns a zero-based index into `candidates`, or
/// [`CoverError::InvalidChoice`](crate::error::CoverError::InvalidChoice).
#[async_trait]
pub trait Disambiguator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn choose_one(&self, candidates: &[Candidate]) -> Result<usize>;
}
