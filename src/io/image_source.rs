use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::ConvertError;

/// Trait for retrieving the raw bytes of a remote image.
///
/// This abstraction lets the transcoder work against any transport without
/// being tied to a specific HTTP client. Implementations must be thread-safe,
/// since one source is shared by every in-flight conversion.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the full body at `url`.
    ///
    /// Implementations report transport failures, timeouts, and non-success
    /// statuses as [`ConvertError::FetchFailed`].
    async fn fetch(&self, url: &Url) -> Result<Bytes, ConvertError>;
}
