use crate::enums::backend_error::BackendError;
use crate::enums::raw_response::RawResponse;
use async_trait::async_trait;

/// A remote text-generating code-analysis service. The only contract: call
/// it, get back a string or an object, never assume a consistent shape.
/// Repeated calls with identical input may answer differently.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn query(
        &self,
        repository: &str,
        revision: &str,
        prompt: &str,
    ) -> Result<RawResponse, BackendError>;
}
