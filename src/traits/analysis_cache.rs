use crate::structs::analysis_result::AnalysisResult;

/// Optional result lookup keyed by repository and revision. The collector
/// consults it before round 1 and populates it after stopping; correctness
/// never depends on a cache being present.
pub trait AnalysisCache: Send + Sync {
    fn get(&self, repository: &str, revision: &str) -> Option<AnalysisResult>;

    fn put(&self, result: &AnalysisResult);
}
