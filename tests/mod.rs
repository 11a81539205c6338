use async_trait::async_trait;
use revlyzer_cli::enums::backend_error::BackendError;
use revlyzer_cli::enums::raw_response::RawResponse;
use revlyzer_cli::enums::severity::Severity;
use revlyzer_cli::enums::termination_reason::TerminationReason;
use revlyzer_cli::services::convergence_collector::ConvergenceCollector;
use revlyzer_cli::services::result_cache::MemoryCache;
use revlyzer_cli::services::revision_matcher::RevisionMatcher;
use revlyzer_cli::structs::analysis_result::AnalysisResult;
use revlyzer_cli::structs::config::collector_config::CollectorConfig;
use revlyzer_cli::traits::analysis_backend::AnalysisBackend;
use revlyzer_cli::traits::analysis_cache::AnalysisCache;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Replays a fixed script of responses, one per round, then errors.
struct ScriptedBackend {
    script: Mutex<VecDeque<Result<RawResponse, BackendError>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(script: Vec<Result<RawResponse, BackendError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn query(
        &self,
        _repository: &str,
        _revision: &str,
        _prompt: &str,
    ) -> Result<RawResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::NetworkError("script exhausted".to_string())))
    }
}

/// Returns the same response on every round.
struct RepeatingBackend {
    response: RawResponse,
}

impl RepeatingBackend {
    fn new(response: RawResponse) -> Arc<Self> {
        Arc::new(Self { response })
    }
}

#[async_trait]
impl AnalysisBackend for RepeatingBackend {
    async fn query(
        &self,
        _repository: &str,
        _revision: &str,
        _prompt: &str,
    ) -> Result<RawResponse, BackendError> {
        Ok(self.response.clone())
    }
}

fn config(threshold: f64, max_iterations: usize) -> CollectorConfig {
    CollectorConfig {
        completeness_threshold: threshold,
        max_iterations,
        plateau_window: 2,
        round_timeout_secs: 5,
        cache_results: false,
    }
}

fn sql_injection_response() -> RawResponse {
    RawResponse::Structured(json!({
        "issues": [{
            "title": "SQL injection in login",
            "severity": "critical",
            "category": "security",
            "file": "src/auth.ts",
            "line": 42,
            "description": "User input flows into a raw query string"
        }]
    }))
}

#[tokio::test]
async fn identical_rounds_stop_on_plateau_before_the_cap() {
    let backend = RepeatingBackend::new(sql_injection_response());
    let collector = ConvergenceCollector::new(backend, config(0.85, 3));

    let result = collector.collect("acme/repo", "HEAD").await;

    assert_eq!(result.termination, TerminationReason::Plateau);
    assert_eq!(result.total_rounds(), 2);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].support_count, 2);
    assert_eq!(result.issues[0].severity, Severity::Critical);
}

#[tokio::test]
async fn unparseable_responses_still_terminate_with_an_empty_result() {
    let backend = RepeatingBackend::new(RawResponse::Text("???!!!".to_string()));
    let collector = ConvergenceCollector::new(backend, config(0.99, 10));

    let result = collector.collect("acme/repo", "HEAD").await;

    assert!(result.issues.is_empty());
    assert!(result.total_rounds() <= 10);
    assert_eq!(result.termination, TerminationReason::Plateau);
}

#[tokio::test]
async fn three_consecutive_failures_stop_the_run() {
    let backend = ScriptedBackend::new(vec![
        Err(BackendError::NetworkError("connection refused".to_string())),
        Err(BackendError::ApiError { status: 503, message: "unavailable".to_string() }),
        Err(BackendError::NetworkError("connection refused".to_string())),
    ]);
    let collector = ConvergenceCollector::new(Arc::clone(&backend) as Arc<dyn AnalysisBackend>, config(0.85, 10));

    let result = collector.collect("acme/repo", "HEAD").await;

    assert_eq!(result.termination, TerminationReason::BackendExhaustedErrors);
    assert_eq!(result.total_rounds(), 3);
    assert!(result.issues.is_empty());
    assert!(result.iterations.iter().all(|r| r.error.is_some()));
}

#[tokio::test]
async fn partial_results_survive_backend_exhaustion() {
    let backend = ScriptedBackend::new(vec![
        Ok(sql_injection_response()),
        Err(BackendError::NetworkError("reset".to_string())),
        Err(BackendError::NetworkError("reset".to_string())),
        Err(BackendError::NetworkError("reset".to_string())),
    ]);
    let collector = ConvergenceCollector::new(Arc::clone(&backend) as Arc<dyn AnalysisBackend>, config(0.95, 10));

    let result = collector.collect("acme/repo", "HEAD").await;

    assert_eq!(result.termination, TerminationReason::BackendExhaustedErrors);
    assert_eq!(result.total_rounds(), 4);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].title, "SQL injection in login");
}

#[tokio::test]
async fn a_met_threshold_stops_the_first_qualifying_round() {
    let response = RawResponse::Structured(json!({
        "issues": [{
            "title": "Duplicated branches in report builder",
            "severity": "low",
            "category": "code-quality",
            "file": "src/report.rs"
        }]
    }));
    let backend = RepeatingBackend::new(response);
    let collector = ConvergenceCollector::new(backend, config(0.3, 10));

    let result = collector.collect("acme/repo", "HEAD").await;

    assert_eq!(result.termination, TerminationReason::ThresholdMet);
    assert_eq!(result.total_rounds(), 1);
}

#[tokio::test]
async fn a_higher_confidence_parse_upgrades_the_merged_record() {
    let templated = RawResponse::Text(
        "Issue: SQL injection in login\n\
         Severity: medium\n\
         Category: security\n\
         File: src/auth.ts\n"
            .to_string(),
    );
    let backend = ScriptedBackend::new(vec![Ok(templated), Ok(sql_injection_response())]);
    let collector = ConvergenceCollector::new(Arc::clone(&backend) as Arc<dyn AnalysisBackend>, config(0.95, 3));

    let result = collector.collect("acme/repo", "HEAD").await;

    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    // The structured round parsed more reliably, so its fields win.
    assert_eq!(issue.severity, Severity::Critical);
    assert_eq!(issue.location.line, Some(42));
    assert_eq!(issue.support_count, 2);
}

#[tokio::test]
async fn support_and_unique_counts_never_decrease() {
    let round_one = RawResponse::Structured(json!({
        "issues": [
            {"title": "SQL injection in login", "severity": "critical", "category": "security", "file": "src/auth.ts"},
            {"title": "Slow report query", "severity": "medium", "category": "performance", "file": "src/report.ts"}
        ]
    }));
    let round_two = RawResponse::Structured(json!({
        "issues": [
            {"title": "SQL injection in login", "severity": "critical", "category": "security", "file": "src/auth.ts"},
            {"title": "Missing parser tests", "severity": "medium", "category": "testing", "file": "src/parser.ts"}
        ]
    }));
    let backend = ScriptedBackend::new(vec![Ok(round_one), Ok(round_two.clone()), Ok(round_two)]);
    let collector = ConvergenceCollector::new(Arc::clone(&backend) as Arc<dyn AnalysisBackend>, config(0.95, 3));

    let result = collector.collect("acme/repo", "HEAD").await;

    assert_eq!(result.issues.len(), 3);
    let mut sizes: Vec<usize> = Vec::new();
    let mut running = 0;
    for record in &result.iterations {
        running += record.new_fingerprints;
        sizes.push(running);
    }
    assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));
    let injection = result
        .issues
        .iter()
        .find(|i| i.title == "SQL injection in login")
        .unwrap();
    assert_eq!(injection.support_count, 3);
}

#[tokio::test]
async fn cache_hits_skip_the_backend_entirely() {
    let backend = ScriptedBackend::new(vec![Ok(sql_injection_response())]);
    let cache: Arc<dyn AnalysisCache> = Arc::new(MemoryCache::new());

    let collector = ConvergenceCollector::new(
        Arc::clone(&backend) as Arc<dyn AnalysisBackend>,
        config(0.85, 3),
    )
    .with_cache(Arc::clone(&cache));

    let first = collector.collect("acme/repo", "abc123").await;
    let calls_after_first = backend.call_count();
    assert!(calls_after_first > 0);

    let second = collector.collect("acme/repo", "abc123").await;
    assert_eq!(backend.call_count(), calls_after_first);
    assert_eq!(second.issues.len(), first.issues.len());
    assert_eq!(second.termination, first.termination);
}

#[tokio::test]
async fn concurrent_revision_runs_stay_independent() {
    let baseline_backend = RepeatingBackend::new(sql_injection_response());
    let candidate_backend = RepeatingBackend::new(RawResponse::Structured(json!({
        "issues": [{
            "title": "Slow report query",
            "severity": "medium",
            "category": "performance",
            "file": "src/report.ts"
        }]
    })));

    let baseline_collector =
        Arc::new(ConvergenceCollector::new(baseline_backend, config(0.85, 3)));
    let candidate_collector =
        Arc::new(ConvergenceCollector::new(candidate_backend, config(0.85, 3)));

    let baseline_task = {
        let collector = Arc::clone(&baseline_collector);
        tokio::spawn(async move { collector.collect("acme/repo", "v1").await })
    };
    let candidate_task = {
        let collector = Arc::clone(&candidate_collector);
        tokio::spawn(async move { collector.collect("acme/repo", "v2").await })
    };

    let baseline: AnalysisResult = baseline_task.await.unwrap();
    let candidate: AnalysisResult = candidate_task.await.unwrap();

    assert_eq!(baseline.issues.len(), 1);
    assert_eq!(candidate.issues.len(), 1);
    assert_ne!(baseline.issues[0].fingerprint, candidate.issues[0].fingerprint);

    let comparison = RevisionMatcher::compare(&baseline.issues, &candidate.issues);
    assert_eq!(comparison.new_issues.len(), 1);
    assert_eq!(comparison.fixed_issues.len(), 1);
    assert_eq!(comparison.summary.net_impact, 0);
}
