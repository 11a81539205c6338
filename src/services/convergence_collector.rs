use crate::config::constants::MAX_CONSECUTIVE_FAILURES;
use crate::enums::termination_reason::TerminationReason;
use crate::helpers::prompt_generator;
use crate::services::fingerprinter::Fingerprinter;
use crate::services::gap_estimator::GapEstimator;
use crate::services::response_normalizer::ResponseNormalizer;
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::config::collector_config::CollectorConfig;
use crate::structs::gap_estimate::GapEstimate;
use crate::structs::issue::Issue;
use crate::structs::iteration_record::IterationRecord;
use crate::structs::normalized_response::NormalizedResponse;
use crate::traits::analysis_backend::AnalysisBackend;
use crate::traits::analysis_cache::AnalysisCache;
use crate::traits::location_resolver::LocationResolver;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Bounded iterative refinement over a stochastically sampled backend: each
/// round is expected to surface content the previous round omitted, and the
/// cumulative set converges because merging is idempotent per fingerprint.
///
/// One collector owns one revision's cumulative state exclusively; two
/// concurrent runs share nothing mutable.
pub struct ConvergenceCollector {
    backend: Arc<dyn AnalysisBackend>,
    config: CollectorConfig,
    cache: Option<Arc<dyn AnalysisCache>>,
    resolver: Option<Arc<dyn LocationResolver>>,
}

/// Cumulative entry bookkeeping the merge rule needs beyond the issue itself.
struct TrackedIssue {
    issue: Issue,
    best_parse_confidence: f64,
    last_support_iteration: usize,
}

impl ConvergenceCollector {
    pub fn new(backend: Arc<dyn AnalysisBackend>, config: CollectorConfig) -> Self {
        Self {
            backend,
            config,
            cache: None,
            resolver: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn AnalysisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn LocationResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Runs rounds until a stop condition fires. Never fails: the worst
    /// outcome is an empty result with reason `backend-exhausted-errors`.
    pub async fn collect(&self, repository: &str, revision: &str) -> AnalysisResult {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(repository, revision) {
                log::info!("📦 Cache hit for {}@{}, skipping analysis", repository, revision);
                return hit;
            }
        }

        let mut cumulative: HashMap<String, TrackedIssue> = HashMap::new();
        let mut insertion_order: Vec<String> = Vec::new();
        let mut iterations: Vec<IterationRecord> = Vec::new();
        let mut estimator = GapEstimator::new();

        // Unique-fingerprint set size after each successful round; the run
        // has plateaued once the last `plateau_window` entries are equal.
        let mut size_history: Vec<usize> = Vec::new();
        let mut consecutive_failures = 0usize;
        let mut last_gap = GapEstimate::empty();

        let termination = loop {
            let round = iterations.len() + 1;
            if round > self.config.max_iterations {
                break TerminationReason::MaxIterations;
            }

            log::info!(
                "🔁 Round {}/{} for {}@{}",
                round,
                self.config.max_iterations,
                repository,
                revision
            );

            let cumulative_issues = Self::snapshot(&cumulative, &insertion_order);
            let prompt = prompt_generator::generate_round_prompt(revision, round, &cumulative_issues);
            let started = Instant::now();

            let response = tokio::time::timeout(
                Duration::from_secs(self.config.round_timeout_secs),
                self.backend.query(repository, revision, &prompt),
            )
            .await;

            let duration_ms = started.elapsed().as_millis() as u64;

            let raw = match response {
                Ok(Ok(raw)) => raw,
                Ok(Err(error)) => {
                    log::warn!("⚠️ Round {} failed: {}", round, error);
                    iterations.push(IterationRecord::failed(round, duration_ms, last_gap, error.to_string()));
                    consecutive_failures += 1;
                    if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        break TerminationReason::BackendExhaustedErrors;
                    }
                    continue;
                }
                Err(_) => {
                    log::warn!(
                        "⚠️ Round {} timed out after {}s",
                        round,
                        self.config.round_timeout_secs
                    );
                    iterations.push(IterationRecord::failed(
                        round,
                        duration_ms,
                        last_gap,
                        format!("timed out after {}s", self.config.round_timeout_secs),
                    ));
                    consecutive_failures += 1;
                    if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        break TerminationReason::BackendExhaustedErrors;
                    }
                    continue;
                }
            };

            consecutive_failures = 0;

            let response_bytes = raw.byte_len();
            let normalized = ResponseNormalizer::normalize(&raw);
            let parsed_count = normalized.issues.len();

            let new_fingerprints =
                Self::merge_round(&mut cumulative, &mut insertion_order, &normalized, round);

            let cumulative_issues = Self::snapshot(&cumulative, &insertion_order);
            let gap = estimator.estimate(&cumulative_issues, &normalized.issues);
            last_gap = gap;
            size_history.push(cumulative.len());

            log::info!(
                "📊 Round {}: parsed {}, {} new, {} cumulative, completeness {:.0}%",
                round,
                parsed_count,
                new_fingerprints,
                cumulative.len(),
                gap.completeness * 100.0
            );

            iterations.push(IterationRecord {
                index: round,
                response_bytes,
                parsed_count,
                gap,
                duration_ms,
                new_fingerprints,
                error: None,
            });

            if gap.completeness >= self.config.completeness_threshold {
                break TerminationReason::ThresholdMet;
            }
            if Self::plateaued(&size_history, self.config.plateau_window) {
                break TerminationReason::Plateau;
            }
            if round == self.config.max_iterations {
                break TerminationReason::MaxIterations;
            }
        };

        let mut issues = Self::snapshot(&cumulative, &insertion_order);
        self.resolve_locations(&mut issues);

        log::info!(
            "🏁 {}@{}: {} issues after {} rounds ({})",
            repository,
            revision,
            issues.len(),
            iterations.len(),
            termination.name()
        );

        let result = AnalysisResult {
            repository: repository.to_string(),
            revision: revision.to_string(),
            issues,
            iterations,
            termination,
            completed_at: chrono::Utc::now(),
        };

        if let Some(cache) = &self.cache {
            cache.put(&result);
        }

        result
    }

    /// Merges one round into the cumulative set. Equal fingerprint: bump
    /// `support_count` once per iteration, replace severity/category/location
    /// only when the new observation parsed with strictly higher confidence,
    /// union description/snippet preferring the longer non-empty text.
    fn merge_round(
        cumulative: &mut HashMap<String, TrackedIssue>,
        insertion_order: &mut Vec<String>,
        normalized: &NormalizedResponse,
        round: usize,
    ) -> usize {
        let mut new_fingerprints = 0;

        for incoming in &normalized.issues {
            match cumulative.get_mut(&incoming.fingerprint) {
                Some(tracked) => {
                    if tracked.last_support_iteration < round {
                        tracked.issue.support_count += 1;
                        tracked.last_support_iteration = round;
                    }

                    if normalized.parse_confidence > tracked.best_parse_confidence {
                        tracked.issue.severity = incoming.severity;
                        tracked.issue.category = incoming.category;
                        tracked.issue.location = incoming.location.clone();
                        tracked.best_parse_confidence = normalized.parse_confidence;
                    }

                    if incoming.description.len() > tracked.issue.description.len() {
                        tracked.issue.description = incoming.description.clone();
                    }
                    let snippet_is_longer = match (&tracked.issue.code_snippet, &incoming.code_snippet) {
                        (None, Some(_)) => true,
                        (Some(old), Some(new)) => new.len() > old.len(),
                        _ => false,
                    };
                    if snippet_is_longer {
                        tracked.issue.code_snippet = incoming.code_snippet.clone();
                    }

                    tracked.issue.confidence = Fingerprinter::merged_confidence(
                        tracked.best_parse_confidence,
                        tracked.issue.support_count,
                    );
                }
                None => {
                    new_fingerprints += 1;
                    insertion_order.push(incoming.fingerprint.clone());
                    cumulative.insert(
                        incoming.fingerprint.clone(),
                        TrackedIssue {
                            issue: incoming.clone(),
                            best_parse_confidence: normalized.parse_confidence,
                            last_support_iteration: round,
                        },
                    );
                }
            }
        }

        new_fingerprints
    }

    fn plateaued(size_history: &[usize], window: usize) -> bool {
        if size_history.len() < window {
            return false;
        }
        let tail = &size_history[size_history.len() - window..];
        tail.windows(2).all(|pair| pair[0] == pair[1])
    }

    fn snapshot(cumulative: &HashMap<String, TrackedIssue>, order: &[String]) -> Vec<Issue> {
        order
            .iter()
            .filter_map(|fp| cumulative.get(fp))
            .map(|tracked| tracked.issue.clone())
            .collect()
    }

    fn resolve_locations(&self, issues: &mut [Issue]) {
        let Some(resolver) = &self.resolver else {
            return;
        };

        for issue in issues.iter_mut() {
            if issue.location.line.is_none() && issue.code_snippet.is_some() {
                if let Some(line) = resolver.resolve(issue) {
                    issue.location.line = Some(line);
                }
            }
        }
    }
}
