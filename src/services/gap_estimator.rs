use crate::enums::category::Category;
use crate::structs::gap_estimate::GapEstimate;
use crate::structs::issue::Issue;
use std::collections::HashSet;

// Paths whose mere mention marks a repository as security-relevant.
const SECURITY_SENSITIVE_MARKERS: &[&str] = &[
    "auth", "login", "session", "token", "secret", "crypt", "password", "sql", "query",
];

const BASE_COMPLETENESS: f64 = 0.25;
const PER_ROUND_GAIN: f64 = 0.05;
const PER_QUIET_ROUND_GAIN: f64 = 0.2;
const CRITICAL_GAP_PENALTY: f64 = 0.15;
const COMPLETENESS_CEILING: f64 = 0.99;

/// Estimates how much of the repository's analyzable surface the cumulative
/// issue set covers. There is no ground truth for "how many issues exist",
/// so this only needs to be monotone enough for the collector to terminate:
/// completeness climbs as rounds keep confirming what we already know.
///
/// One estimator instance belongs to one collector run.
pub struct GapEstimator {
    seen_fingerprints: HashSet<String>,
    rounds_observed: usize,
    quiet_rounds: usize,
    security_signal_seen: bool,
}

impl GapEstimator {
    pub fn new() -> Self {
        Self {
            seen_fingerprints: HashSet::new(),
            rounds_observed: 0,
            quiet_rounds: 0,
            security_signal_seen: false,
        }
    }

    pub fn estimate(&mut self, cumulative: &[Issue], latest_round: &[Issue]) -> GapEstimate {
        self.rounds_observed += 1;

        let new_this_round = latest_round
            .iter()
            .filter(|issue| self.seen_fingerprints.insert(issue.fingerprint.clone()))
            .count();

        if new_this_round == 0 {
            self.quiet_rounds += 1;
        } else {
            self.quiet_rounds = 0;
        }

        if !self.security_signal_seen {
            self.security_signal_seen = latest_round.iter().any(Self::mentions_security_surface)
                || cumulative.iter().any(Self::mentions_security_surface);
        }

        let critical_gaps = self.critical_gap_count(cumulative);
        let total_gaps = critical_gaps + self.category_gap_count(cumulative);

        let mut completeness = BASE_COMPLETENESS
            + PER_ROUND_GAIN * self.rounds_observed as f64
            + PER_QUIET_ROUND_GAIN * self.quiet_rounds as f64;
        if critical_gaps > 0 {
            completeness -= CRITICAL_GAP_PENALTY;
        }

        GapEstimate {
            completeness: completeness.clamp(0.0, COMPLETENESS_CEILING),
            total_gaps,
            critical_gaps,
        }
    }

    /// The "critical gap" signal: security-relevant files came up, yet not
    /// one security finding has been recorded.
    fn critical_gap_count(&self, cumulative: &[Issue]) -> usize {
        let has_security_finding = cumulative
            .iter()
            .any(|issue| issue.category == Category::Security);

        usize::from(self.security_signal_seen && !has_security_finding)
    }

    /// Broad categories with zero findings so far count as open gaps.
    fn category_gap_count(&self, cumulative: &[Issue]) -> usize {
        const TRACKED: &[Category] = &[
            Category::Security,
            Category::Performance,
            Category::CodeQuality,
            Category::Testing,
        ];

        TRACKED
            .iter()
            .filter(|category| !cumulative.iter().any(|i| i.category == **category))
            .count()
    }

    fn mentions_security_surface(issue: &Issue) -> bool {
        let haystack = format!("{} {}", issue.location.file, issue.title).to_lowercase();
        SECURITY_SENSITIVE_MARKERS
            .iter()
            .any(|marker| haystack.contains(marker))
    }
}

impl Default for GapEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::severity::Severity;
    use crate::structs::issue_location::IssueLocation;

    fn issue(title: &str, file: &str, category: Category) -> Issue {
        Issue {
            title: title.to_string(),
            description: String::new(),
            severity: Severity::Medium,
            category,
            location: IssueLocation::new(Some(file.to_string()), None, None),
            code_snippet: None,
            confidence: 0.5,
            fingerprint: format!("{}|{}", title, file),
            support_count: 1,
        }
    }

    #[test]
    fn completeness_climbs_when_rounds_stop_finding_new_fingerprints() {
        let mut estimator = GapEstimator::new();
        let found = vec![issue("dup code", "a.rs", Category::CodeQuality)];

        let first = estimator.estimate(&found, &found);
        let second = estimator.estimate(&found, &found);
        let third = estimator.estimate(&found, &found);

        assert!(second.completeness > first.completeness);
        assert!(third.completeness > second.completeness);
    }

    #[test]
    fn completeness_never_exceeds_ceiling() {
        let mut estimator = GapEstimator::new();
        let found = vec![issue("dup code", "a.rs", Category::CodeQuality)];
        let mut last = GapEstimate::empty();
        for _ in 0..50 {
            last = estimator.estimate(&found, &found);
        }
        assert!(last.completeness <= 0.99);
    }

    #[test]
    fn security_sensitive_paths_without_security_findings_open_a_critical_gap() {
        let mut estimator = GapEstimator::new();
        let found = vec![issue("slow handler", "src/auth/login.ts", Category::Performance)];

        let estimate = estimator.estimate(&found, &found);
        assert_eq!(estimate.critical_gaps, 1);

        let with_security = vec![
            found[0].clone(),
            issue("sql injection", "src/auth/login.ts", Category::Security),
        ];
        let estimate = estimator.estimate(&with_security, &with_security);
        assert_eq!(estimate.critical_gaps, 0);
    }

    #[test]
    fn plain_repositories_carry_no_critical_gap() {
        let mut estimator = GapEstimator::new();
        let found = vec![issue("dup code", "src/report.rs", Category::CodeQuality)];
        let estimate = estimator.estimate(&found, &found);
        assert_eq!(estimate.critical_gaps, 0);
    }
}
