use crate::config::constants::{FIXED_CREDIT_FACTOR, QUALITY_SCORE_BASELINE, SIMILARITY_THRESHOLD};
use crate::services::fingerprinter::Fingerprinter;
use crate::structs::comparison_result::{ComparisonResult, ComparisonSummary, MatchedIssue};
use crate::structs::issue::Issue;
use std::collections::HashMap;

/// Classifies every issue across two independently collected revisions as
/// new, fixed, or unchanged. Pure and synchronous: no I/O, no locking, no
/// state beyond its arguments.
pub struct RevisionMatcher;

impl RevisionMatcher {
    pub fn compare(baseline: &[Issue], candidate: &[Issue]) -> ComparisonResult {
        let mut baseline_by_fingerprint: HashMap<&str, usize> = HashMap::new();
        for (index, issue) in baseline.iter().enumerate() {
            baseline_by_fingerprint.entry(issue.fingerprint.as_str()).or_insert(index);
        }

        let mut baseline_consumed = vec![false; baseline.len()];
        let mut new_issues = Vec::new();
        let mut unchanged_issues = Vec::new();

        for issue in candidate {
            // Exact fingerprint match first; similarity is only consulted
            // when fingerprints differ but the backend plausibly rephrased
            // the same finding.
            let matched = baseline_by_fingerprint
                .get(issue.fingerprint.as_str())
                .copied()
                .filter(|&index| !baseline_consumed[index])
                .map(|index| (index, 1.0))
                .or_else(|| Self::best_similar(issue, baseline, &baseline_consumed));

            match matched {
                Some((index, match_confidence)) => {
                    baseline_consumed[index] = true;
                    let counterpart = &baseline[index];
                    let mut kept = issue.clone();
                    // A matched pair carries the higher of the two confidences.
                    kept.confidence = issue.confidence.max(counterpart.confidence);
                    unchanged_issues.push(MatchedIssue {
                        issue: kept,
                        match_confidence,
                    });
                }
                None => new_issues.push(MatchedIssue {
                    issue: issue.clone(),
                    match_confidence: 1.0,
                }),
            }
        }

        let fixed_issues: Vec<MatchedIssue> = baseline
            .iter()
            .zip(baseline_consumed.iter())
            .filter(|(_, consumed)| !**consumed)
            .map(|(issue, _)| MatchedIssue {
                issue: issue.clone(),
                match_confidence: 1.0,
            })
            .collect();

        let summary = Self::summarize(&new_issues, &fixed_issues);

        ComparisonResult {
            new_issues,
            fixed_issues,
            unchanged_issues,
            summary,
        }
    }

    fn best_similar(
        issue: &Issue,
        baseline: &[Issue],
        consumed: &[bool],
    ) -> Option<(usize, f64)> {
        baseline
            .iter()
            .enumerate()
            .filter(|(index, _)| !consumed[*index])
            .map(|(index, candidate)| {
                let score = Fingerprinter::similarity(
                    &issue.title,
                    &issue.location.file,
                    &candidate.title,
                    &candidate.location.file,
                );
                (index, score)
            })
            .filter(|(_, score)| *score >= SIMILARITY_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Weighted deduction against a fixed baseline of 100 for new issues,
    /// offset by a smaller credit for fixed ones, clamped to 0..=100.
    fn summarize(new_issues: &[MatchedIssue], fixed_issues: &[MatchedIssue]) -> ComparisonSummary {
        let deductions: f64 = new_issues
            .iter()
            .map(|m| m.issue.severity.weight())
            .sum();
        let credits: f64 = fixed_issues
            .iter()
            .map(|m| m.issue.severity.weight() * FIXED_CREDIT_FACTOR)
            .sum();

        let quality_score =
            (QUALITY_SCORE_BASELINE - deductions + credits).clamp(0.0, QUALITY_SCORE_BASELINE);

        ComparisonSummary {
            net_impact: fixed_issues.len() as i64 - new_issues.len() as i64,
            quality_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::category::Category;
    use crate::enums::severity::Severity;
    use crate::structs::issue_location::IssueLocation;

    fn issue(title: &str, file: &str, category: Category, severity: Severity) -> Issue {
        Issue {
            title: title.to_string(),
            description: String::new(),
            severity,
            category,
            location: IssueLocation::new(Some(file.to_string()), Some(10), None),
            code_snippet: None,
            confidence: 0.6,
            fingerprint: Fingerprinter::fingerprint(category, title, file),
            support_count: 1,
        }
    }

    #[test]
    fn comparing_a_set_to_itself_yields_only_unchanged() {
        let set = vec![
            issue("SQL injection in login", "src/auth.ts", Category::Security, Severity::Critical),
            issue("Slow report query", "src/report.ts", Category::Performance, Severity::Medium),
        ];

        let result = RevisionMatcher::compare(&set, &set);
        assert!(result.new_issues.is_empty());
        assert!(result.fixed_issues.is_empty());
        assert_eq!(result.unchanged_issues.len(), set.len());
        assert_eq!(result.summary.net_impact, 0);
        assert_eq!(result.summary.quality_score, 100.0);
    }

    #[test]
    fn counts_partition_both_input_sets() {
        let baseline = vec![
            issue("SQL injection in login", "src/auth.ts", Category::Security, Severity::Critical),
            issue("Dead code in utils", "src/utils.ts", Category::CodeQuality, Severity::Low),
        ];
        let candidate = vec![
            issue("SQL injection in login", "src/auth.ts", Category::Security, Severity::Critical),
            issue("Missing tests for parser", "src/parser.ts", Category::Testing, Severity::Medium),
        ];

        let result = RevisionMatcher::compare(&baseline, &candidate);
        assert_eq!(
            result.new_issues.len() + result.unchanged_issues.len(),
            candidate.len()
        );
        assert_eq!(
            result.fixed_issues.len() + result.unchanged_issues.len(),
            baseline.len()
        );
    }

    #[test]
    fn empty_candidate_marks_everything_fixed() {
        let baseline = vec![issue(
            "Hardcoded API key",
            "config/prod.yaml",
            Category::Security,
            Severity::High,
        )];

        let result = RevisionMatcher::compare(&baseline, &[]);
        assert_eq!(result.fixed_issues.len(), 1);
        assert!(result.new_issues.is_empty());
        assert!(result.unchanged_issues.is_empty());
        assert_eq!(result.summary.net_impact, 1);
    }

    #[test]
    fn rephrased_finding_matches_via_similarity() {
        let baseline = vec![issue(
            "SQL injection in login",
            "src/auth.ts",
            Category::Security,
            Severity::Critical,
        )];
        let candidate = vec![issue(
            "Login SQL injection vulnerability",
            "src/auth.ts",
            Category::Security,
            Severity::Critical,
        )];
        assert_ne!(baseline[0].fingerprint, candidate[0].fingerprint);

        let result = RevisionMatcher::compare(&baseline, &candidate);
        assert!(result.new_issues.is_empty());
        assert!(result.fixed_issues.is_empty());
        assert_eq!(result.unchanged_issues.len(), 1);
        assert!(result.unchanged_issues[0].match_confidence >= SIMILARITY_THRESHOLD);
    }

    #[test]
    fn unchanged_pair_keeps_the_higher_confidence() {
        let mut baseline = vec![issue(
            "Slow report query",
            "src/report.ts",
            Category::Performance,
            Severity::Medium,
        )];
        baseline[0].confidence = 0.9;
        let candidate = vec![issue(
            "Slow report query",
            "src/report.ts",
            Category::Performance,
            Severity::Medium,
        )];

        let result = RevisionMatcher::compare(&baseline, &candidate);
        assert!((result.unchanged_issues[0].issue.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn quality_score_deducts_for_new_and_credits_fixed() {
        let baseline = vec![issue(
            "Dead code in utils",
            "src/utils.ts",
            Category::CodeQuality,
            Severity::Low,
        )];
        let candidate = vec![issue(
            "SQL injection in login",
            "src/auth.ts",
            Category::Security,
            Severity::Critical,
        )];

        let result = RevisionMatcher::compare(&baseline, &candidate);
        // 100 − 5 (new critical) + 0.25 (fixed low credit)
        assert!((result.summary.quality_score - 95.25).abs() < 1e-9);
        assert_eq!(result.summary.net_impact, 0);
    }

    #[test]
    fn quality_score_is_floored_at_zero() {
        let candidate: Vec<Issue> = (0..30)
            .map(|i| {
                issue(
                    &format!("Critical issue number {}", i),
                    &format!("src/file{}.ts", i),
                    Category::Security,
                    Severity::Critical,
                )
            })
            .collect();

        let result = RevisionMatcher::compare(&[], &candidate);
        assert_eq!(result.summary.quality_score, 0.0);
    }
}
