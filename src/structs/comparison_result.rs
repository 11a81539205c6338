use crate::structs::issue::Issue;
use serde::{Deserialize, Serialize};

/// One issue together with how confidently it was matched (or classified).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedIssue {
    pub issue: Issue,
    pub match_confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// fixed − new. Positive means the candidate revision improved.
    pub net_impact: i64,
    /// 0..=100, weighted deductions for new issues offset by credits for
    /// fixed ones.
    pub quality_score: f64,
}

/// Matcher output for a baseline/candidate revision pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub new_issues: Vec<MatchedIssue>,
    pub fixed_issues: Vec<MatchedIssue>,
    pub unchanged_issues: Vec<MatchedIssue>,
    pub summary: ComparisonSummary,
}
