use crate::enums::category::Category;
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Derives stable identity keys for findings the backend never identifies.
/// A fingerprint is a pure function of (category, normalized title,
/// normalized file) — line numbers and phrasing are the least stable fields
/// across repeated backend calls, so they never participate.
pub struct Fingerprinter;

impl Fingerprinter {
    pub fn fingerprint(category: Category, title: &str, file: &str) -> String {
        let key = format!(
            "{}|{}|{}",
            category.name(),
            Self::normalize_title(title),
            Self::normalize_file(file)
        );

        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Lower-cases, strips punctuation, collapses whitespace.
    pub fn normalize_title(title: &str) -> String {
        let lowered = title.to_lowercase();
        let cleaned: String = lowered
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Strips repository-root noise so "./src/a.ts" and "src/a.ts" agree.
    pub fn normalize_file(file: &str) -> String {
        let trimmed = file.trim();
        let stripped = trimmed
            .strip_prefix("./")
            .or_else(|| trimmed.strip_prefix('/'))
            .unwrap_or(trimmed);
        stripped.trim_end_matches('/').to_lowercase()
    }

    /// Token-overlap similarity used when two fingerprints differ but a match
    /// is still plausible: 0.6 × Jaccard over title words + 0.4 for an exact
    /// file match.
    pub fn similarity(
        title_a: &str,
        file_a: &str,
        title_b: &str,
        file_b: &str,
    ) -> f64 {
        let tokens_a: HashSet<String> = Self::normalize_title(title_a)
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();
        let tokens_b: HashSet<String> = Self::normalize_title(title_b)
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();

        let jaccard = if tokens_a.is_empty() && tokens_b.is_empty() {
            0.0
        } else {
            let intersection = tokens_a.intersection(&tokens_b).count() as f64;
            let union = tokens_a.union(&tokens_b).count() as f64;
            intersection / union
        };

        let file_match = if Self::normalize_file(file_a) == Self::normalize_file(file_b) {
            1.0
        } else {
            0.0
        };

        0.6 * jaccard + 0.4 * file_match
    }

    /// Combined confidence for a finding corroborated across iterations:
    /// `parse_confidence × min(1, 0.5 + 0.1 × support_count)`.
    pub fn merged_confidence(parse_confidence: f64, support_count: usize) -> f64 {
        let corroboration = (0.5 + 0.1 * support_count as f64).min(1.0);
        (parse_confidence * corroboration).clamp(0.0, 1.0)
    }
}
