use crate::constants::prompts::{FIRST_ROUND_PROMPT, FOLLOW_UP_PROMPT};
use crate::structs::issue::Issue;
use std::collections::BTreeSet;

/// Builds the question for one collector round. Follow-up rounds name what
/// has already been reported so the sampled backend is nudged toward the
/// parts of the repository it skipped last time.
pub fn generate_round_prompt(revision: &str, round: usize, cumulative: &[Issue]) -> String {
    if round <= 1 || cumulative.is_empty() {
        return FIRST_ROUND_PROMPT.replace("{revision}", revision);
    }

    let covered_files: BTreeSet<&str> = cumulative
        .iter()
        .filter(|i| i.location.is_file_known())
        .map(|i| i.location.file.as_str())
        .collect();

    let covered_categories: BTreeSet<&str> =
        cumulative.iter().map(|i| i.category.name()).collect();

    FOLLOW_UP_PROMPT
        .replace("{revision}", revision)
        .replace(
            "{covered_files}",
            &covered_files.into_iter().collect::<Vec<_>>().join(", "),
        )
        .replace(
            "{covered_categories}",
            &covered_categories.into_iter().collect::<Vec<_>>().join(", "),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::category::Category;
    use crate::enums::severity::Severity;
    use crate::structs::issue_location::IssueLocation;

    fn issue(file: &str) -> Issue {
        Issue {
            title: "something".to_string(),
            description: String::new(),
            severity: Severity::Medium,
            category: Category::Security,
            location: IssueLocation::new(Some(file.to_string()), None, None),
            code_snippet: None,
            confidence: 0.5,
            fingerprint: "fp".to_string(),
            support_count: 1,
        }
    }

    #[test]
    fn first_round_prompt_ignores_cumulative_set() {
        let prompt = generate_round_prompt("main", 1, &[issue("a.ts")]);
        assert!(!prompt.contains("a.ts"));
    }

    #[test]
    fn follow_up_prompt_names_covered_files_and_categories() {
        let prompt = generate_round_prompt("main", 2, &[issue("src/auth.ts")]);
        assert!(prompt.contains("src/auth.ts"));
        assert!(prompt.contains("security"));
        assert!(prompt.contains("main"));
    }
}
