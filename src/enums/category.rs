use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Category {
    #[serde(rename = "security")]
    Security,
    #[serde(rename = "performance")]
    Performance,
    #[serde(rename = "code-quality")]
    CodeQuality,
    #[serde(rename = "dependencies")]
    Dependencies,
    #[serde(rename = "testing")]
    Testing,
    #[serde(rename = "architecture")]
    Architecture,
    #[serde(rename = "other")]
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl Category {
    /// Coerces arbitrary backend category labels to the canonical enum.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "security" | "vulnerability" | "auth" => Category::Security,
            "performance" | "perf" | "optimization" => Category::Performance,
            "code-quality" | "quality" | "maintainability" | "style" | "code-smell" => {
                Category::CodeQuality
            }
            "dependencies" | "dependency" | "deps" => Category::Dependencies,
            "testing" | "tests" | "test-coverage" => Category::Testing,
            "architecture" | "design" | "structure" => Category::Architecture,
            _ => Category::Other,
        }
    }

    /// Guesses a category from free text when the backend never named one.
    pub fn infer_from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        let keyword_map: &[(&[&str], Category)] = &[
            (
                &["security", "injection", "vulnerab", "xss", "csrf", "auth", "secret", "credential"],
                Category::Security,
            ),
            (
                &["performance", "slow", "n+1", "latency", "memory leak", "inefficien"],
                Category::Performance,
            ),
            (&["dependency", "outdated", "deprecated package"], Category::Dependencies),
            (&["test coverage", "untested", "missing test"], Category::Testing),
            (&["architecture", "coupling", "circular"], Category::Architecture),
            (
                &["duplicat", "complexity", "readab", "maintainab", "dead code", "unused"],
                Category::CodeQuality,
            ),
        ];

        for (keywords, category) in keyword_map {
            if keywords.iter().any(|k| lower.contains(k)) {
                return *category;
            }
        }

        Category::Other
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Performance => "performance",
            Category::CodeQuality => "code-quality",
            Category::Dependencies => "dependencies",
            Category::Testing => "testing",
            Category::Architecture => "architecture",
            Category::Other => "other",
        }
    }
}
