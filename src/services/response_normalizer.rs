use crate::enums::category::Category;
use crate::enums::raw_response::RawResponse;
use crate::enums::response_format::ResponseFormat;
use crate::enums::severity::Severity;
use crate::services::fingerprinter::Fingerprinter;
use crate::structs::issue::Issue;
use crate::structs::issue_location::IssueLocation;
use crate::structs::normalized_response::NormalizedResponse;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

const ISSUE_FIELD: &str = "issue:";
const SEVERITY_FIELD: &str = "severity:";
const CATEGORY_FIELD: &str = "category:";
const FILE_FIELD: &str = "file:";
const LINE_FIELD: &str = "line:";
const COLUMN_FIELD: &str = "column:";
const DESCRIPTION_FIELD: &str = "description:";
const SNIPPET_FIELD: &str = "snippet:";

const MAX_PROSE_TITLE_LEN: usize = 120;

static FILE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ([A-Za-z0-9_][A-Za-z0-9_\-./]*
         \.(?:ts|tsx|js|jsx|mjs|rs|py|go|java|rb|php|cs|cpp|cc|hpp|c|h|swift|kt|scala|sql|sh|yml|yaml|json|toml|vue|svelte))
        \b",
    )
    .expect("file path regex")
});

static LINE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\blines?[\s:#]*(\d{1,6})\b").expect("line ref regex"));

static FILE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z0-9_][A-Za-z0-9_\-./]*\.[A-Za-z]{1,6}):(\d{1,6})\b")
        .expect("file:line regex")
});

static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:\d+[.)]\s+|[-*•]\s+)(.+)$").expect("list item regex"));

// Splitting on a bare '.' would cut file names like "auth.ts" in half, so
// sentence boundaries require trailing whitespace.
static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+|\n").expect("sentence split regex"));

/// Converts one raw backend response of unknown shape into canonical issues
/// plus a parse-confidence signal. Total inability to find a single
/// issue-like fragment is the only case producing an empty list — nothing in
/// here signals failure to the caller.
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    pub fn normalize(raw: &RawResponse) -> NormalizedResponse {
        match raw {
            RawResponse::Structured(value) => Self::normalize_value(value),
            RawResponse::Text(text) => Self::normalize_text(text),
        }
    }

    fn normalize_value(value: &Value) -> NormalizedResponse {
        if let Some(items) = Self::find_issue_array(value) {
            let issues = Self::issues_from_array(items);
            if !issues.is_empty() {
                return Self::finish(issues, ResponseFormat::StructuredJson);
            }
        }

        // Provider envelopes wrap the useful text one level down; unwrap and
        // send the inner payload back through the text chain.
        if let Some(inner) = Self::unwrap_envelope(value) {
            return Self::normalize_text(&inner);
        }

        // Last resort: scan the serialized value as prose. Deliberately skips
        // the JSON branch, which would loop back here.
        Self::scan_text_formats(&value.to_string())
    }

    fn normalize_text(text: &str) -> NormalizedResponse {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return NormalizedResponse::empty();
        }

        // JSON stuffed into a string, optionally fenced.
        let candidate = Self::strip_code_fences(trimmed);
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if !matches!(value, Value::String(_)) {
                return Self::normalize_value(&value);
            }
        }

        Self::scan_text_formats(trimmed)
    }

    fn scan_text_formats(trimmed: &str) -> NormalizedResponse {
        let block_issues = Self::parse_templated_blocks(trimmed);
        if !block_issues.is_empty() {
            return Self::finish(block_issues, ResponseFormat::TemplatedBlocks);
        }

        let itemized = Self::parse_itemized(trimmed);
        if !itemized.is_empty() {
            return Self::finish(itemized, ResponseFormat::ItemizedProse);
        }

        let prose = Self::parse_free_prose(trimmed);
        if !prose.is_empty() {
            return Self::finish(prose, ResponseFormat::FreeProse);
        }

        NormalizedResponse::empty()
    }

    fn finish(issues: Vec<Issue>, format: ResponseFormat) -> NormalizedResponse {
        let parse_confidence = format.parse_confidence();
        let issues = issues
            .into_iter()
            .map(|mut issue| {
                issue.confidence = Fingerprinter::merged_confidence(parse_confidence, 1);
                issue
            })
            .collect();

        NormalizedResponse {
            issues,
            format,
            parse_confidence,
        }
    }

    // -- structured JSON --

    fn find_issue_array(value: &Value) -> Option<&Vec<Value>> {
        match value {
            Value::Array(items) => Some(items),
            Value::Object(obj) => ["issues", "findings", "vulnerabilities", "problems"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_array)),
            _ => None,
        }
    }

    fn issues_from_array(items: &[Value]) -> Vec<Issue> {
        items
            .iter()
            .filter_map(|item| item.as_object().and_then(Self::issue_from_object))
            .collect()
    }

    fn issue_from_object(obj: &Map<String, Value>) -> Option<Issue> {
        let title = Self::string_field(obj, &["title", "issue", "name", "summary"]);
        let description = Self::string_field(obj, &["description", "detail", "details", "impact"])
            .unwrap_or_default();

        // An entry with neither title nor description is not issue-like.
        let title = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ if !description.trim().is_empty() => Self::truncate(&description, 80),
            _ => return None,
        };

        let severity = Self::string_field(obj, &["severity", "priority", "level"])
            .map(|s| Severity::coerce(&s))
            .unwrap_or_default();

        let category = Self::string_field(obj, &["category", "type", "kind"])
            .map(|s| Category::coerce(&s))
            .filter(|c| *c != Category::Other)
            .unwrap_or_else(|| Category::infer_from_text(&format!("{} {}", title, description)));

        let location = Self::location_from_object(obj);

        let code_snippet = Self::string_field(obj, &["code_snippet", "snippet", "code"])
            .or_else(|| {
                obj.get("evidence")
                    .and_then(Value::as_object)
                    .and_then(|e| Self::string_field(e, &["snippet", "code"]))
            })
            .filter(|s| !s.trim().is_empty());

        Some(Self::build_issue(title, description, severity, category, location, code_snippet))
    }

    fn location_from_object(obj: &Map<String, Value>) -> IssueLocation {
        if let Some(loc) = obj.get("location").and_then(Value::as_object) {
            let file = Self::string_field(loc, &["file", "path", "file_path"]);
            let line = Self::numeric_field(loc, &["line", "line_number"]);
            let column = Self::numeric_field(loc, &["column", "col"]);
            return IssueLocation::new(file.filter(|f| f != "unknown"), line, column);
        }

        let file = Self::string_field(obj, &["file", "file_path", "path"]);
        let line = Self::numeric_field(obj, &["line", "line_number"]);
        IssueLocation::new(file.filter(|f| f != "unknown"), line, None)
    }

    fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| {
            obj.get(*key).and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        })
    }

    fn numeric_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<usize> {
        keys.iter().find_map(|key| {
            obj.get(*key).and_then(|v| match v {
                Value::Number(n) => n.as_u64().map(|n| n as usize),
                Value::String(s) => s.trim().parse::<usize>().ok(),
                _ => None,
            })
        })
    }

    /// Unwraps the provider envelopes seen in the wild: OpenAI chat/completion
    /// choices, Anthropic content blocks, and the proxy `response`/`result`
    /// forms. Returns the inner text payload if one exists.
    fn unwrap_envelope(value: &Value) -> Option<String> {
        let obj = value.as_object()?;

        if let Some(choice) = obj.get("choices").and_then(Value::as_array).and_then(|c| c.first()) {
            if let Some(content) = choice
                .get("message")
                .and_then(|m| m.get("content"))
                .and_then(Value::as_str)
            {
                return Some(content.to_string());
            }
            if let Some(text) = choice.get("text").and_then(Value::as_str) {
                return Some(text.to_string());
            }
        }

        if let Some(blocks) = obj.get("content").and_then(Value::as_array) {
            let joined: String = blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            if !joined.is_empty() {
                return Some(joined);
            }
        }

        if let Some(content) = obj.get("content").and_then(Value::as_str) {
            return Some(content.to_string());
        }

        if let Some(response) = obj.get("response").and_then(Value::as_str) {
            return Some(response.to_string());
        }

        match obj.get("result") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(inner)) => Self::string_field(inner, &["content", "text"]),
            _ => None,
        }
    }

    fn strip_code_fences(text: &str) -> &str {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        rest.trim_start_matches(['\r', '\n'])
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or(trimmed)
    }

    // -- templated key-value blocks --

    fn parse_templated_blocks(text: &str) -> Vec<Issue> {
        let lines: Vec<&str> = text.lines().collect();
        let has_issue_marker = lines
            .iter()
            .any(|l| l.trim().to_lowercase().starts_with(ISSUE_FIELD));
        if !has_issue_marker {
            return Vec::new();
        }

        let mut issues = Vec::new();
        let mut current: Option<BlockFields> = None;

        for line in lines {
            let trimmed = line.trim();
            let lower = trimmed.to_lowercase();

            if lower.starts_with(ISSUE_FIELD) {
                if let Some(fields) = current.take() {
                    issues.extend(fields.into_issue());
                }
                current = Some(BlockFields::new(Self::field_value(trimmed, ISSUE_FIELD)));
                continue;
            }

            let Some(fields) = current.as_mut() else {
                continue;
            };

            if lower.starts_with(SEVERITY_FIELD) {
                fields.severity = Some(Severity::coerce(&Self::field_value(trimmed, SEVERITY_FIELD)));
            } else if lower.starts_with(CATEGORY_FIELD) {
                fields.category = Some(Category::coerce(&Self::field_value(trimmed, CATEGORY_FIELD)));
            } else if lower.starts_with(FILE_FIELD) {
                fields.file = Some(Self::field_value(trimmed, FILE_FIELD));
            } else if lower.starts_with(LINE_FIELD) {
                fields.line = Self::field_value(trimmed, LINE_FIELD).parse().ok();
            } else if lower.starts_with(COLUMN_FIELD) {
                fields.column = Self::field_value(trimmed, COLUMN_FIELD).parse().ok();
            } else if lower.starts_with(DESCRIPTION_FIELD) {
                fields.description.push(Self::field_value(trimmed, DESCRIPTION_FIELD));
            } else if lower.starts_with(SNIPPET_FIELD) {
                fields.snippet = Some(Self::field_value(trimmed, SNIPPET_FIELD));
            } else if !trimmed.is_empty() {
                // Continuation of a free-form description.
                fields.description.push(trimmed.to_string());
            }
        }

        if let Some(fields) = current.take() {
            issues.extend(fields.into_issue());
        }

        issues
    }

    fn field_value(line: &str, field: &str) -> String {
        line[field.len()..].trim().to_string()
    }

    // -- numbered / bulleted prose --

    fn parse_itemized(text: &str) -> Vec<Issue> {
        LIST_ITEM_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let item = caps.get(1)?.as_str().trim();
                Self::issue_from_fragment(item, false)
            })
            .collect()
    }

    // -- free-flowing prose --

    fn parse_free_prose(text: &str) -> Vec<Issue> {
        SENTENCE_SPLIT_RE
            .split(text)
            .map(|s| s.trim().trim_end_matches(['.', '!', '?']))
            .filter(|s| !s.is_empty())
            .filter_map(|sentence| Self::issue_from_fragment(sentence, true))
            .collect()
    }

    /// Builds an issue from one prose fragment. When `require_location` is
    /// set, fragments without a file path or line reference are dropped —
    /// free prose mentions far too much to treat every sentence as a finding.
    fn issue_from_fragment(fragment: &str, require_location: bool) -> Option<Issue> {
        let (file, line) = Self::extract_location(fragment);

        if require_location && file.is_none() && line.is_none() {
            return None;
        }
        if fragment.split_whitespace().count() < 3 {
            return None;
        }

        let title = Self::truncate(fragment, MAX_PROSE_TITLE_LEN);
        let severity = Self::severity_from_text(fragment);
        let category = Category::infer_from_text(fragment);
        let location = IssueLocation::new(file, line, None);

        Some(Self::build_issue(
            title,
            fragment.to_string(),
            severity,
            category,
            location,
            None,
        ))
    }

    fn extract_location(fragment: &str) -> (Option<String>, Option<usize>) {
        if let Some(caps) = FILE_LINE_RE.captures(fragment) {
            let file = caps.get(1).map(|m| m.as_str().to_string());
            let line = caps.get(2).and_then(|m| m.as_str().parse().ok());
            return (file, line);
        }

        let file = FILE_PATH_RE
            .captures(fragment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        let line = LINE_REF_RE
            .captures(fragment)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());

        (file, line)
    }

    fn severity_from_text(text: &str) -> Severity {
        let lower = text.to_lowercase();
        if lower.contains("critical") || lower.contains("severe") {
            Severity::Critical
        } else if lower.contains("high") || lower.contains("serious") || lower.contains("major") {
            Severity::High
        } else if lower.contains("minor") || lower.contains("low") || lower.contains("trivial") {
            Severity::Low
        } else {
            Severity::Medium
        }
    }

    fn truncate(text: &str, max: usize) -> String {
        if text.chars().count() <= max {
            text.trim().to_string()
        } else {
            let cut: String = text.chars().take(max).collect();
            cut.trim_end().to_string()
        }
    }

    fn build_issue(
        title: String,
        description: String,
        severity: Severity,
        category: Category,
        location: IssueLocation,
        code_snippet: Option<String>,
    ) -> Issue {
        let fingerprint = Fingerprinter::fingerprint(category, &title, &location.file);
        Issue {
            title,
            description,
            severity,
            category,
            location,
            code_snippet,
            confidence: 0.0,
            fingerprint,
            support_count: 1,
        }
    }
}

struct BlockFields {
    title: String,
    severity: Option<Severity>,
    category: Option<Category>,
    file: Option<String>,
    line: Option<usize>,
    column: Option<usize>,
    description: Vec<String>,
    snippet: Option<String>,
}

impl BlockFields {
    fn new(title: String) -> Self {
        Self {
            title,
            severity: None,
            category: None,
            file: None,
            line: None,
            column: None,
            description: Vec::new(),
            snippet: None,
        }
    }

    fn into_issue(self) -> Option<Issue> {
        if self.title.trim().is_empty() {
            return None;
        }

        let description = self.description.join("\n");
        let category = self
            .category
            .filter(|c| *c != Category::Other)
            .unwrap_or_else(|| {
                Category::infer_from_text(&format!("{} {}", self.title, description))
            });
        let location = IssueLocation::new(self.file.filter(|f| f != "unknown"), self.line, self.column);

        Some(ResponseNormalizer::build_issue(
            self.title,
            description,
            self.severity.unwrap_or_default(),
            category,
            location,
            self.snippet.filter(|s| !s.trim().is_empty()),
        ))
    }
}
