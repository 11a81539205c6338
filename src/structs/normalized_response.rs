use crate::enums::response_format::ResponseFormat;
use crate::structs::issue::Issue;

/// What the normalizer extracted from one raw backend response.
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    pub issues: Vec<Issue>,
    pub format: ResponseFormat,
    /// 0..=1, how structured the input appeared.
    pub parse_confidence: f64,
}

impl NormalizedResponse {
    pub fn empty() -> Self {
        Self {
            issues: Vec::new(),
            format: ResponseFormat::Unparseable,
            parse_confidence: 0.0,
        }
    }
}
