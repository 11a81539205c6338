pub const FIRST_ROUND_PROMPT: &str = r#"Analyze revision {revision} of this repository for concrete issues.

Report every issue you can find across security, performance, code quality, dependencies, testing, and architecture.

Respond in valid JSON with this exact structure:

{
  "issues": [
    {
      "title": "Short human label",
      "description": "What is wrong and why it matters",
      "severity": "critical|high|medium|low",
      "category": "security|performance|code-quality|dependencies|testing|architecture|other",
      "location": { "file": "path/to/file.ts", "line": 42 },
      "code_snippet": "offending code if available"
    }
  ]
}

If you cannot determine a file or line, use "unknown". Do not omit issues because they seem minor."#;

pub const FOLLOW_UP_PROMPT: &str = r#"Continue analyzing revision {revision} of this repository.

Previous analysis rounds already covered these files: {covered_files}
and these categories: {covered_categories}

Look specifically at files and categories NOT listed above. Report only issues you have not reported before, in the same JSON structure as before:

{
  "issues": [
    {
      "title": "Short human label",
      "description": "What is wrong and why it matters",
      "severity": "critical|high|medium|low",
      "category": "security|performance|code-quality|dependencies|testing|architecture|other",
      "location": { "file": "path/to/file.ts", "line": 42 },
      "code_snippet": "offending code if available"
    }
  ]
}

If you cannot determine a file or line, use "unknown"."#;
