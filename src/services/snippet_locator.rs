use crate::structs::issue::Issue;
use crate::traits::location_resolver::LocationResolver;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_FILES_SCANNED: usize = 2000;
const MAX_FILE_BYTES: u64 = 512 * 1024;
const SKIPPED_DIRS: [&str; 5] = [".git", "node_modules", "target", "dist", "build"];

/// Resolves missing line numbers by searching a local checkout for the
/// issue's code snippet. Best-effort: the checkout may be absent, stale, or
/// the snippet may have been paraphrased, and all of those simply yield None.
pub struct SnippetLocator {
    root: PathBuf,
}

impl SnippetLocator {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn search_needle(snippet: &str) -> Option<&str> {
        // Match on the first substantive line; whole-snippet matching fails
        // on any whitespace reformatting.
        snippet
            .lines()
            .map(str::trim)
            .find(|line| line.len() >= 8)
    }

    fn find_in_file(path: &Path, needle: &str) -> Option<usize> {
        let metadata = fs::metadata(path).ok()?;
        if metadata.len() > MAX_FILE_BYTES {
            return None;
        }
        let content = fs::read_to_string(path).ok()?;
        content
            .lines()
            .position(|line| line.trim() == needle || line.contains(needle))
            .map(|index| index + 1)
    }

    fn walk(&self, dir: &Path, needle: &str, budget: &mut usize) -> Option<usize> {
        let entries = fs::read_dir(dir).ok()?;
        for entry in entries.flatten() {
            if *budget == 0 {
                return None;
            }
            let path = entry.path();
            if path.is_dir() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                    continue;
                }
                if let Some(line) = self.walk(&path, needle, budget) {
                    return Some(line);
                }
            } else {
                *budget -= 1;
                if let Some(line) = Self::find_in_file(&path, needle) {
                    return Some(line);
                }
            }
        }
        None
    }
}

impl LocationResolver for SnippetLocator {
    fn resolve(&self, issue: &Issue) -> Option<usize> {
        let snippet = issue.code_snippet.as_deref()?;
        let needle = Self::search_needle(snippet)?;

        if issue.location.is_file_known() {
            let candidate = self.root.join(&issue.location.file);
            if candidate.is_file() {
                return Self::find_in_file(&candidate, needle);
            }
        }

        let mut budget = MAX_FILES_SCANNED;
        self.walk(&self.root, needle, &mut budget)
    }
}
