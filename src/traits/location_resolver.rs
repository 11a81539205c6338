use crate::structs::issue::Issue;

/// Optional collaborator that tries to pin down a line number for issues the
/// backend located only by snippet. An unknown line stays a legal terminal
/// value when resolution finds nothing.
pub trait LocationResolver: Send + Sync {
    fn resolve(&self, issue: &Issue) -> Option<usize>;
}
