/// Whether a statement is expected to produce rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Returning,
    NonReturning,
}

impl QueryKind {
    pub fn is_returning(self) -> bool {
        matches!(self, Self::Returning)
    }
}

const RETURNING_KEYWORDS: &[&str] = &["SELECT", "WITH", "PRAGMA", "EXPLAIN"];

/// Classify a trimmed statement by its leading keyword.
///
/// Only the leading run of ASCII letters is inspected, so `INSERT ...
/// RETURNING` is `NonReturning` and a statement that starts with a comment
/// or a parenthesis is `NonReturning` too.
pub fn classify(statement: &str) -> QueryKind {
    let end = statement
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(statement.len());
    let keyword = &statement[..end];
    if RETURNING_KEYWORDS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(keyword))
    {
        QueryKind::Returning
    } else {
        QueryKind::NonReturning
    }
}
