use super::error::FilterError;
use super::types::{Operation, SearchCriteria};
use regex::Regex;
use std::sync::OnceLock;

/// Separates clauses; `,` stays available for tag lists inside values
pub const CLAUSE_SEPARATOR: char = ';';

static CLAUSE_REGEX: OnceLock<Regex> = OnceLock::new();

// Two-character operators come first so `<=` is never read as `<` followed by `=value`.
fn clause_regex() -> &'static Regex {
    CLAUSE_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)(<=|>=|:|<|>|=)(.+)$").expect("clause regex is valid")
    })
}

/// Parses one `field<op>value` clause. Surrounding whitespace must already be removed.
pub fn parse_clause(clause: &str) -> Result<SearchCriteria, FilterError> {
    let captures = clause_regex()
        .captures(clause)
        .ok_or_else(|| FilterError::MalformedClause(clause.to_string()))?;

    let operation = Operation::from_token(&captures[2])
        .ok_or_else(|| FilterError::MalformedClause(clause.to_string()))?;

    SearchCriteria::new(&captures[1], operation, &captures[3])
}

/// Splits a raw `search` value into criteria, preserving clause order.
///
/// Blank clauses are skipped, so an empty query yields no criteria at all.
/// Any other clause that does not fit the grammar fails the whole query.
pub fn parse_search(query: &str) -> Result<Vec<SearchCriteria>, FilterError> {
    query
        .split(CLAUSE_SEPARATOR)
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(parse_clause)
        .collect()
}
