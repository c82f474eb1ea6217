use crate::error::SearchError;

/// A caller query reshaped for the upstream search syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedQuery {
    /// Lowercased term, quoted when it contains whitespace
    pub term: String,
    /// The same term without quotes, compared against genre tags
    pub tag: String,
}

/// Turns raw user input into an upstream query term.
///
/// The input is percent-decoded, stripped of surrounding whitespace, `+`
/// and `%20`, quoted if it still contains whitespace, unquoted if it is a
/// quoted single word, and lowercased.
///
/// # Example
///
/// ```
/// let q = format_query_string("  Soft%20Rock+")?;
/// assert_eq!(q.term, "\"soft rock\"");
/// assert_eq!(q.tag, "soft rock");
/// ```
pub fn format_query_string(raw: &str) -> Result<FormattedQuery, SearchError> {
    let decoded = urlencoding::decode(raw)
        .map_err(|e| SearchError::Query(format!("failed to unescape query string: {}", e)))?;

    let trimmed = trim_query(&decoded);
    let has_space = trimmed.contains(char::is_whitespace);
    let quoted = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');

    let term = if has_space && !quoted {
        format!("\"{}\"", trimmed)
    } else if !has_space && quoted {
        trimmed.trim_matches('"').to_string()
    } else {
        trimmed.to_string()
    }
    .to_lowercase();

    let tag = term.trim_matches('"').to_string();
    if tag.trim().is_empty() {
        return Err(SearchError::Query("query string is empty".to_string()));
    }

    Ok(FormattedQuery { term, tag })
}

fn trim_query(query: &str) -> &str {
    let mut query = query;
    loop {
        let next = query
            .trim_matches(|c: char| c.is_whitespace() || c == '+')
            .trim_start_matches("%20")
            .trim_end_matches("%20");
        if next.len() == query.len() {
            return next;
        }
        query = next;
    }
}

/// Validates a catalog id taken from a request path.
pub fn normalize_id(raw: &str) -> Result<String, SearchError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(SearchError::Query("id is empty".to_string()));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SearchError::Query(format!("invalid id {:?}", id)));
    }
    Ok(id.to_string())
}
