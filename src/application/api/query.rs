//! Query-string construction for list filters.

use url::form_urlencoded;

/// Ordered query parameters; absent or blank values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter unless its value is blank.
    #[must_use]
    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    /// Adds a parameter when present and not blank.
    #[must_use]
    pub fn push_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// True when no parameter was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders `?k=v&...`, or an empty string without parameters.
    #[must_use]
    pub fn build(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        format!("?{encoded}")
    }

    /// Appends the rendered query to a path.
    #[must_use]
    pub fn apply(&self, path: &str) -> String {
        format!("{path}{}", self.build())
    }
}

/// Percent-encodes a value for use as a single path segment.
///
/// Separators such as `/`, `?` and `#` are escaped, and the dot segments
/// `.` and `..` are encoded so they cannot climb the path.
#[must_use]
pub fn path_segment(value: &str) -> String {
    match value {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => form_urlencoded::byte_serialize(value.as_bytes())
            .collect::<String>()
            .replace('+', "%20"),
    }
}

/// Page selection shared by list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Items per page.
    pub limit: Option<u32>,
}

impl PageRequest {
    /// Selects one page of `limit` items.
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Adds `page` and `limit` after the other parameters.
    #[must_use]
    pub fn append_to(self, query: QueryString) -> QueryString {
        query.push_opt("page", self.page).push_opt("limit", self.limit)
    }
}
