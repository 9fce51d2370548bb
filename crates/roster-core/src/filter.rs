//! Typed search filter for resources.
//!
//! Clauses exist only for the fields that were supplied. Every term goes
//! through [`SearchTerm::parse`] so the store layer never sees raw user
//! input, and store implementations must bind terms as parameters.

use serde::Deserialize;

/// Longest term (in characters) kept after sanitization.
pub const MAX_TERM_CHARS: usize = 128;

/// A sanitized, lowercased, case-insensitive substring needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Sanitize raw user input. Returns `None` when nothing searchable is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_lowercase()
            .chars()
            .take(MAX_TERM_CHARS)
            .collect();

        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match, the same semantics the store applies.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }
}

/// Searchable resource fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    PhoneNumber,
    Email,
    IdentityCard,
}

impl SearchField {
    /// Fields covered by the free-text `search` term.
    pub const ALL: [SearchField; 4] = [
        SearchField::Name,
        SearchField::PhoneNumber,
        SearchField::Email,
        SearchField::IdentityCard,
    ];

    /// Column name in the resource table.
    pub fn column(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::PhoneNumber => "phone_number",
            SearchField::Email => "email",
            SearchField::IdentityCard => "identity_card",
        }
    }
}

/// Raw query-string parameters for resource search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub identity_card: Option<String>,
}

/// A resource search filter.
///
/// `search` matches when any of [`SearchField::ALL`] contains the term.
/// Field terms must each match their own field. All groups are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    search: Option<SearchTerm>,
    fields: Vec<(SearchField, SearchTerm)>,
}

impl ResourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the term against every searchable field (OR).
    pub fn search(mut self, raw: &str) -> Self {
        self.search = SearchTerm::parse(raw);
        self
    }

    /// Require `field` to contain the term. Blank terms are ignored.
    pub fn field(mut self, field: SearchField, raw: &str) -> Self {
        if let Some(term) = SearchTerm::parse(raw) {
            self.fields.retain(|(f, _)| *f != field);
            self.fields.push((field, term));
        }
        self
    }

    pub fn search_term(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    pub fn field_terms(&self) -> &[(SearchField, SearchTerm)] {
        &self.fields
    }

    /// True when no clause would be emitted; such a filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.fields.is_empty()
    }
}

impl From<SearchParams> for ResourceFilter {
    fn from(params: SearchParams) -> Self {
        let mut filter = ResourceFilter::new();
        if let Some(search) = params.search.as_deref() {
            filter = filter.search(search);
        }
        let fields = [
            (SearchField::Name, params.name),
            (SearchField::PhoneNumber, params.phone_number),
            (SearchField::Email, params.email),
            (SearchField::IdentityCard, params.identity_card),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                filter = filter.field(field, &value);
            }
        }
        filter
    }
}
