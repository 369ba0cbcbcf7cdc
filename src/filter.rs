//! Store-side filter construction.
//!
//! A [`ContactFilter`] describes which contacts a listing should return. The
//! Airtable store renders it into a formula with [`ContactFilter::to_formula`]
//! and lets Airtable evaluate it. The in-memory store evaluates it directly
//! with [`ContactFilter::matches`].
//!
//! # Semantics
//!
//! - `search` matches when it is a case-insensitive substring of any of
//!   `Name`, `Surname`, `Company`, `Notes`, `Category`.
//! - `category` matches when it is a case-insensitive substring of `Category`.
//! - Both present: both must match. Neither present: everything matches.

use crate::models::RawFields;

/// Fields the free-text search looks at, by remote column name.
pub const SEARCH_FIELDS: [&str; 5] = ["Name", "Surname", "Company", "Notes", "Category"];

/// Column holding comma-separated category tags.
pub const CATEGORY_FIELD: &str = "Category";

/// Column listings are sorted by.
pub const SORT_FIELD: &str = "Name";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ContactFilter {
    /// Builds a filter, treating empty or whitespace-only inputs as absent.
    pub fn new(search: &str, category: &str) -> Self {
        fn non_empty(s: &str) -> Option<String> {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Self {
            search: non_empty(search),
            category: non_empty(category),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none()
    }

    /// Renders the filter as an Airtable formula, or `None` when there is
    /// nothing to filter on.
    pub fn to_formula(&self) -> Option<String> {
        let mut terms = Vec::new();

        if let Some(search) = &self.search {
            let ors: Vec<String> = SEARCH_FIELDS
                .iter()
                .map(|field| contains_term(search, field))
                .collect();
            terms.push(format!("OR({})", ors.join(",")));
        }

        if let Some(category) = &self.category {
            terms.push(contains_term(category, CATEGORY_FIELD));
        }

        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(format!("AND({})", terms.join(","))),
        }
    }

    /// Evaluates the filter against a record locally.
    pub fn matches(&self, fields: &RawFields) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [
                &fields.name,
                &fields.surname,
                &fields.company,
                &fields.notes,
                &fields.category,
            ]
            .iter()
            .any(|v| contains_ci(v.as_deref(), &needle));
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !contains_ci(fields.category.as_deref(), &category.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

fn contains_ci(haystack: Option<&str>, lowered_needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(lowered_needle))
        .unwrap_or(false)
}

fn contains_term(value: &str, field: &str) -> String {
    format!(
        "SEARCH(LOWER(\"{}\"), LOWER({{{}}}))",
        escape_formula_string(value),
        field
    )
}

/// Escapes a value for use inside a double-quoted formula string literal.
pub fn escape_formula_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, category: &str) -> RawFields {
        RawFields {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_filter_has_no_formula() {
        let f = ContactFilter::new("", "   ");
        assert!(f.is_empty());
        assert_eq!(f.to_formula(), None);
    }

    #[test]
    fn test_search_only_formula() {
        let f = ContactFilter::new("alice", "");
        assert_eq!(
            f.to_formula().unwrap(),
            "OR(SEARCH(LOWER(\"alice\"), LOWER({Name})),\
             SEARCH(LOWER(\"alice\"), LOWER({Surname})),\
             SEARCH(LOWER(\"alice\"), LOWER({Company})),\
             SEARCH(LOWER(\"alice\"), LOWER({Notes})),\
             SEARCH(LOWER(\"alice\"), LOWER({Category})))"
        );
    }

    #[test]
    fn test_category_only_formula() {
        let f = ContactFilter::new("", "Work");
        assert_eq!(
            f.to_formula().unwrap(),
            "SEARCH(LOWER(\"Work\"), LOWER({Category}))"
        );
    }

    #[test]
    fn test_both_are_anded() {
        let formula = ContactFilter::new("bob", "Family").to_formula().unwrap();
        assert!(formula.starts_with("AND(OR("));
        assert!(formula.ends_with(",SEARCH(LOWER(\"Family\"), LOWER({Category})))"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let formula = ContactFilter::new("", r#"a"), TRUE()"#).to_formula().unwrap();
        assert_eq!(
            formula,
            r#"SEARCH(LOWER("a\"), TRUE()"), LOWER({Category}))"#
        );
        assert_eq!(escape_formula_string(r"x\y"), r"x\\y");
    }

    #[test]
    fn test_matches_search_any_field_case_insensitive() {
        let f = ContactFilter::new("PETRO", "");
        let mut rec = fields("Anna", "");
        assert!(!f.matches(&rec));
        rec.surname = Some("Petrova".into());
        assert!(f.matches(&rec));
    }

    #[test]
    fn test_matches_requires_both() {
        let f = ContactFilter::new("anna", "work");
        assert!(f.matches(&fields("Anna", "Family, Work")));
        assert!(!f.matches(&fields("Anna", "Family")));
        assert!(!f.matches(&fields("Boris", "Work")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(ContactFilter::default().matches(&RawFields::default()));
    }
}
