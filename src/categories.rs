//! Category facet aggregation.
//!
//! Each contact's category field holds comma-separated tags. The facet list
//! is the set of all trimmed, non-empty tags across contacts, sorted by byte
//! order. Tags are compared exactly: `"Work"` and `"work"` are distinct.

use std::collections::BTreeSet;

/// Splits one category field into its trimmed, non-empty tags.
pub fn split_tags(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Collects the sorted, deduplicated tag set from many category fields.
pub fn collect_categories<'a, I>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let set: BTreeSet<&str> = fields.into_iter().flatten().flat_map(split_tags).collect();
    set.into_iter().map(str::to_string).collect()
}
