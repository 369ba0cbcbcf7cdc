//! In-memory [`ContactStore`] implementation for tests and demos.
//!
//! Evaluates filters locally with [`ContactFilter::matches`] and sorts by
//! name ignoring case, as Airtable does. The sort is stable, so rows whose
//! names compare equal keep insertion order.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::filter::{CATEGORY_FIELD, SORT_FIELD};
use crate::models::{RawFields, RawRecord};

use super::{ContactStore, ListOptions, Result};

/// Rows held in a `Vec` behind a `RwLock`.
pub struct InMemoryStore {
    records: RwLock<Vec<RawRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<RawRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn insert(&self, record: RawRecord) {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps only the requested columns. An empty projection keeps everything.
fn project(fields: &RawFields, columns: &[String]) -> RawFields {
    if columns.is_empty() {
        return fields.clone();
    }
    let mut out = RawFields::default();
    for column in columns {
        match column.as_str() {
            "Name" => out.name = fields.name.clone(),
            "Surname" => out.surname = fields.surname.clone(),
            "Position" => out.position = fields.position.clone(),
            "Company" => out.company = fields.company.clone(),
            "Phone" => out.phone = fields.phone.clone(),
            "Email" => out.email = fields.email.clone(),
            "LinkedIn" => out.linkedin = fields.linkedin.clone(),
            "Facebook" => out.facebook = fields.facebook.clone(),
            "Instagram" => out.instagram = fields.instagram.clone(),
            "Twitter" => out.twitter = fields.twitter.clone(),
            "Telegram" => out.telegram = fields.telegram.clone(),
            c if c == CATEGORY_FIELD => out.category = fields.category.clone(),
            "Notes" => out.notes = fields.notes.clone(),
            "Photos" => out.photos = fields.photos.clone(),
            _ => {}
        }
    }
    out
}

#[async_trait]
impl ContactStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self, options: &ListOptions) -> Result<Vec<RawRecord>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());

        let mut out: Vec<RawRecord> = records
            .iter()
            .filter(|r| options.filter.matches(&r.fields))
            .map(|r| RawRecord {
                id: r.id.clone(),
                created_time: r.created_time.clone(),
                fields: project(&r.fields, &options.fields),
            })
            .collect();

        if options.sort.as_deref() == Some(SORT_FIELD) {
            out.sort_by_cached_key(|r| r.fields.name.as_deref().unwrap_or("").to_lowercase());
        }

        Ok(out)
    }

    async fn find(&self, id: &str) -> Result<Option<RawRecord>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ContactFilter;

    fn rec(id: &str, name: &str, category: &str) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            created_time: None,
            fields: RawFields {
                name: Some(name.to_string()),
                category: Some(category.to_string()),
                notes: Some("note".to_string()),
                ..Default::default()
            },
        }
    }

    fn store() -> InMemoryStore {
        InMemoryStore::with_records(vec![
            rec("r1", "Zoe", "Work"),
            rec("r2", "Anna", "Family"),
            rec("r3", "Mark", "Family, Work"),
        ])
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let out = store()
            .list(&ListOptions::contacts(ContactFilter::default()))
            .await
            .unwrap();
        let names: Vec<_> = out.iter().map(|r| r.fields.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["Anna", "Mark", "Zoe"]);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let out = store()
            .list(&ListOptions::contacts(ContactFilter::new("", "work")))
            .await
            .unwrap();
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r1"]);
    }

    #[tokio::test]
    async fn test_categories_projection() {
        let out = store().list(&ListOptions::categories()).await.unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.fields.name.is_none() && r.fields.notes.is_none()));
        assert_eq!(out[0].fields.category.as_deref(), Some("Work"));
    }

    #[tokio::test]
    async fn test_find() {
        let s = store();
        assert_eq!(s.find("r2").await.unwrap().unwrap().id, "r2");
        assert!(s.find("missing").await.unwrap().is_none());
    }

    #[test]
    fn test_insert_and_len() {
        let s = InMemoryStore::new();
        assert!(s.is_empty());
        s.insert(rec("r9", "Ivan", ""));
        assert_eq!(s.len(), 1);
    }

    #[tokio::test]
    async fn test_sort_ignores_case() {
        let s = InMemoryStore::with_records(vec![
            rec("r1", "Zoe", ""),
            rec("r2", "anna", ""),
            rec("r3", "Anna", ""),
            rec("r4", "boris", ""),
        ]);
        let out = s
            .list(&ListOptions::contacts(ContactFilter::default()))
            .await
            .unwrap();
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r3", "r4", "r1"]);
    }
}
