//! Core data models used throughout the directory.
//!
//! Two families of types live here: the raw shapes decoded from the remote
//! store ([`RawRecord`], [`RawFields`], [`RawAttachment`]) and the stable
//! shapes served to clients ([`Contact`], [`Photo`], [`PageResult`]).
//!
//! Raw decoding is lenient. Every field is optional, and a field that
//! arrives with an unexpected JSON shape is treated as absent rather than
//! failing the whole response.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A contact as served to clients.
///
/// Every text field is present; absent remote fields become `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub position: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub telegram: String,
    /// Comma-separated category tags, as stored remotely.
    pub category: String,
    pub notes: String,
    pub photos: Vec<Photo>,
}

/// A photo attached to a contact. Referenced by URL, never copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<BTreeMap<String, Thumbnail>>,
}

/// One thumbnail rendition, keyed by size name (`small`, `large`, `full`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// One page of contacts plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub records: Vec<Contact>,
    pub total_records: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
}

// ============ Remote shapes ============

/// A record as returned by the remote store.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: RawFields,
}

/// The fixed field schema of a contact row. Unknown columns are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawFields {
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "Surname", default, deserialize_with = "lenient_text")]
    pub surname: Option<String>,
    #[serde(rename = "Position", default, deserialize_with = "lenient_text")]
    pub position: Option<String>,
    #[serde(rename = "Company", default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(rename = "LinkedIn", default, deserialize_with = "lenient_text")]
    pub linkedin: Option<String>,
    #[serde(rename = "Facebook", default, deserialize_with = "lenient_text")]
    pub facebook: Option<String>,
    #[serde(rename = "Instagram", default, deserialize_with = "lenient_text")]
    pub instagram: Option<String>,
    #[serde(rename = "Twitter", default, deserialize_with = "lenient_text")]
    pub twitter: Option<String>,
    #[serde(rename = "Telegram", default, deserialize_with = "lenient_text")]
    pub telegram: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(rename = "Notes", default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(rename = "Photos", default, deserialize_with = "lenient_attachments")]
    pub photos: Option<Vec<RawAttachment>>,
}

/// An attachment cell entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAttachment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<BTreeMap<String, Thumbnail>>,
}

/// Converts a cell into text: strings as-is, numbers and booleans via their
/// display form, lists of scalars joined with `", "`. Anything else is absent.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(value_to_text).collect();
            Some(parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn lenient_attachments<'de, D>(deserializer: D) -> Result<Option<Vec<RawAttachment>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
