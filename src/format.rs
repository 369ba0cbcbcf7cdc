//! Mapping from raw remote records to [`Contact`]s.
//!
//! The mapping is total: absent fields default to `""` and absent photos to
//! an empty list. There is no error path.

use crate::models::{Contact, Photo, RawRecord};

/// Formats one raw record into a [`Contact`].
pub fn format_record(record: RawRecord) -> Contact {
    let f = record.fields;

    Contact {
        id: record.id,
        name: f.name.unwrap_or_default(),
        surname: f.surname.unwrap_or_default(),
        position: f.position.unwrap_or_default(),
        company: f.company.unwrap_or_default(),
        phone: f.phone.unwrap_or_default(),
        email: f.email.unwrap_or_default(),
        linkedin: f.linkedin.unwrap_or_default(),
        facebook: f.facebook.unwrap_or_default(),
        instagram: f.instagram.unwrap_or_default(),
        twitter: f.twitter.unwrap_or_default(),
        telegram: f.telegram.unwrap_or_default(),
        category: f.category.unwrap_or_default(),
        notes: f.notes.unwrap_or_default(),
        photos: f
            .photos
            .unwrap_or_default()
            .into_iter()
            .map(|a| Photo {
                id: a.id,
                url: a.url,
                thumbnails: a.thumbnails,
            })
            .collect(),
    }
}
