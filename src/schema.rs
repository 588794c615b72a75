//! Changelog Entry Schema
//!
//! Structural validation of a parsed changelog document. Nothing here touches the network:
//! a document that passes comes back as typed [`ChangelogEntry`] records ready for the
//! liveness stage.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EntryLabel, EntryViolation, StructuralError};
use crate::format::{
    is_non_empty_string, is_parseable_date, is_secure_url, is_syntactic_url, is_valid_guid,
};

/// The eight properties every changelog entry carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    Id,
    Author,
    AuthorImageUrl,
    Title,
    Date,
    Message,
    ImageUrl,
    BlogUrl,
}

impl EntryField {
    /// Declared order. Presence is checked in this order, so it decides which missing
    /// property gets reported.
    pub const ALL: [EntryField; 8] = [
        EntryField::Id,
        EntryField::Author,
        EntryField::AuthorImageUrl,
        EntryField::Title,
        EntryField::Date,
        EntryField::Message,
        EntryField::ImageUrl,
        EntryField::BlogUrl,
    ];

    /// Fields whose value is probed for liveness, in scheduling order
    pub const URL_FIELDS: [EntryField; 3] = [
        EntryField::AuthorImageUrl,
        EntryField::ImageUrl,
        EntryField::BlogUrl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntryField::Id => "id",
            EntryField::Author => "author",
            EntryField::AuthorImageUrl => "author_image_url",
            EntryField::Title => "title",
            EntryField::Date => "date",
            EntryField::Message => "message",
            EntryField::ImageUrl => "image_url",
            EntryField::BlogUrl => "blog_url",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A changelog entry that passed structural validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub id: String,
    pub author: String,
    pub author_image_url: String,
    pub title: String,
    pub date: String,
    pub message: String,
    pub image_url: String,
    pub blog_url: String,
}

impl ChangelogEntry {
    pub fn get(&self, field: EntryField) -> &str {
        match field {
            EntryField::Id => &self.id,
            EntryField::Author => &self.author,
            EntryField::AuthorImageUrl => &self.author_image_url,
            EntryField::Title => &self.title,
            EntryField::Date => &self.date,
            EntryField::Message => &self.message,
            EntryField::ImageUrl => &self.image_url,
            EntryField::BlogUrl => &self.blog_url,
        }
    }

    /// The (field, url) pairs the liveness stage probes
    pub fn urls(&self) -> impl Iterator<Item = (EntryField, &str)> + '_ {
        EntryField::URL_FIELDS
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

/// Raw view of one entry object before its contents are checked
struct RawEntry<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> RawEntry<'a> {
    fn str(&self, field: EntryField) -> Option<&'a str> {
        self.object.get(field.name()).and_then(Value::as_str)
    }

    /// Title as shown in diagnostics: strings, non-zero numbers and `true` are printed,
    /// anything else leaves the entry untitled
    fn label_title(&self) -> Option<String> {
        match self.object.get(EntryField::Title.name())? {
            Value::String(title) => Some(title.clone()),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }

    fn first_missing(&self) -> Option<EntryField> {
        EntryField::ALL
            .into_iter()
            .find(|field| !self.object.contains_key(field.name()))
    }

    fn extraneous(&self) -> Vec<String> {
        self.object
            .keys()
            .filter(|key| EntryField::from_name(key).is_none())
            .cloned()
            .collect()
    }

    fn check_contents(&self) -> Result<(), EntryViolation> {
        use EntryField::*;

        let id = self.str(Id);
        if !is_non_empty_string(id) {
            return Err(EntryViolation::Undefined(Id));
        }
        if !is_valid_guid(id) {
            return Err(EntryViolation::InvalidGuid);
        }
        for field in [Title, Author] {
            if !is_non_empty_string(self.str(field)) {
                return Err(EntryViolation::Undefined(field));
            }
        }
        check_url(self.str(AuthorImageUrl), AuthorImageUrl, true)?;
        if !is_parseable_date(self.str(Date)) {
            return Err(EntryViolation::Undefined(Date));
        }
        if !is_non_empty_string(self.str(Message)) {
            return Err(EntryViolation::MessageNotString);
        }
        check_url(self.str(ImageUrl), ImageUrl, true)?;
        check_url(self.str(BlogUrl), BlogUrl, false)
    }

    fn into_entry(self) -> ChangelogEntry {
        let take = |field| self.str(field).unwrap_or_default().to_string();
        ChangelogEntry {
            id: take(EntryField::Id),
            author: take(EntryField::Author),
            author_image_url: take(EntryField::AuthorImageUrl),
            title: take(EntryField::Title),
            date: take(EntryField::Date),
            message: take(EntryField::Message),
            image_url: take(EntryField::ImageUrl),
            blog_url: take(EntryField::BlogUrl),
        }
    }
}

fn check_url(value: Option<&str>, field: EntryField, secure: bool) -> Result<(), EntryViolation> {
    if !is_syntactic_url(value) {
        return Err(EntryViolation::InvalidUrl(field));
    }
    if secure && !is_secure_url(value) {
        return Err(EntryViolation::InsecureUrl(field));
    }
    Ok(())
}

/// Validate one entry. `index` is the 1-based position used in diagnostics.
pub fn validate_entry(value: &Value, index: usize) -> Result<ChangelogEntry, StructuralError> {
    let Some(object) = value.as_object() else {
        return Err(StructuralError::entry(
            EntryLabel::untitled(index),
            EntryViolation::NotObject,
        ));
    };

    let raw = RawEntry { object };
    let label = EntryLabel::new(index, raw.label_title());

    if let Some(missing) = raw.first_missing() {
        return Err(StructuralError::entry(
            label,
            EntryViolation::MissingProperty(missing),
        ));
    }

    let extras = raw.extraneous();
    if !extras.is_empty() {
        return Err(StructuralError::entry(
            label,
            EntryViolation::ExtraneousProperties(extras),
        ));
    }

    raw.check_contents()
        .map_err(|violation| StructuralError::entry(label, violation))?;

    Ok(raw.into_entry())
}

/// Validate a whole document, stopping at the first invalid entry
pub fn validate_document(value: &Value) -> Result<Vec<ChangelogEntry>, StructuralError> {
    let items = value.as_array().ok_or(StructuralError::BodyNotArray)?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_entry(item, i + 1))
        .collect()
}
