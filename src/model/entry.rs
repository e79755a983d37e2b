use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use super::language::Language;
use crate::error::FieldError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: ObjectId,

    pub author: ObjectId,

    pub index: String,

    pub language: Language,

    pub mirror: String,

    pub mirror_language: Language,

    pub definition_node: ObjectId,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// True when `other` is the translation counterpart of `self`.
    pub fn mirrors(&self, other: &Entry) -> bool {
        self.definition_node == other.definition_node
            && self.index == other.mirror
            && self.language == other.mirror_language
            && self.mirror == other.index
            && self.mirror_language == other.language
    }
}

/// An entry as submitted, before the store has accepted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub index: String,
    pub language: Option<Language>,
    pub mirror: Option<String>,
    pub mirror_language: Option<Language>,
    pub author: Option<ObjectId>,
    pub definition_node: Option<ObjectId>,
}

impl EntryDraft {
    pub fn new(index: impl Into<String>, language: Language) -> Self {
        EntryDraft {
            index: index.into(),
            language: Some(language),
            ..Default::default()
        }
    }

    pub fn with_mirror(mut self, mirror: impl Into<String>, language: Language) -> Self {
        self.mirror = Some(mirror.into());
        self.mirror_language = Some(language);
        self
    }

    /// Checks required fields and turns the draft into a storable entry.
    /// Every failing field is reported, not just the first.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Entry, Vec<FieldError>> {
        let mut errors = Vec::new();

        let index = self.index.trim().to_string();
        if index.is_empty() {
            errors.push(FieldError::required("index"));
        }

        let mirror = self
            .mirror
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        if mirror.is_none() {
            errors.push(FieldError::required("mirror"));
        }

        if self.language.is_none() {
            errors.push(FieldError::required("language"));
        }
        if self.mirror_language.is_none() {
            errors.push(FieldError::required("mirrorLanguage"));
        }
        if self.author.is_none() {
            errors.push(FieldError::required("author"));
        }
        if self.definition_node.is_none() {
            errors.push(FieldError::required("definitionNode"));
        }

        match (
            mirror,
            self.language,
            self.mirror_language,
            self.author,
            self.definition_node,
        ) {
            (Some(mirror), Some(language), Some(mirror_language), Some(author), Some(node))
                if errors.is_empty() =>
            {
                Ok(Entry {
                    id: ObjectId::new(),
                    author,
                    index,
                    language,
                    mirror,
                    mirror_language,
                    definition_node: node,
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(errors),
        }
    }
}
