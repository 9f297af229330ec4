//! `ActivityPub` Note object.

use activitypub_federation::kinds::object::NoteType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// `ActivityPub` Note object.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApNote {
    #[serde(rename = "type")]
    pub kind: NoteType,
    pub id: Url,
    pub attributed_to: Url,
    pub content: String,
    pub published: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Url>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Url>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<Url>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<ApTag>,
}

/// Tag attached to a note. Only mentions carry meaning here.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ApTag {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<Url>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ApTag {
    /// Create a mention tag.
    #[must_use]
    pub fn mention(href: Url, name: String) -> Self {
        Self {
            kind: "Mention".to_string(),
            href: Some(href),
            name: Some(name),
        }
    }

    /// Whether this tag is a mention.
    #[must_use]
    pub fn is_mention(&self) -> bool {
        self.kind == "Mention"
    }
}

impl ApNote {
    /// Actor URIs mentioned by this note.
    pub fn mentioned(&self) -> impl Iterator<Item = &Url> {
        self.tag
            .iter()
            .filter(|tag| tag.is_mention())
            .filter_map(|tag| tag.href.as_ref())
    }
}
