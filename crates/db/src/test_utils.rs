//! Test fixtures for entities.
//!
//! Local accounts live under [`LOCAL_BASE_URL`]; remote accounts under
//! `https://{domain}/`.

#![allow(clippy::unwrap_used, missing_docs)]

use chrono::{Duration, Utc};
use url::Url;

use crate::entities::{Account, Follow, MediaAttachment, Status, StatusFave, Visibility};

/// Base URL of the local instance used by fixtures.
pub const LOCAL_BASE_URL: &str = "https://local.example/";

fn actor_uri(base: &str, username: &str) -> Url {
    Url::parse(base)
        .unwrap()
        .join(&format!("users/{username}"))
        .unwrap()
}

#[must_use]
pub fn local_account(id: &str, username: &str) -> Account {
    let uri = actor_uri(LOCAL_BASE_URL, username);
    Account {
        id: id.to_string(),
        username: username.to_string(),
        domain: None,
        inbox_uri: Url::parse(&format!("{uri}/inbox")).unwrap(),
        uri,
        locked: false,
        admin: false,
        avatar_media_attachment_id: None,
        header_media_attachment_id: None,
        created_at: Utc::now(),
    }
}

#[must_use]
pub fn remote_account(id: &str, username: &str, domain: &str) -> Account {
    let uri = actor_uri(&format!("https://{domain}/"), &format!("{username}-{id}"));
    Account {
        id: id.to_string(),
        username: username.to_string(),
        domain: Some(domain.to_string()),
        inbox_uri: Url::parse(&format!("{uri}/inbox")).unwrap(),
        uri,
        locked: false,
        admin: false,
        avatar_media_attachment_id: None,
        header_media_attachment_id: None,
        created_at: Utc::now(),
    }
}

#[must_use]
pub fn public_status(id: &str, author: &Account) -> Status {
    Status {
        id: id.to_string(),
        uri: Url::parse(&format!("{}/statuses/{id}", author.uri)).unwrap(),
        account_id: author.id.clone(),
        content: format!("status {id}"),
        visibility: Visibility::Public,
        in_reply_to_id: None,
        in_reply_to_account_id: None,
        boost_of_id: None,
        boost_of_account_id: None,
        mentioned_account_ids: Vec::new(),
        local: author.is_local(),
        created_at: Utc::now(),
    }
}

#[must_use]
pub fn fave(id: &str, account: &Account, status: &Status) -> StatusFave {
    StatusFave {
        id: id.to_string(),
        uri: Url::parse(&format!("{}/liked/{id}", account.uri)).unwrap(),
        account_id: account.id.clone(),
        target_account_id: status.account_id.clone(),
        status_id: status.id.clone(),
        created_at: Utc::now(),
    }
}

#[must_use]
pub fn follow(id: &str, account: &Account, target: &Account) -> Follow {
    Follow {
        id: id.to_string(),
        uri: Url::parse(&format!("{}/follow/{id}", account.uri)).unwrap(),
        account_id: account.id.clone(),
        target_account_id: target.id.clone(),
        pending: false,
        created_at: Utc::now(),
    }
}

/// An attachment owned by `owner`, created `age_days` ago.
///
/// Remote owners produce cached remote attachments.
#[must_use]
pub fn attachment(id: &str, owner: &Account, age_days: i64) -> MediaAttachment {
    MediaAttachment {
        id: id.to_string(),
        account_id: owner.id.clone(),
        status_id: None,
        remote_url: owner
            .domain
            .as_ref()
            .map(|domain| Url::parse(&format!("https://{domain}/media/{id}.jpg")).unwrap()),
        file_key: format!("{}/original/{id}.jpg", owner.id),
        thumbnail_key: format!("{}/small/{id}.jpg", owner.id),
        cached: true,
        avatar: false,
        header: false,
        created_at: Utc::now() - Duration::days(age_days),
    }
}
