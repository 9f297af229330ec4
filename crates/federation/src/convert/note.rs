//! Status to Note conversion and addressing.

use activitypub_federation::kinds::{object::NoteType, public};
use murmur_db::entities::{Account, Status, Visibility};
use url::Url;

use crate::objects::{ApNote, ApTag};

/// `to` and `cc` for a status with the given visibility.
#[must_use]
pub fn addressing(visibility: Visibility, followers: &Url, mentions: &[Url]) -> (Vec<Url>, Vec<Url>) {
    match visibility {
        Visibility::Public => {
            let mut cc = vec![followers.clone()];
            cc.extend_from_slice(mentions);
            (vec![public()], cc)
        }
        Visibility::Unlisted => {
            let mut to = vec![followers.clone()];
            to.extend_from_slice(mentions);
            (to, vec![public()])
        }
        Visibility::FollowersOnly => {
            let mut to = vec![followers.clone()];
            to.extend_from_slice(mentions);
            (to, Vec::new())
        }
        Visibility::Direct => (mentions.to_vec(), Vec::new()),
    }
}

/// Infer visibility of an inbound note from its addressing.
#[must_use]
pub fn visibility_from_addressing(to: &[Url], cc: &[Url]) -> Visibility {
    let public = public();
    if to.contains(&public) {
        Visibility::Public
    } else if cc.contains(&public) {
        Visibility::Unlisted
    } else if to
        .iter()
        .chain(cc)
        .any(|url| url.path().ends_with("/followers"))
    {
        Visibility::FollowersOnly
    } else {
        Visibility::Direct
    }
}

/// Render a local status as a Note.
#[must_use]
pub fn status_to_note(
    status: &Status,
    author: &Account,
    followers: &Url,
    mentioned: &[Account],
    in_reply_to: Option<Url>,
) -> ApNote {
    let mention_uris: Vec<Url> = mentioned.iter().map(|a| a.uri.clone()).collect();
    let (to, cc) = addressing(status.visibility, followers, &mention_uris);

    ApNote {
        kind: NoteType::Note,
        id: status.uri.clone(),
        attributed_to: author.uri.clone(),
        content: status.content.clone(),
        published: status.created_at,
        to,
        cc,
        in_reply_to,
        summary: None,
        sensitive: None,
        tag: mentioned
            .iter()
            .map(|a| ApTag::mention(a.uri.clone(), format!("@{}", a.acct())))
            .collect(),
    }
}
