//! Activity builders for outbound federation.

use murmur_db::entities::{Account, Follow, Status, StatusFave};
use url::Url;

use crate::activities::{
    AcceptActivity, Activity, AnnounceActivity, CreateActivity, DeleteActivity, FollowActivity,
    LikeActivity, UndoActivity, UndoObject,
};
use crate::objects::ApNote;

/// Wrap a note in a Create activity.
#[must_use]
pub fn create_note(activity_id: Url, note: ApNote) -> Activity {
    CreateActivity::new(activity_id, note.attributed_to.clone(), note).into()
}

/// Delete a status, addressed like the original.
#[must_use]
pub fn delete_status(
    activity_id: Url,
    author: &Account,
    status: &Status,
    to: Vec<Url>,
    cc: Vec<Url>,
) -> Activity {
    let mut delete = DeleteActivity::new(activity_id, author.uri.clone(), status.uri.clone());
    delete.to = to;
    delete.cc = cc;
    delete.into()
}

fn like_activity(fave: &StatusFave, actor: &Account, status: &Status) -> LikeActivity {
    LikeActivity::new(fave.uri.clone(), actor.uri.clone(), status.uri.clone())
}

/// Like for a fave.
#[must_use]
pub fn like(fave: &StatusFave, actor: &Account, status: &Status) -> Activity {
    like_activity(fave, actor, status).into()
}

/// Undo of a previously sent Like.
#[must_use]
pub fn undo_like(
    activity_id: Url,
    fave: &StatusFave,
    actor: &Account,
    status: &Status,
    target: &Account,
) -> Activity {
    let mut undo = UndoActivity::new(
        activity_id,
        actor.uri.clone(),
        UndoObject::Like(like_activity(fave, actor, status)),
    );
    undo.to = vec![target.uri.clone()];
    undo.into()
}

fn follow_activity(follow: &Follow, actor: &Account, target: &Account) -> FollowActivity {
    FollowActivity::new(follow.uri.clone(), actor.uri.clone(), target.uri.clone())
}

/// Follow request.
#[must_use]
pub fn follow(follow: &Follow, actor: &Account, target: &Account) -> Activity {
    follow_activity(follow, actor, target).into()
}

/// Undo of a previously sent Follow.
#[must_use]
pub fn undo_follow(
    activity_id: Url,
    follow: &Follow,
    actor: &Account,
    target: &Account,
) -> Activity {
    let mut undo = UndoActivity::new(
        activity_id,
        actor.uri.clone(),
        UndoObject::Follow(follow_activity(follow, actor, target)),
    );
    undo.to = vec![target.uri.clone()];
    undo.into()
}

/// Accept of a follow, sent by the followed account.
#[must_use]
pub fn accept_follow(
    activity_id: Url,
    follow: &Follow,
    follower: &Account,
    target: &Account,
) -> Activity {
    AcceptActivity::new(
        activity_id,
        target.uri.clone(),
        follow_activity(follow, follower, target),
    )
    .into()
}

fn announce_activity(
    boost: &Status,
    actor: &Account,
    boosted: &Status,
    to: Vec<Url>,
    cc: Vec<Url>,
) -> AnnounceActivity {
    let mut announce = AnnounceActivity::new(
        boost.uri.clone(),
        actor.uri.clone(),
        boosted.uri.clone(),
        boost.created_at,
    );
    announce.to = to;
    announce.cc = cc;
    announce
}

/// Announce of a boost.
#[must_use]
pub fn announce(
    boost: &Status,
    actor: &Account,
    boosted: &Status,
    to: Vec<Url>,
    cc: Vec<Url>,
) -> Activity {
    announce_activity(boost, actor, boosted, to, cc).into()
}
