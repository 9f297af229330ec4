//! URIs minted for local actors, objects and activities.

use murmur_common::AppResult;
use url::Url;

/// Builds `ActivityPub` URIs under this instance's base URL.
#[derive(Clone, Debug)]
pub struct UriBuilder {
    base: Url,
}

impl UriBuilder {
    /// Create a builder for the given instance URL.
    pub fn new(base: &str) -> AppResult<Self> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    /// Base URL of this instance.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    fn join(&self, path: &str) -> AppResult<Url> {
        Ok(self.base.join(path)?)
    }

    pub fn user_uri(&self, username: &str) -> AppResult<Url> {
        self.join(&format!("users/{username}"))
    }

    pub fn inbox_uri(&self, username: &str) -> AppResult<Url> {
        self.join(&format!("users/{username}/inbox"))
    }

    pub fn followers_uri(&self, username: &str) -> AppResult<Url> {
        self.join(&format!("users/{username}/followers"))
    }

    pub fn status_uri(&self, username: &str, status_id: &str) -> AppResult<Url> {
        self.join(&format!("users/{username}/statuses/{status_id}"))
    }

    pub fn fave_uri(&self, username: &str, fave_id: &str) -> AppResult<Url> {
        self.join(&format!("users/{username}/liked/{fave_id}"))
    }

    pub fn follow_uri(&self, username: &str, follow_id: &str) -> AppResult<Url> {
        self.join(&format!("users/{username}/follow/{follow_id}"))
    }

    /// URI for activities that have no entity of their own (Undo, Accept, Delete).
    pub fn activity_uri(&self, username: &str, activity_id: &str) -> AppResult<Url> {
        self.join(&format!("users/{username}/activities/{activity_id}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_uris_share_the_actor_prefix() {
        let uris = UriBuilder::new("https://local.example").unwrap();

        assert_eq!(
            uris.user_uri("alice").unwrap().as_str(),
            "https://local.example/users/alice"
        );
        assert_eq!(
            uris.fave_uri("alice", "01fave").unwrap().as_str(),
            "https://local.example/users/alice/liked/01fave"
        );
        assert_eq!(
            uris.inbox_uri("alice").unwrap().as_str(),
            "https://local.example/users/alice/inbox"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let uris = UriBuilder::new("https://local.example/social").unwrap();

        assert_eq!(
            uris.status_uri("alice", "01s").unwrap().as_str(),
            "https://local.example/social/users/alice/statuses/01s"
        );
    }
}
