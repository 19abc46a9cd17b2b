//! Mapping from user ids to display names, used to join posts with authors.

use crate::model::{
    Id,
    post::{Post, PostWithAuthor},
    user::{User, UserMarker},
};
use serde::Deserialize;
use std::collections::HashMap;

/// Which identifier of a post is used to look its author up.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorKey {
    /// The post's own id. Matches the behaviour of the original board, which
    /// almost never resolves an author this way.
    #[default]
    PostId,
    /// The post's `userId`.
    UserId,
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct AuthorIndex(HashMap<Id<UserMarker>, String>);

impl AuthorIndex {
    /// Builds the index from scratch. Later duplicates of an id win.
    #[must_use]
    pub fn build(users: &[User]) -> Self {
        Self(
            users
                .iter()
                .map(|user| (user.id.clone(), user.name.clone()))
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &Id<UserMarker>) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn resolve(&self, post: &Post, key: AuthorKey) -> Option<&str> {
        match key {
            AuthorKey::PostId => self.get(&post.id.reinterpret()),
            AuthorKey::UserId => self.get(&post.user_id),
        }
    }

    #[must_use]
    pub fn join<'a>(&'a self, post: &'a Post, key: AuthorKey) -> PostWithAuthor<'a> {
        PostWithAuthor {
            post,
            author: self.resolve(post, key),
        }
    }
}
