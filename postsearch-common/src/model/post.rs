use crate::model::{Id, user::UserMarker};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    #[serde(rename = "userId")]
    pub user_id: Id<UserMarker>,
    pub title: String,
}

/// A post joined with the display name of its author, if one resolved.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct PostWithAuthor<'a> {
    pub post: &'a Post,
    pub author: Option<&'a str>,
}
