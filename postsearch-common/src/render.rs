//! Plain-text rendering of the post list, one row per post.

use crate::{
    author_index::{AuthorIndex, AuthorKey},
    model::post::{Post, PostWithAuthor},
};
use std::fmt::{self, Display, Formatter};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://picsum.photos/200/300";

pub struct PostRow<'a> {
    pub entry: PostWithAuthor<'a>,
    pub image_base_url: &'a str,
}

impl PostRow<'_> {
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("{}?post={}", self.image_base_url, self.entry.post.id)
    }

    #[must_use]
    pub fn author(&self) -> &str {
        self.entry.author.unwrap_or(UNKNOWN_AUTHOR)
    }
}

impl Display for PostRow<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {}",
            self.image_url(),
            self.entry.post.title,
            self.author()
        )
    }
}

/// The full result list. Renders every post it is given.
pub struct PostList<'a> {
    pub posts: &'a [Post],
    pub authors: &'a AuthorIndex,
    pub key: AuthorKey,
    pub image_base_url: &'a str,
}

impl<'a> PostList<'a> {
    pub fn rows(&self) -> impl Iterator<Item = PostRow<'a>> {
        let authors = self.authors;
        let key = self.key;
        let image_base_url = self.image_base_url;

        self.posts.iter().map(move |post| PostRow {
            entry: authors.join(post, key),
            image_base_url,
        })
    }
}

impl Display for PostList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
