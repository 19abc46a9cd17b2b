//! Local search over the fetched posts.
//!
//! Matching is a case-sensitive, unanchored substring test against the post
//! title and the resolved author name. An empty query matches everything.

use crate::{
    author_index::{AuthorIndex, AuthorKey},
    model::post::Post,
};

#[must_use]
pub fn matches(post: &Post, authors: &AuthorIndex, key: AuthorKey, query: &str) -> bool {
    post.title.contains(query)
        || authors
            .resolve(post, key)
            .unwrap_or_default()
            .contains(query)
}

/// Returns the posts matching `query`, in their original order.
#[must_use]
pub fn filter_posts(
    posts: &[Post],
    authors: &AuthorIndex,
    key: AuthorKey,
    query: &str,
) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| matches(post, authors, key, query))
        .cloned()
        .collect()
}
