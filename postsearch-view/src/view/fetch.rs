use crate::view::state::{FetchUpdate, ViewEvent};
use postsearch_client::client::{ApiClient, FetchError};
use postsearch_common::model::{post::Post, user::User};
use std::fmt::{self, Display, Formatter};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Where the view loads its posts and users from.
pub trait DataSource: Clone + Send + Sync + 'static {
    fn fetch_posts(&self) -> impl Future<Output = Result<Vec<Post>, FetchError>> + Send;

    fn fetch_users(&self) -> impl Future<Output = Result<Vec<User>, FetchError>> + Send;
}

impl DataSource for ApiClient {
    async fn fetch_posts(&self) -> Result<Vec<Post>, FetchError> {
        ApiClient::fetch_posts(self).await
    }

    async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        ApiClient::fetch_users(self).await
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Resource {
    Posts,
    Users,
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Posts => "posts",
            Resource::Users => "users",
        })
    }
}

/// Loads one collection and reports progress to the view.
///
/// Nothing is sent once `active` is cancelled, and an in-flight request is
/// abandoned as soon as it is.
pub async fn load<T, F>(
    resource: Resource,
    fetch: F,
    wrap: fn(FetchUpdate<T>) -> ViewEvent,
    events: UnboundedSender<ViewEvent>,
    active: CancellationToken,
) where
    F: Future<Output = Result<Vec<T>, FetchError>>,
{
    if !send_if_active(&events, &active, resource, wrap(FetchUpdate::Started)) {
        return;
    }

    let result = tokio::select! {
        () = active.cancelled() => {
            debug!(%resource, "View closed while fetching");
            return;
        }
        result = fetch => result,
    };

    let update = match result {
        Ok(items) => {
            debug!(%resource, count = items.len(), "Loaded collection");
            FetchUpdate::Loaded(items)
        }
        Err(error) => {
            error!(%resource, %error, "Fetching collection failed");
            FetchUpdate::Failed
        }
    };

    send_if_active(&events, &active, resource, wrap(update));
}

fn send_if_active(
    events: &UnboundedSender<ViewEvent>,
    active: &CancellationToken,
    resource: Resource,
    event: ViewEvent,
) -> bool {
    if active.is_cancelled() || events.send(event).is_err() {
        debug!(%resource, "View is no longer active, dropping update");
        return false;
    }
    true
}
