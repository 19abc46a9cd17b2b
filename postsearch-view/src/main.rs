use postsearch_client::client::{ApiClient, DEFAULT_API_BASE_URL, FetchError};
use postsearch_common::{author_index::AuthorKey, render::DEFAULT_IMAGE_BASE_URL};
use serde::Deserialize;
use std::{
    io::{self, BufRead},
    thread,
    time::Duration,
};
use thiserror::Error;
use tokio::sync::mpsc::{self, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use view::{View, ViewConfig, debounce::DEFAULT_DEBOUNCE_MS};

mod view;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error building http client: {0}")]
    HttpClient(FetchError),
}

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error("Error writing to stdout: {0}")]
    Render(io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_image_base_url")]
    image_base_url: String,
    #[serde(default = "default_search_debounce_ms")]
    search_debounce_ms: u64,
    #[serde(default)]
    author_key: AuthorKey,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_owned()
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Env {
    fn view_config(&self) -> ViewConfig {
        ViewConfig {
            debounce: Duration::from_millis(self.search_debounce_ms),
            author_key: self.author_key,
            image_base_url: self.image_base_url.clone(),
        }
    }
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postsearch_view=debug,postsearch_client=debug,postsearch_common=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

/// Forwards stdin lines as queries. Stdin is read on a plain thread so a
/// blocked read never holds up shutdown.
fn spawn_query_reader(queries: Sender<String>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let query = match line {
                Ok(query) => query,
                Err(error) => {
                    error!(%error, "Reading query failed");
                    break;
                }
            };
            if queries.blocking_send(query).is_err() {
                break;
            }
        }
        debug!("Query input closed");
    });
}

fn cancel_on_ctrl_c(active: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(error) = result {
                    error!(%error, "Listening for ctrl-c failed");
                }
                active.cancel();
            }
            () = active.cancelled() => {}
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), MainError> {
    install_tracing();
    let env = get_env()?;

    let client = ApiClient::new(
        env.api_base_url.as_str(),
        Duration::from_secs(env.request_timeout_secs),
    )
    .map_err(InitError::HttpClient)?;

    let active = CancellationToken::new();
    cancel_on_ctrl_c(active.clone());

    let (query_tx, query_rx) = mpsc::channel(16);
    spawn_query_reader(query_tx);

    let view = View::new(env.view_config(), client, io::stdout(), active);
    let state = view.run(query_rx).await.map_err(MainError::Render)?;
    debug!(
        posts = state.posts().items.len(),
        users = state.users().items.len(),
        "View closed"
    );

    Ok(())
}
