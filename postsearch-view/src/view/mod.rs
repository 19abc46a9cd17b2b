pub mod debounce;
pub mod fetch;
pub mod state;

use crate::view::{
    debounce::Debouncer,
    fetch::{DataSource, Resource, load},
    state::{Effect, ViewEvent, ViewState},
};
use postsearch_common::author_index::AuthorKey;
use std::{io::Write, time::Duration};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ViewConfig {
    pub debounce: Duration,
    pub author_key: AuthorKey,
    pub image_base_url: String,
}

/// Event loop owning the state of a single view lifetime.
///
/// Runs until `active` is cancelled, or until the query input has closed and
/// the view has settled: no fetch running and no filter run outstanding. All
/// state changes happen on the loop itself, fetches and timers only send
/// events.
pub struct View<S, W> {
    config: ViewConfig,
    source: S,
    out: W,
    active: CancellationToken,
    state: ViewState,
    debouncer: Debouncer,
    fetches: JoinSet<()>,
    events_tx: UnboundedSender<ViewEvent>,
    events_rx: UnboundedReceiver<ViewEvent>,
}

impl<S: DataSource, W: Write> View<S, W> {
    pub fn new(config: ViewConfig, source: S, out: W, active: CancellationToken) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            state: ViewState::new(config.author_key),
            debouncer: Debouncer::new(config.debounce),
            fetches: JoinSet::new(),
            config,
            source,
            out,
            active,
            events_tx,
            events_rx,
        }
    }

    pub async fn run(mut self, mut queries: mpsc::Receiver<String>) -> std::io::Result<ViewState> {
        debug!(config = ?self.config, "Activating view");
        self.spawn_fetches();
        let effect = self.state.activate();
        self.handle(effect)?;

        let mut input_open = true;
        loop {
            if !input_open && self.is_settled() {
                break;
            }

            let event = tokio::select! {
                () = self.active.cancelled() => break,
                query = queries.recv(), if input_open => match query {
                    Some(query) => ViewEvent::QueryChanged(query),
                    None => {
                        debug!("Query input closed, settling view");
                        input_open = false;
                        continue;
                    }
                },
                Some(event) = self.events_rx.recv() => event,
                Some(joined) = self.fetches.join_next() => {
                    if let Err(error) = joined {
                        error!(%error, "Fetch task failed");
                    }
                    continue;
                }
            };

            let effect = self.state.apply(event);
            self.handle(effect)?;
        }

        debug!(
            pending_filter = self.debouncer.is_pending(),
            "Deactivating view"
        );
        self.active.cancel();
        self.debouncer.cancel();

        Ok(self.state)
    }

    fn is_settled(&self) -> bool {
        self.fetches.is_empty() && self.events_rx.is_empty() && !self.state.filter_pending()
    }

    fn spawn_fetches(&mut self) {
        let source = self.source.clone();
        self.fetches.spawn(load(
            Resource::Posts,
            async move { source.fetch_posts().await },
            ViewEvent::Posts,
            self.events_tx.clone(),
            self.active.clone(),
        ));

        let source = self.source.clone();
        self.fetches.spawn(load(
            Resource::Users,
            async move { source.fetch_users().await },
            ViewEvent::Users,
            self.events_tx.clone(),
            self.active.clone(),
        ));
    }

    fn handle(&mut self, effect: Effect) -> std::io::Result<()> {
        match effect {
            Effect::Nothing => {}
            Effect::ScheduleFilter(generation) => {
                let events = self.events_tx.clone();
                self.debouncer.schedule(move || {
                    // The loop may already be gone, which is fine.
                    let _ = events.send(ViewEvent::FilterDue(generation));
                });
            }
            Effect::Render => {
                debug!(
                    query = self.state.query(),
                    results = self.state.results().len(),
                    authors = self.state.authors().len(),
                    "Rendering"
                );
                write!(
                    self.out,
                    "{}",
                    self.state.frame(&self.config.image_base_url)
                )?;
                writeln!(self.out)?;
                self.out.flush()?;
            }
        }
        Ok(())
    }
}
