use postsearch_common::{
    author_index::{AuthorIndex, AuthorKey},
    model::{post::Post, user::User},
    render::PostList,
    search::filter_posts,
};
use std::fmt::{self, Display, Formatter};

pub const QUERY_PLACEHOLDER: &str = "Search post";

/// A fetched collection together with its loading flag.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub loading: bool,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
        }
    }
}

impl<T> Collection<T> {
    fn apply(&mut self, update: FetchUpdate<T>) -> Change {
        match update {
            FetchUpdate::Started => {
                if self.loading {
                    Change::None
                } else {
                    self.loading = true;
                    Change::Status
                }
            }
            FetchUpdate::Loaded(items) => {
                self.items = items;
                self.loading = false;
                Change::Items
            }
            FetchUpdate::Failed => {
                if self.loading {
                    self.loading = false;
                    Change::Status
                } else {
                    Change::None
                }
            }
        }
    }
}

/// How a fetch update changed a [`Collection`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Change {
    None,
    /// Only the loading flag moved.
    Status,
    Items,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum FetchUpdate<T> {
    Started,
    Loaded(Vec<T>),
    Failed,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ViewEvent {
    Posts(FetchUpdate<Post>),
    Users(FetchUpdate<User>),
    QueryChanged(String),
    /// A debounce timer fired for the given filter generation.
    FilterDue(u64),
}

/// What the runtime has to do after a state transition.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Effect {
    Nothing,
    ScheduleFilter(u64),
    Render,
}

/// All state of one view lifetime. Only [`ViewState::apply`] mutates it.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    author_key: AuthorKey,
    posts: Collection<Post>,
    users: Collection<User>,
    authors: AuthorIndex,
    query: String,
    results: Vec<Post>,
    generation: u64,
    filtered: u64,
}

impl ViewState {
    #[must_use]
    pub fn new(author_key: AuthorKey) -> Self {
        Self {
            author_key,
            ..Self::default()
        }
    }

    /// The first filter run of a fresh view, over whatever has loaded by then.
    pub fn activate(&mut self) -> Effect {
        self.invalidate()
    }

    pub fn apply(&mut self, event: ViewEvent) -> Effect {
        match event {
            ViewEvent::Posts(update) => {
                let change = self.posts.apply(update);
                self.on_fetch(change)
            }
            ViewEvent::Users(update) => {
                let change = self.users.apply(update);
                if change == Change::Items {
                    self.authors = AuthorIndex::build(&self.users.items);
                }
                self.on_fetch(change)
            }
            ViewEvent::QueryChanged(query) => {
                if query == self.query {
                    return Effect::Nothing;
                }
                self.query = query;
                self.invalidate()
            }
            ViewEvent::FilterDue(generation) if generation == self.generation => {
                self.filtered = generation;
                self.results = filter_posts(
                    &self.posts.items,
                    &self.authors,
                    self.author_key,
                    &self.query,
                );
                Effect::Render
            }
            ViewEvent::FilterDue(_) => Effect::Nothing,
        }
    }

    fn invalidate(&mut self) -> Effect {
        self.generation += 1;
        Effect::ScheduleFilter(self.generation)
    }

    /// New items need a new filter run. A bare loading flag change only
    /// needs a redraw, and only once something is on screen and no filter
    /// run is about to redraw anyway.
    fn on_fetch(&mut self, change: Change) -> Effect {
        match change {
            Change::Items => self.invalidate(),
            Change::Status if self.filtered > 0 && !self.filter_pending() => Effect::Render,
            Change::Status | Change::None => Effect::Nothing,
        }
    }

    /// Whether a change is still waiting for its debounced filter run.
    #[must_use]
    pub fn filter_pending(&self) -> bool {
        self.filtered != self.generation
    }

    #[must_use]
    pub fn posts(&self) -> &Collection<Post> {
        &self.posts
    }

    #[must_use]
    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    #[must_use]
    pub fn authors(&self) -> &AuthorIndex {
        &self.authors
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn results(&self) -> &[Post] {
        &self.results
    }

    #[must_use]
    pub fn frame<'a>(&'a self, image_base_url: &'a str) -> Frame<'a> {
        Frame {
            state: self,
            image_base_url,
        }
    }
}

/// One rendered screen: a status header followed by the result rows.
pub struct Frame<'a> {
    state: &'a ViewState,
    image_base_url: &'a str,
}

impl Display for Frame<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.state;

        write!(
            f,
            "{QUERY_PLACEHOLDER}: {:?} ({} of {} posts",
            state.query,
            state.results.len(),
            state.posts.items.len()
        )?;
        match (state.posts.loading, state.users.loading) {
            (true, true) => f.write_str(", loading posts and users")?,
            (true, false) => f.write_str(", loading posts")?,
            (false, true) => f.write_str(", loading users")?,
            (false, false) => {}
        }
        writeln!(f, ")")?;

        let list = PostList {
            posts: &state.results,
            authors: &state.authors,
            key: state.author_key,
            image_base_url: self.image_base_url,
        };
        write!(f, "{list}")
    }
}

#[cfg(test)]
mod tests {
    use crate::view::state::{Effect, FetchUpdate, ViewEvent, ViewState};
    use postsearch_common::{
        author_index::AuthorKey,
        model::{Id, post::Post, user::User},
        render::DEFAULT_IMAGE_BASE_URL,
    };

    fn hello_post() -> Post {
        Post {
            id: Id::new("1"),
            user_id: Id::new("10"),
            title: "Hello World".to_owned(),
        }
    }

    fn ada() -> User {
        User {
            id: Id::new("10"),
            name: "Ada".to_owned(),
        }
    }

    fn due(state: &mut ViewState, effect: Effect) -> Effect {
        let Effect::ScheduleFilter(generation) = effect else {
            panic!("expected a scheduled filter, got {effect:?}");
        };
        state.apply(ViewEvent::FilterDue(generation))
    }

    #[test]
    fn loading_flag_brackets_a_fetch() {
        let mut state = ViewState::default();
        assert!(!state.posts().loading);

        assert_eq!(
            state.apply(ViewEvent::Posts(FetchUpdate::Started)),
            Effect::Nothing
        );
        assert!(state.posts().loading);

        let effect = state.apply(ViewEvent::Posts(FetchUpdate::Loaded(vec![hello_post()])));
        assert!(matches!(effect, Effect::ScheduleFilter(_)));
        assert!(!state.posts().loading);
        assert_eq!(state.posts().items, vec![hello_post()]);
    }

    #[test]
    fn failed_fetch_keeps_previous_items() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::Posts(FetchUpdate::Loaded(vec![hello_post()])));

        state.apply(ViewEvent::Posts(FetchUpdate::Started));
        let effect = state.apply(ViewEvent::Posts(FetchUpdate::Failed));

        assert_eq!(effect, Effect::Nothing);
        assert!(!state.posts().loading);
        assert_eq!(state.posts().items, vec![hello_post()]);
    }

    #[test]
    fn failure_after_first_frame_redraws_the_status() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::Posts(FetchUpdate::Started));
        let effect = state.activate();
        assert_eq!(due(&mut state, effect), Effect::Render);
        assert!(
            state
                .frame(DEFAULT_IMAGE_BASE_URL)
                .to_string()
                .contains("loading posts")
        );

        let effect = state.apply(ViewEvent::Posts(FetchUpdate::Failed));

        assert_eq!(effect, Effect::Render);
        assert!(!state.filter_pending());
        assert_eq!(
            state.frame(DEFAULT_IMAGE_BASE_URL).to_string(),
            "Search post: \"\" (0 of 0 posts)\n"
        );
        assert_eq!(
            state.apply(ViewEvent::Posts(FetchUpdate::Failed)),
            Effect::Nothing
        );
    }

    #[test]
    fn status_change_waits_for_a_pending_filter() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::Posts(FetchUpdate::Started));
        let effect = state.activate();
        due(&mut state, effect);

        state.apply(ViewEvent::QueryChanged("Hello".to_owned()));
        assert!(state.filter_pending());

        assert_eq!(
            state.apply(ViewEvent::Posts(FetchUpdate::Failed)),
            Effect::Nothing
        );
    }

    #[test]
    fn users_rebuild_the_author_index() {
        let mut state = ViewState::default();

        let effect = state.apply(ViewEvent::Users(FetchUpdate::Loaded(vec![ada()])));

        assert!(matches!(effect, Effect::ScheduleFilter(_)));
        assert_eq!(state.authors().get(&ada().id), Some("Ada"));
        assert_eq!(
            state.apply(ViewEvent::Users(FetchUpdate::Failed)),
            Effect::Nothing
        );
        assert_eq!(state.authors().len(), 1);
    }

    #[test]
    fn only_the_latest_generation_filters() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::Posts(FetchUpdate::Loaded(vec![hello_post()])));

        let first = state.apply(ViewEvent::QueryChanged("zzz".to_owned()));
        let second = state.apply(ViewEvent::QueryChanged("Hello".to_owned()));
        let (Effect::ScheduleFilter(stale), Effect::ScheduleFilter(_)) = (first, second) else {
            panic!("query changes must schedule a filter");
        };

        assert_eq!(state.apply(ViewEvent::FilterDue(stale)), Effect::Nothing);
        assert!(state.results().is_empty());
        assert_eq!(due(&mut state, second), Effect::Render);
        assert_eq!(state.results(), &[hello_post()]);
    }

    #[test]
    fn unchanged_query_schedules_nothing() {
        let mut state = ViewState::default();

        assert_eq!(
            state.apply(ViewEvent::QueryChanged(String::new())),
            Effect::Nothing
        );
    }

    #[test]
    fn hello_world_frame_with_post_id_key() {
        let mut state = ViewState::new(AuthorKey::PostId);
        state.apply(ViewEvent::Posts(FetchUpdate::Loaded(vec![hello_post()])));
        state.apply(ViewEvent::Users(FetchUpdate::Loaded(vec![ada()])));
        let effect = state.apply(ViewEvent::QueryChanged("Hello".to_owned()));
        due(&mut state, effect);

        assert_eq!(
            state.frame(DEFAULT_IMAGE_BASE_URL).to_string(),
            "Search post: \"Hello\" (1 of 1 posts)\n\
             [https://picsum.photos/200/300?post=1] Hello World - Unknown Author\n"
        );

        let effect = state.apply(ViewEvent::QueryChanged("zzz".to_owned()));
        due(&mut state, effect);
        assert!(state.results().is_empty());
    }

    #[test]
    fn user_id_key_resolves_the_author() {
        let mut state = ViewState::new(AuthorKey::UserId);
        state.apply(ViewEvent::Posts(FetchUpdate::Loaded(vec![hello_post()])));
        let effect = state.apply(ViewEvent::Users(FetchUpdate::Loaded(vec![ada()])));
        due(&mut state, effect);

        let effect = state.apply(ViewEvent::QueryChanged("Ada".to_owned()));
        due(&mut state, effect);

        assert_eq!(state.results(), &[hello_post()]);
        assert!(
            state
                .frame(DEFAULT_IMAGE_BASE_URL)
                .to_string()
                .ends_with("Hello World - Ada\n")
        );
    }

    #[test]
    fn frame_reports_loading() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::Posts(FetchUpdate::Started));
        state.apply(ViewEvent::Users(FetchUpdate::Started));

        assert_eq!(
            state.frame(DEFAULT_IMAGE_BASE_URL).to_string(),
            "Search post: \"\" (0 of 0 posts, loading posts and users)\n"
        );
    }
}
