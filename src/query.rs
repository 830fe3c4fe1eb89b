use crate::api::{CatalogItem, GameQuery, ResultPage};
use crate::error::CatalogError;
use crate::facets::{FacetKind, FacetRef};
use tracing::{debug, warn};

/// Items requested per page. A page this full means more pages may exist.
pub const PAGE_SIZE: u32 = 40;

/// Number of page buttons in the pagination bar.
pub const PAGE_BUTTONS: usize = 5;

/// Current page, search text and selected facets.
///
/// Mutating it never fetches; only `QueryController` transitions do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    search_text: String,
    tags: Vec<FacetRef>,
    genres: Vec<FacetRef>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            search_text: String::new(),
            tags: Vec::new(),
            genres: Vec::new(),
        }
    }
}

impl QueryState {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn tags(&self) -> &[FacetRef] {
        &self.tags
    }

    pub fn genres(&self) -> &[FacetRef] {
        &self.genres
    }

    /// Pages start at 1; anything lower is clamped.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Add the facet if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, kind: FacetKind, facet: FacetRef) -> bool {
        let set = match kind {
            FacetKind::Tag => &mut self.tags,
            FacetKind::Genre => &mut self.genres,
        };
        if let Some(pos) = set.iter().position(|f| *f == facet) {
            set.remove(pos);
            false
        } else {
            set.push(facet);
            true
        }
    }

    pub fn is_selected(&self, kind: FacetKind, facet: &FacetRef) -> bool {
        match kind {
            FacetKind::Tag => self.tags.contains(facet),
            FacetKind::Genre => self.genres.contains(facet),
        }
    }

    pub fn tags_csv(&self) -> String {
        join_names(&self.tags)
    }

    pub fn genres_csv(&self) -> String {
        join_names(&self.genres)
    }

    fn to_query(&self) -> GameQuery {
        GameQuery {
            page: self.page,
            page_size: PAGE_SIZE,
            search: self.search_text.clone(),
            genres: self.genres_csv(),
            tags: self.tags_csv(),
        }
    }
}

fn join_names(facets: &[FacetRef]) -> String {
    facets.iter().map(|f| f.name).collect::<Vec<_>>().join(",")
}

/// One button of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub label: u32,
    /// Page requested when the button is pressed.
    pub target: u32,
}

/// Five consecutive page buttons: 1..=5 below page 3, otherwise centred on
/// `page`.
pub fn page_window(page: u32) -> [PageButton; PAGE_BUTTONS] {
    let first = if above_three_pages(page) { page - 2 } else { 1 };
    std::array::from_fn(|i| {
        let n = first + i as u32;
        PageButton { label: n, target: n }
    })
}

pub fn above_three_pages(page: u32) -> bool {
    page >= 3
}

/// What caused a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Page,
    Search,
    Filters,
    Retry,
}

/// User-driven state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A page button was pressed, or the view was mounted (page 1).
    PageChanged(u32),
    /// A keystroke changed the search text.
    SearchChanged(String),
    /// The debounce window for `text` elapsed with no newer keystroke.
    SearchSettled(String),
    FiltersSubmitted,
    RetryRequested,
}

/// A catalog request the caller must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchIntent {
    pub seq: u64,
    pub trigger: Trigger,
    pub query: GameQuery,
}

/// What the caller has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// (Re)start the search debounce for this text.
    Debounce(String),
    /// Cancel any pending debounced search and issue this request now.
    Fetch(FetchIntent),
}

/// Outcome of the last resolved fetch, as shown by the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultState {
    Idle,
    Ready(ResultPage),
    Empty,
    Failed { message: String, retryable: bool },
}

/// State machine from user transitions to catalog requests.
///
/// Each transition yields at most one fetch. Responses are applied in the
/// order they resolve, so an old response that arrives late overwrites a
/// newer one.
#[derive(Debug, Default)]
pub struct QueryController {
    state: QueryState,
    loading: bool,
    results: Option<ResultState>,
    next_seq: u64,
    highest_applied: u64,
    last_intent: Option<FetchIntent>,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Most recently issued request, retries included.
    pub fn last_fetch(&self) -> Option<&FetchIntent> {
        self.last_intent.as_ref()
    }

    pub fn results(&self) -> &ResultState {
        self.results.as_ref().unwrap_or(&ResultState::Idle)
    }

    pub fn items(&self) -> &[CatalogItem] {
        match self.results() {
            ResultState::Ready(page) => &page.items,
            _ => &[],
        }
    }

    pub fn total(&self) -> u64 {
        match self.results() {
            ResultState::Ready(page) => page.total,
            _ => 0,
        }
    }

    pub fn above_three_pages(&self) -> bool {
        above_three_pages(self.state.page)
    }

    pub fn page_window(&self) -> [PageButton; PAGE_BUTTONS] {
        page_window(self.state.page)
    }

    /// Page buttons are only offered after a full page.
    pub fn show_pagination(&self) -> bool {
        self.items().len() >= PAGE_SIZE as usize
    }

    /// Checkbox toggle. Takes effect on the next fetch.
    pub fn toggle_facet(&mut self, kind: FacetKind, facet: FacetRef) -> bool {
        self.state.toggle(kind, facet)
    }

    pub fn apply(&mut self, transition: Transition) -> Effect {
        match transition {
            Transition::PageChanged(page) => {
                self.state.set_page(page);
                self.state.search_text.clear();
                Effect::Fetch(self.issue(Trigger::Page))
            }
            Transition::SearchChanged(text) => {
                self.state.set_search_text(text.clone());
                Effect::Debounce(text)
            }
            Transition::SearchSettled(text) => {
                // The debouncer already drops timers older than its last
                // schedule. The controller only trusts its own state: the
                // text must still be what the user has typed.
                if text != self.state.search_text {
                    debug!(settled = %text, current = %self.state.search_text, "dropping superseded search");
                    return Effect::None;
                }
                Effect::Fetch(self.issue(Trigger::Search))
            }
            Transition::FiltersSubmitted => {
                self.state.set_page(1);
                Effect::Fetch(self.issue(Trigger::Filters))
            }
            Transition::RetryRequested => {
                let retryable = matches!(self.results(), ResultState::Failed { retryable: true, .. });
                match self.last_intent.clone() {
                    Some(last) if retryable => {
                        self.loading = true;
                        self.next_seq += 1;
                        let intent = FetchIntent {
                            seq: self.next_seq,
                            trigger: Trigger::Retry,
                            query: last.query,
                        };
                        self.last_intent = Some(intent.clone());
                        Effect::Fetch(intent)
                    }
                    _ => Effect::None,
                }
            }
        }
    }

    fn issue(&mut self, trigger: Trigger) -> FetchIntent {
        self.loading = true;
        self.next_seq += 1;
        let intent = FetchIntent {
            seq: self.next_seq,
            trigger,
            query: self.state.to_query(),
        };
        debug!(seq = intent.seq, ?trigger, page = intent.query.page, "fetch issued");
        self.last_intent = Some(intent.clone());
        intent
    }

    /// Apply a resolved fetch. Always clears the loading flag.
    pub fn resolve(&mut self, seq: u64, outcome: Result<ResultPage, CatalogError>) {
        self.loading = false;
        if seq < self.highest_applied {
            warn!(seq, newer = self.highest_applied, "late response replaces newer results");
        }
        self.highest_applied = self.highest_applied.max(seq);

        let next = match outcome {
            Ok(page) if page.items.is_empty() => ResultState::Empty,
            Ok(page) => {
                debug!(seq, items = page.items.len(), total = page.total, "results applied");
                ResultState::Ready(page)
            }
            Err(CatalogError::EmptyResult) => ResultState::Empty,
            Err(e) => {
                warn!(seq, error = %e, "catalog fetch failed");
                ResultState::Failed {
                    message: e.user_message(),
                    retryable: e.is_retryable(),
                }
            }
        };
        self.results = Some(next);
    }
}
