use crate::api::{CatalogClient, CatalogItem, ResultPage};
use crate::debounce::{SEARCH_DEBOUNCE, SearchDebouncer, SettledSearch};
use crate::error::CatalogError;
use crate::facets::{self, FacetKind, FacetRef};
use crate::query::{Effect, FetchIntent, PAGE_BUTTONS, QueryController, ResultState, Transition};
use crate::storage::SelectionStore;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where the user currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Game { id: u64 },
}

impl Route {
    pub fn href(&self) -> String {
        match self {
            Route::Catalog => "/".to_string(),
            Route::Game { id } => format!("/game?id={}", id),
        }
    }

    pub fn parse(href: &str) -> Option<Self> {
        if href == "/" {
            return Some(Route::Catalog);
        }
        let query = href.strip_prefix("/game?")?;
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("id="))
            .and_then(|id| id.parse().ok())
            .map(|id| Route::Game { id })
    }
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// A resolved catalog request.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<ResultPage, CatalogError>,
}

/// Main application state.
pub struct App {
    client: CatalogClient,
    store: SelectionStore,
    pub controller: QueryController,
    debouncer: SearchDebouncer,
    settled_rx: mpsc::UnboundedReceiver<SettledSearch>,
    fetch_tx: mpsc::UnboundedSender<FetchOutcome>,
    fetch_rx: mpsc::UnboundedReceiver<FetchOutcome>,

    pub should_quit: bool,
    pub route: Route,
    pub show_help: bool,
    pub input_mode: InputMode,

    // Filter panel
    pub filter_open: bool,
    pub filter_entries: Vec<(FacetKind, FacetRef)>,
    pub filter_cursor: usize,

    // Grid
    pub grid_selected: usize,
    pub grid_columns: usize,

    /// Game handed to the detail view.
    pub selection: Option<CatalogItem>,
    pub detail_scroll: u16,

    pub status_msg: String,
    pub tick: u64,
}

impl App {
    pub fn new(client: CatalogClient, store: SelectionStore) -> Self {
        let (debouncer, settled_rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        Self {
            client,
            store,
            controller: QueryController::new(),
            debouncer,
            settled_rx,
            fetch_tx,
            fetch_rx,

            should_quit: false,
            route: Route::Catalog,
            show_help: false,
            input_mode: InputMode::Normal,

            filter_open: false,
            filter_entries: facets::entries(),
            filter_cursor: 0,

            grid_selected: 0,
            grid_columns: 1,

            selection: None,
            detail_scroll: 0,

            status_msg: "Loading games...".to_string(),
            tick: 0,
        }
    }

    /// Mount: fetch the first page.
    pub fn init(&mut self) {
        self.dispatch(Transition::PageChanged(1));
    }

    pub fn dispatch(&mut self, transition: Transition) {
        match self.controller.apply(transition) {
            Effect::None => {}
            Effect::Debounce(text) => self.debouncer.schedule(text),
            Effect::Fetch(intent) => {
                self.debouncer.cancel();
                self.spawn_fetch(intent);
            }
        }
    }

    fn spawn_fetch(&mut self, intent: FetchIntent) {
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        debug!(seq = intent.seq, trigger = ?intent.trigger, "spawning fetch");
        self.status_msg = "Loading games...".to_string();
        tokio::spawn(async move {
            let result = client.get_games(&intent.query).await;
            let _ = tx.send(FetchOutcome { seq: intent.seq, result });
        });
    }

    /// Drain settled searches and resolved fetches. Called once per tick.
    pub fn check_pending(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        while let Ok(settled) = self.settled_rx.try_recv() {
            if let Some(text) = self.debouncer.take_if_current(settled) {
                self.dispatch(Transition::SearchSettled(text));
            }
        }

        while let Ok(outcome) = self.fetch_rx.try_recv() {
            self.controller.resolve(outcome.seq, outcome.result);
            self.grid_selected = 0;
            self.status_msg = match self.controller.results() {
                ResultState::Ready(page) => format!("{} games, page {}", page.total, self.controller.state().page()),
                ResultState::Empty => "No results".to_string(),
                ResultState::Failed { retryable: true, .. } => "Fetch failed, press r to retry".to_string(),
                ResultState::Failed { .. } => "Fetch failed".to_string(),
                ResultState::Idle => String::new(),
            };
        }
    }

    // ── Search ──

    pub fn search_push(&mut self, c: char) {
        let mut text = self.controller.state().search_text().to_string();
        text.push(c);
        self.dispatch(Transition::SearchChanged(text));
    }

    /// A keystroke is waiting out the debounce window.
    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn search_pop(&mut self) {
        let mut text = self.controller.state().search_text().to_string();
        if text.pop().is_some() {
            self.dispatch(Transition::SearchChanged(text));
        }
    }

    // ── Pagination ──

    /// Press the `index`-th page button (0-based). Ignored while the bar is hidden.
    pub fn press_page_button(&mut self, index: usize) {
        if index >= PAGE_BUTTONS || !self.controller.show_pagination() || self.controller.loading() {
            return;
        }
        let target = self.controller.page_window()[index].target;
        self.dispatch(Transition::PageChanged(target));
    }

    pub fn retry(&mut self) {
        self.dispatch(Transition::RetryRequested);
    }

    // ── Filter panel ──

    pub fn toggle_filter_panel(&mut self) {
        self.filter_open = !self.filter_open;
    }

    pub fn filter_next(&mut self) {
        if self.filter_cursor + 1 < self.filter_entries.len() {
            self.filter_cursor += 1;
        }
    }

    pub fn filter_prev(&mut self) {
        self.filter_cursor = self.filter_cursor.saturating_sub(1);
    }

    pub fn toggle_filter_under_cursor(&mut self) {
        if let Some((kind, facet)) = self.filter_entries.get(self.filter_cursor).copied() {
            let selected = self.controller.toggle_facet(kind, facet);
            debug!(kind = kind.label(), facet = facet.name, selected, "facet toggled");
        }
    }

    pub fn submit_filters(&mut self) {
        info!(
            tags = %self.controller.state().tags_csv(),
            genres = %self.controller.state().genres_csv(),
            "filters submitted"
        );
        self.filter_open = false;
        self.dispatch(Transition::FiltersSubmitted);
    }

    // ── Grid navigation ──

    pub fn grid_move(&mut self, dx: isize, dy: isize) {
        let len = self.controller.items().len();
        if len == 0 {
            return;
        }
        let cols = self.grid_columns.max(1) as isize;
        let next = self.grid_selected as isize + dx + dy * cols;
        if next >= 0 && (next as usize) < len {
            self.grid_selected = next as usize;
        }
    }

    // ── Selection / detail ──

    /// Snapshot the selected card into durable storage and the selection
    /// context, then route to its detail view.
    pub fn open_selected(&mut self) {
        let Some(item) = self.controller.items().get(self.grid_selected).cloned() else {
            return;
        };
        if let Err(e) = self.store.save(&item) {
            warn!(error = %e, "could not persist selected game");
            self.status_msg = format!("Could not save selection: {}", e);
        }
        self.route = Route::Game { id: item.id };
        self.selection = Some(item);
        self.detail_scroll = 0;
    }

    /// Enter a route. A game route that does not match the selection context
    /// is resolved from durable storage once, here.
    pub fn navigate(&mut self, route: Route) {
        if let Route::Game { id } = route {
            if self.selection.as_ref().is_none_or(|item| item.id != id) {
                self.selection = match self.store.load() {
                    Ok(stored) => stored.filter(|item| item.id == id),
                    Err(e) => {
                        warn!(error = %e, "could not read stored selection");
                        None
                    }
                };
            }
            self.detail_scroll = 0;
        }
        self.route = route;
    }

    /// Item for the detail view, if the selection context matches the route.
    pub fn detail_item(&self) -> Option<&CatalogItem> {
        let Route::Game { id } = self.route else {
            return None;
        };
        self.selection.as_ref().filter(|item| item.id == id)
    }

    pub fn close_detail(&mut self) {
        self.route = Route::Catalog;
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }
}
