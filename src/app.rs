use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::catalog::{Catalog, FilteredView};
use crate::error::LoadError;
use crate::favorites::FavoritesStore;
use crate::loader::{CatalogLoader, Fetcher};
use crate::render::{self, Container};
use crate::search;

/// User interaction, handled one at a time to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The search input now holds this text.
    Input(String),
    /// A favorite toggle was clicked.
    ToggleFavorite(String),
}

impl Event {
    /// `/fav <id>` clicks a toggle; any other line is the new search text.
    pub fn parse_line(line: &str) -> Self {
        match line.trim_start().strip_prefix("/fav ") {
            Some(id) => Event::ToggleFavorite(id.trim().to_string()),
            None => Event::Input(line.to_string()),
        }
    }
}

/// Session state. The search filter owns `filtered` and `query`, the favorites
/// store owns the favorite set, and rendering owns `container`.
pub struct App {
    catalog: Catalog,
    filtered: FilteredView,
    favorites: FavoritesStore,
    container: Container,
    query: String,
    search_input: bool,
}

impl App {
    /// Takes a loaded catalog and paints the initial cards.
    pub fn new(catalog: Catalog, favorites: FavoritesStore, search_input: bool) -> Result<Self> {
        let filtered = FilteredView::all(&catalog);
        let mut app = Self {
            catalog,
            filtered,
            favorites,
            container: Container::new(),
            query: String::new(),
            search_input,
        };
        app.render()?;
        Ok(app)
    }

    fn render(&mut self) -> Result<()> {
        let favorites = &self.favorites;
        let listings = self.filtered.listings(&self.catalog).cloned().collect();
        self.container.mount(listings, |id| favorites.contains(id))?;
        Ok(())
    }

    pub async fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Input(text) => {
                if !self.search_input {
                    return Ok(());
                }
                self.filtered = search::filter(&self.catalog, &text);
                self.query = text;
                debug!(query = %self.query, matches = self.filtered.len(), "filtered");
                self.render()?;
            }
            Event::ToggleFavorite(id) => {
                if !self.container.is_bound(&id) {
                    debug!(id = %id, "no rendered toggle for id");
                    return Ok(());
                }
                self.favorites.toggle(&id).await?;
                self.container.flip_toggle(&id)?;
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn filtered(&self) -> &FilteredView { &self.filtered }
    pub fn favorites(&self) -> &FavoritesStore { &self.favorites }
    pub fn container(&self) -> &Container { &self.container }
    pub fn query(&self) -> &str { &self.query }

    pub fn page(&self) -> Result<String> {
        Ok(render::page(&self.container, &self.query, self.search_input)?)
    }
}

/// Load the catalog and build the session. The inner error is a load failure meant
/// for the error panel; nothing is rendered in that case.
pub async fn startup<F: Fetcher>(
    loader: &CatalogLoader<F>,
    favorites: FavoritesStore,
    search_input: bool,
) -> Result<Result<App, LoadError>> {
    match loader.load().await {
        Ok(catalog) => Ok(Ok(App::new(catalog, favorites, search_input)?)),
        Err(err) => Ok(Err(err)),
    }
}

/// Container holding the error panel for a failed startup.
pub fn failure_container(err: &LoadError) -> Result<Container> {
    let mut c = Container::new();
    c.mount_error(&err.to_string())?;
    Ok(c)
}

/// Feed input lines to the app in order, calling `on_change` after each event.
pub async fn run_events<R, W>(app: &mut App, input: R, mut on_change: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: FnMut(&App) -> Result<()>,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        app.handle(Event::parse_line(&line)).await?;
        on_change(app)?;
    }
    Ok(())
}
