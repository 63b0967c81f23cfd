use crate::catalog::{Catalog, SearchField};
use crate::models::Book;

/// Which rows a listing shows. Listings are recomputed from the catalog after
/// every change so they never show removed books.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ListSource {
    All,
    Search { field: SearchField, term: String },
}

/// Scrollable numbered listing of books, used by both "Display all books"
/// and search results.
pub(crate) struct BookListScreen {
    pub(crate) source: ListSource,
    pub(crate) books: Vec<Book>,
    pub(crate) scroll: usize,
}

impl BookListScreen {
    pub(crate) fn new(source: ListSource, catalog: &Catalog) -> Self {
        let mut screen = Self {
            source,
            books: Vec::new(),
            scroll: 0,
        };
        screen.refresh(catalog);
        screen
    }

    pub(crate) fn refresh(&mut self, catalog: &Catalog) {
        self.books = match &self.source {
            ListSource::All => catalog.list_all().to_vec(),
            ListSource::Search { field, term } => {
                catalog.search(*field, term).into_iter().cloned().collect()
            }
        };
        self.ensure_in_bounds();
    }

    pub(crate) fn heading(&self) -> String {
        match &self.source {
            ListSource::All => "All Books".to_string(),
            ListSource::Search { field, term } => {
                format!("Matching Books ({} contains '{}')", field.label(), term)
            }
        }
    }

    pub(crate) fn scroll_by(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let max = self.books.len() as isize - 1;
        let next = (self.scroll as isize + offset).clamp(0, max);
        self.scroll = next as usize;
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        self.scroll = self.books.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.books.is_empty() {
            self.scroll = 0;
        } else if self.scroll >= self.books.len() {
            self.scroll = self.books.len() - 1;
        }
    }
}
