//! In-memory catalog of books. The catalog is a plain ordered list: insertion
//! order is the display order, and nothing enforces unique titles. Removal
//! and search therefore act on every matching entry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Book;

/// Field a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    /// Lowercase name used in listing headings.
    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
        }
    }

    fn value<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
        }
    }
}

/// What happened when removing by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Number of entries removed, always at least one.
    Removed(usize),
    NotFound,
}

impl RemoveOutcome {
    pub fn count(&self) -> usize {
        match self {
            RemoveOutcome::Removed(count) => *count,
            RemoveOutcome::NotFound => 0,
        }
    }
}

/// Aggregate numbers for the statistics view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub total: usize,
    pub read: usize,
    /// Share of read books as a percentage, unrounded. Zero for an empty
    /// catalog.
    pub percent_read: f64,
}

impl Stats {
    /// Percentage with one decimal, e.g. `33.3`. Halfway cases round to the
    /// even digit, so 1 of 16 reads `6.2`.
    pub fn percent_label(&self) -> String {
        let tenths = (self.percent_read * 10.0).round_ties_even();
        format!("{:.1}", tenths / 10.0)
    }
}

/// Ordered collection of books. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap books that are already in display order.
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Append a book at the end. Duplicates are allowed.
    pub fn add(&mut self, book: Book) {
        debug!(title = %book.title, "adding book");
        self.books.push(book);
    }

    /// Remove every book whose title equals `title`, ignoring case and
    /// surrounding whitespace on either side. Files written by hand or by
    /// older versions may hold untrimmed titles.
    pub fn remove(&mut self, title: &str) -> RemoveOutcome {
        let needle = title.trim().to_lowercase();
        let before = self.books.len();
        self.books.retain(|book| book.title.trim().to_lowercase() != needle);
        let removed = before - self.books.len();
        debug!(title, removed, "remove by title");

        if removed == 0 {
            RemoveOutcome::NotFound
        } else {
            RemoveOutcome::Removed(removed)
        }
    }

    /// Books whose `field` contains `term`, ignoring case, in catalog order.
    pub fn search(&self, field: SearchField, term: &str) -> Vec<&Book> {
        let needle = term.to_lowercase();
        self.books
            .iter()
            .filter(|book| field.value(book).to_lowercase().contains(&needle))
            .collect()
    }

    /// Every book in insertion order.
    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    /// Totals for the statistics screen.
    pub fn stats(&self) -> Stats {
        let total = self.books.len();
        let read = self.books.iter().filter(|book| book.read).count();
        let percent_read = if total == 0 {
            0.0
        } else {
            read as f64 / total as f64 * 100.0
        };

        Stats {
            total,
            read,
            percent_read,
        }
    }

    /// Number of books, duplicates included.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
