//! Domain model for a single catalog entry. `Book` mirrors one object in the
//! on-disk JSON array field for field, so the same type is used in memory, in
//! the persistence layer and by the TUI.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Year recorded for a book when the entered year cannot be parsed.
pub const DEFAULT_YEAR: i32 = 2000;

/// One book in the personal library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Title shown in listings. Also the lookup key for removal, compared
    /// case-insensitively.
    pub title: String,
    /// Free-form author name, matched by substring in author searches.
    pub author: String,
    /// Publication year. Kept signed so historical dates round-trip.
    pub year: i32,
    /// Genre as typed, e.g. `Sci-Fi`. Not drawn from a fixed list.
    pub genre: String,
    /// Whether the owner has finished reading the book.
    pub read: bool,
}

impl Book {
    /// Build a book after checking the required text fields. Surrounding
    /// whitespace is trimmed before the emptiness check and before storage.
    pub fn new(
        title: &str,
        author: &str,
        year: i32,
        genre: &str,
        read: bool,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("title", title)?,
            author: required("author", author)?,
            year,
            genre: required("genre", genre)?,
            read,
        })
    }

    /// `Read` or `Unread`, as used in every listing.
    pub fn read_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.read_label()
        )
    }
}

/// Result of interpreting the raw year text typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedYear {
    pub year: i32,
    /// Set when the input was not an integer and [`DEFAULT_YEAR`] was used.
    pub warning: Option<ValidationError>,
}

/// Parse a year, falling back to [`DEFAULT_YEAR`] with a reported
/// [`ValidationError::InvalidYear`] when the text is not an integer.
pub fn parse_year(input: &str) -> ParsedYear {
    match input.trim().parse::<i32>() {
        Ok(year) => ParsedYear {
            year,
            warning: None,
        },
        Err(_) => ParsedYear {
            year: DEFAULT_YEAR,
            warning: Some(ValidationError::InvalidYear {
                input: input.to_string(),
            }),
        },
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}
