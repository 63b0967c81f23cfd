use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::catalog::SearchField;
use crate::error::ValidationError;
use crate::models::{parse_year, Book, DEFAULT_YEAR};

/// Internal representation of the "add book" form fields.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    /// Raw text; only interpreted on submit.
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl BookField {
    pub(crate) const ORDER: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
    ];

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Genre => "Genre",
            BookField::Read => "Read",
        }
    }
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: DEFAULT_YEAR.to_string(),
            genre: String::new(),
            read: true,
            active: BookField::Title,
            error: None,
        }
    }
}

impl BookForm {
    /// Move focus forward, wrapping from the last field to the first.
    pub(crate) fn next_field(&mut self) {
        let next = (self.active.position() + 1) % BookField::ORDER.len();
        self.active = BookField::ORDER[next];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = BookField::ORDER.len();
        let previous = (self.active.position() + len - 1) % len;
        self.active = BookField::ORDER[previous];
    }

    /// Apply a typed character to the active field. The read flag answers to
    /// `y`, `n` and space; every other field takes printable text.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Year => self.year.push(ch),
            BookField::Genre => self.genre.push(ch),
            BookField::Read => match ch {
                'y' | 'Y' => self.read = true,
                'n' | 'N' => self.read = false,
                ' ' => self.read = !self.read,
                _ => return false,
            },
        }
        true
    }

    pub(crate) fn toggle_read(&mut self) {
        self.read = !self.read;
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Genre => {
                self.genre.pop();
            }
            BookField::Read => {}
        }
    }

    /// Validate the inputs. A bad year is not fatal: the book is built with
    /// the default year and the year problem is returned next to it.
    pub(crate) fn parse_inputs(&self) -> Result<(Book, Option<ValidationError>), ValidationError> {
        let parsed = parse_year(&self.year);
        let book = Book::new(
            &self.title,
            &self.author,
            parsed.year,
            &self.genre,
            self.read,
        )?;
        Ok((book, parsed.warning))
    }

    /// Live hint shown under the year field while the text is not a number.
    pub(crate) fn year_hint(&self) -> Option<&'static str> {
        parse_year(&self.year)
            .warning
            .map(|_| "Please enter a valid year (number).")
    }

    fn value(&self, field: BookField) -> String {
        match field {
            BookField::Title => self.title.clone(),
            BookField::Author => self.author.clone(),
            BookField::Year => self.year.clone(),
            BookField::Genre => self.genre.clone(),
            BookField::Read => if self.read { "yes" } else { "no" }.to_string(),
        }
    }

    /// Number of characters in a field, used for cursor placement.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.value(field).chars().count()
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value
        };
        let value_style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if display == "<required>" {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, value_style),
        ])
    }
}

/// Single-line prompt for the title to remove.
#[derive(Default, Clone)]
pub(crate) struct RemovePrompt {
    pub(crate) title: String,
    pub(crate) error: Option<String>,
}

impl RemovePrompt {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.title.push(ch);
        true
    }
}

/// Search input plus the field it targets.
#[derive(Clone)]
pub(crate) struct SearchForm {
    pub(crate) field: SearchField,
    pub(crate) query: String,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            field: SearchField::Title,
            query: String::new(),
        }
    }
}

impl SearchForm {
    pub(crate) fn toggle_field(&mut self) {
        self.field = match self.field {
            SearchField::Title => SearchField::Author,
            SearchField::Author => SearchField::Title,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.query.push(ch);
        true
    }

    /// Prompt prefix, e.g. `Title: `.
    pub(crate) fn prompt(&self) -> &'static str {
        match self.field {
            SearchField::Title => "Title: ",
            SearchField::Author => "Author: ",
        }
    }
}
