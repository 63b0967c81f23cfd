use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::catalog::{Catalog, RemoveOutcome};
use crate::error::ValidationError;
use crate::models::{Book, DEFAULT_YEAR};
use crate::storage::{LibraryFile, LoadOutcome};

use super::forms::{BookField, BookForm, RemovePrompt, SearchForm};
use super::helpers::{centered_rect, numbered_book_lines, surface_error};
use super::screens::{BookListScreen, ListSource};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the menu column, wide enough for the running book count.
const MENU_WIDTH: u16 = 30;

/// Entries of the side menu, in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum MenuAction {
    AddBook,
    RemoveBook,
    SearchBooks,
    DisplayAll,
    Statistics,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 6] = [
        MenuAction::AddBook,
        MenuAction::RemoveBook,
        MenuAction::SearchBooks,
        MenuAction::DisplayAll,
        MenuAction::Statistics,
        MenuAction::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuAction::AddBook => "Add a book",
            MenuAction::RemoveBook => "Remove a book",
            MenuAction::SearchBooks => "Search for a book",
            MenuAction::DisplayAll => "Display all books",
            MenuAction::Statistics => "Display statistics",
            MenuAction::Exit => "Exit",
        }
    }
}

/// What the content pane shows.
enum Screen {
    Welcome,
    Books(BookListScreen),
    Statistics,
}

/// Modal input state layered over the current screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    RemovingBook(RemovePrompt),
    Searching(SearchForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the catalog, where it is saved, and what the
/// user is looking at.
pub struct App {
    storage: LibraryFile,
    catalog: Catalog,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    /// Set after "Exit" failed to save, so choosing it again quits anyway.
    exit_armed: bool,
}

impl App {
    /// Build the app around an already loaded catalog. The start-up status
    /// line reports how loading went.
    pub fn new(storage: LibraryFile, loaded: LoadOutcome) -> Self {
        let status = match &loaded.warning {
            None => StatusMessage {
                text: "Library loaded successfully!".to_string(),
                kind: StatusKind::Info,
            },
            Some(err) if err.is_missing() => StatusMessage {
                text: "No existing library found. Starting with empty library.".to_string(),
                kind: StatusKind::Info,
            },
            Some(err) => StatusMessage {
                text: format!("Error loading library file. Starting with empty library. ({err})"),
                kind: StatusKind::Error,
            },
        };

        Self {
            storage,
            catalog: loaded.catalog,
            selected: 0,
            screen: Screen::Welcome,
            mode: Mode::Normal,
            status: Some(status),
            exit_armed: false,
        }
    }

    /// The catalog as currently held in memory, saved or not.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Text currently shown in the status line, if any.
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Process one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::RemovingBook(prompt) => self.handle_remove_book(code, prompt)?,
            Mode::Searching(form) => self.handle_search(code, form)?,
        };

        Ok(exit)
    }

    /// Global "Save Library" shortcut.
    pub fn handle_ctrl_s(&mut self) -> Result<()> {
        match self.persist() {
            Ok(()) => self.set_status("Library saved successfully!", StatusKind::Info),
            Err(err) => self.set_status(
                format!("Failed to save library: {}", surface_error(&err)),
                StatusKind::Error,
            ),
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(MenuAction::ALL.len() - 1);
            }
            KeyCode::Enter => {
                let action = MenuAction::ALL[self.selected];
                return self.activate(action, exit);
            }
            KeyCode::Char(ch @ '1'..='6') => {
                let index = ch as usize - '1' as usize;
                self.selected = index;
                return self.activate(MenuAction::ALL[index], exit);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                return self.activate(MenuAction::Exit, exit);
            }
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Welcome;
            }
            KeyCode::PageUp => self.scroll_listing(-5),
            KeyCode::PageDown => self.scroll_listing(5),
            KeyCode::Home => {
                if let Screen::Books(list) = &mut self.screen {
                    list.scroll_to_top();
                }
            }
            KeyCode::End => {
                if let Screen::Books(list) = &mut self.screen {
                    list.scroll_to_bottom();
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn activate(&mut self, action: MenuAction, exit: &mut bool) -> Result<Mode> {
        match action {
            MenuAction::AddBook => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            MenuAction::RemoveBook => {
                if self.catalog.is_empty() {
                    self.set_status("Your library is empty.", StatusKind::Info);
                } else {
                    self.clear_status();
                    return Ok(Mode::RemovingBook(RemovePrompt::default()));
                }
            }
            MenuAction::SearchBooks => {
                if self.catalog.is_empty() {
                    self.set_status("Your library is empty.", StatusKind::Info);
                } else {
                    self.clear_status();
                    return Ok(Mode::Searching(SearchForm::default()));
                }
            }
            MenuAction::DisplayAll => {
                self.screen = Screen::Books(BookListScreen::new(ListSource::All, &self.catalog));
                self.report_if_empty();
            }
            MenuAction::Statistics => {
                self.screen = Screen::Statistics;
                self.report_if_empty();
            }
            MenuAction::Exit => self.save_and_exit(exit),
        }
        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left | KeyCode::Right if form.active == BookField::Read => form.toggle_read(),
            KeyCode::Backspace => {
                form.backspace();
                form.error = None;
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok((book, warning)) => {
                    self.add_book(book, warning);
                    keep_open = false;
                }
                Err(err) => {
                    warn!(error = %err, "rejected new book");
                    let message = "Please fill in all fields.";
                    form.error = Some(message.to_string());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_remove_book(&mut self, code: KeyCode, mut prompt: RemovePrompt) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Remove cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Backspace => {
                prompt.title.pop();
                prompt.error = None;
                Ok(Mode::RemovingBook(prompt))
            }
            KeyCode::Enter => {
                let title = prompt.title.trim().to_string();
                if title.is_empty() {
                    let message = "Please enter a title.";
                    prompt.error = Some(message.to_string());
                    self.set_status(message, StatusKind::Error);
                    return Ok(Mode::RemovingBook(prompt));
                }
                self.remove_book(&title);
                Ok(Mode::Normal)
            }
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
                Ok(Mode::RemovingBook(prompt))
            }
            _ => Ok(Mode::RemovingBook(prompt)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut form: SearchForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => {
                form.query.pop();
            }
            KeyCode::Enter => {
                let term = form.query.trim().to_string();
                if term.is_empty() {
                    self.set_status("Please enter a search term.", StatusKind::Error);
                    return Ok(Mode::Searching(form));
                }

                let list = BookListScreen::new(
                    ListSource::Search {
                        field: form.field,
                        term: term.clone(),
                    },
                    &self.catalog,
                );
                let found = list.books.len();
                self.screen = Screen::Books(list);
                if found == 0 {
                    self.set_status(
                        format!("No books found matching '{term}'."),
                        StatusKind::Info,
                    );
                } else {
                    self.set_status(
                        format!("Found {found} matching book(s)."),
                        StatusKind::Info,
                    );
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Ok(Mode::Searching(form))
    }

    fn add_book(&mut self, book: Book, warning: Option<ValidationError>) {
        let title = book.title.clone();
        self.catalog.add(book);
        self.refresh_listing();
        info!(title = %title, total = self.catalog.len(), "book added");

        match self.persist() {
            Ok(()) => match warning {
                None => self.set_status(
                    format!("Book '{title}' added successfully!"),
                    StatusKind::Info,
                ),
                Some(_) => self.set_status(
                    format!(
                        "Please enter a valid year (number). Book '{title}' added with year {DEFAULT_YEAR}."
                    ),
                    StatusKind::Warning,
                ),
            },
            Err(err) => {
                warn!(error = %surface_error(&err), "book kept in memory only");
                let message = match warning {
                    None => "Book added to library but failed to save to file.".to_string(),
                    Some(_) => format!(
                        "Book added to library but failed to save to file. Year set to {DEFAULT_YEAR} (invalid year)."
                    ),
                };
                self.set_status(message, StatusKind::Warning);
            }
        }
    }

    fn remove_book(&mut self, title: &str) {
        match self.catalog.remove(title) {
            RemoveOutcome::NotFound => {
                self.set_status(
                    format!("No book with title '{title}' found in your library."),
                    StatusKind::Info,
                );
            }
            RemoveOutcome::Removed(count) => {
                self.refresh_listing();
                info!(title, count, "books removed");
                match self.persist() {
                    Ok(()) if count == 1 => {
                        self.set_status("Book removed successfully!", StatusKind::Info)
                    }
                    Ok(()) => self.set_status(
                        format!("Removed {count} books titled '{title}'."),
                        StatusKind::Info,
                    ),
                    Err(err) => {
                        warn!(error = %surface_error(&err), "removal kept in memory only");
                        self.set_status(
                            "Book removed from library but failed to save to file.",
                            StatusKind::Warning,
                        );
                    }
                }
            }
        }
    }

    fn save_and_exit(&mut self, exit: &mut bool) {
        if self.exit_armed {
            warn!("exiting without a successful save");
            *exit = true;
            return;
        }

        match self.persist() {
            Ok(()) => {
                info!("library saved on exit");
                *exit = true;
            }
            Err(err) => {
                self.exit_armed = true;
                self.set_status(
                    format!(
                        "Failed to save library: {}. Choose Exit again to quit without saving.",
                        surface_error(&err)
                    ),
                    StatusKind::Error,
                );
            }
        }
    }

    fn persist(&mut self) -> Result<()> {
        self.storage
            .save(&self.catalog)
            .with_context(|| format!("failed to save {}", self.storage.path().display()))?;
        self.exit_armed = false;
        Ok(())
    }

    fn refresh_listing(&mut self) {
        if let Screen::Books(list) = &mut self.screen {
            list.refresh(&self.catalog);
        }
    }

    fn scroll_listing(&mut self, offset: isize) {
        if let Screen::Books(list) = &mut self.screen {
            list.scroll_by(offset);
        }
    }

    fn report_if_empty(&mut self) {
        if self.catalog.is_empty() {
            self.set_status("Your library is empty.", StatusKind::Info);
        } else {
            self.clear_status();
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(content_area);

        self.draw_menu(frame, columns[0]);
        match &self.screen {
            Screen::Welcome => self.draw_welcome(frame, columns[1]),
            Screen::Books(list) => self.draw_book_list(frame, columns[1], list),
            Screen::Statistics => self.draw_statistics(frame, columns[1]),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::RemovingBook(prompt) => self.draw_remove_prompt(frame, area, prompt),
            Mode::Searching(form) => self.draw_search_bar(frame, columns[1], form),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let items: Vec<ListItem> = MenuAction::ALL
            .iter()
            .enumerate()
            .map(|(index, action)| ListItem::new(format!("{}. {}", index + 1, action.label())))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);

        let count = Paragraph::new(format!("Current library: {} books", self.catalog.len()))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(count, chunks[1]);
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Personal Library Manager",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Choose an option from the menu."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect, list: &BookListScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                list.heading(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  •  {} shown", list.books.len())),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Your Library"));
        frame.render_widget(header, chunks[0]);

        if list.books.is_empty() {
            let text = match &list.source {
                ListSource::All => "Your library is empty.".to_string(),
                ListSource::Search { term, .. } => format!("No books found matching '{term}'."),
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let scroll = u16::try_from(list.scroll).unwrap_or(u16::MAX);
        let body = Paragraph::new(numbered_book_lines(&list.books))
            .scroll((scroll, 0))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(body, chunks[1]);
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect) {
        let stats = self.catalog.stats();
        let lines = if stats.total == 0 {
            vec![Line::from("Your library is empty.")]
        } else {
            vec![
                Line::from(format!("Total books: {}", stats.total)),
                Line::from(format!("Books read: {}", stats.read)),
                Line::from(format!("Percentage read: {}%", stats.percent_label())),
            ]
        };
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Library Statistics"),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::AddingBook(_) => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Add Book   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::RemovingBook(_) => &[("[Enter]", " Remove Book   "), ("[Esc]", " Cancel")],
            Mode::Searching(_) => &[
                ("[Tab]", " Title/Author   "),
                ("[Enter]", " Search   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Select   "),
                ("[PgUp/PgDn]", " Scroll   "),
                ("[Ctrl+S]", " Save Library   "),
                ("[q]", " Exit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, description)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(description.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add a Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ORDER
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else if let Some(hint) = form.year_hint() {
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add • Tab to switch • y/n for read • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if form.active != BookField::Read {
            let row = BookField::ORDER
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or(0) as u16;
            let prefix = form.active.label().len() as u16 + 2;
            frame.set_cursor_position((
                inner.x + prefix + form.value_len(form.active) as u16,
                inner.y + row,
            ));
        }
    }

    fn draw_remove_prompt(&self, frame: &mut Frame, area: Rect, prompt: &RemovePrompt) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Remove a Book")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(format!("Title: {}", prompt.title)),
            Line::from(""),
        ];
        if let Some(error) = &prompt.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Every book with this exact title (any case) is removed.",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + "Title: ".len() as u16 + prompt.title.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, form: &SearchForm) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let title = format!("Search by {}", form.field.label());
        let block = Block::default().borders(Borders::ALL).title(title);
        let paragraph = Paragraph::new(Span::raw(format!("{}{}", form.prompt(), form.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x =
            inner.x + form.prompt().len() as u16 + form.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        let storage = LibraryFile::new(dir.path().join("library.json"));
        let loaded = storage.load_or_empty();
        App::new(storage, loaded)
    }

    fn app_with_books(dir: &TempDir, books: Vec<Book>) -> App {
        let storage = LibraryFile::new(dir.path().join("library.json"));
        storage.save(&Catalog::from_books(books)).unwrap();
        app_in(dir)
    }

    fn book(title: &str, author: &str, read: bool) -> Book {
        Book::new(title, author, 1990, "Fiction", read).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn saved(dir: &TempDir) -> Catalog {
        LibraryFile::new(dir.path().join("library.json"))
            .load()
            .unwrap()
    }

    #[test]
    fn startup_status_reflects_load_result() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir);
        assert_eq!(
            app.status_text(),
            Some("No existing library found. Starting with empty library.")
        );

        let app = app_with_books(&dir, vec![book("Dune", "Frank Herbert", true)]);
        assert_eq!(app.status_text(), Some("Library loaded successfully!"));

        std::fs::write(dir.path().join("library.json"), "{not json").unwrap();
        let app = app_in(&dir);
        assert!(app.catalog().is_empty());
        assert!(app
            .status_text()
            .unwrap()
            .starts_with("Error loading library file."));
    }

    #[test]
    fn adding_a_book_appends_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::AddingBook(_)));
        type_text(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Frank Herbert");
        press(&mut app, KeyCode::Tab);
        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "1965");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Sci-Fi");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "n");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        let expected = Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false).unwrap();
        assert_eq!(app.catalog().list_all(), &[expected.clone()]);
        assert_eq!(saved(&dir).list_all(), &[expected]);
        assert_eq!(app.status_text(), Some("Book 'Dune' added successfully!"));
    }

    #[test]
    fn incomplete_form_stays_open() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Only a title");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::AddingBook(_)));
        assert!(app.catalog().is_empty());
        assert_eq!(app.status_text(), Some("Please fill in all fields."));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn invalid_year_adds_with_default() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Emma");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Jane Austen");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Novel");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.catalog().len(), 1);
        assert_eq!(app.catalog().list_all()[0].year, DEFAULT_YEAR);
        assert!(app
            .status_text()
            .unwrap()
            .starts_with("Please enter a valid year (number)."));
    }

    #[test]
    fn removing_requires_a_non_empty_library() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Char('2'));
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.status_text(), Some("Your library is empty."));
    }

    #[test]
    fn removing_drops_every_case_insensitive_match() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_books(
            &dir,
            vec![
                book("Dune", "Frank Herbert", true),
                book("Emma", "Jane Austen", false),
                book("DUNE", "Someone Else", false),
            ],
        );

        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status_text(), Some("Please enter a title."));

        type_text(&mut app, "dune");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.catalog().len(), 1);
        assert_eq!(saved(&dir).list_all()[0].title, "Emma");
        assert_eq!(app.status_text(), Some("Removed 2 books titled 'dune'."));
    }

    #[test]
    fn removing_unknown_title_is_informational() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_books(&dir, vec![book("Emma", "Jane Austen", false)]);

        press(&mut app, KeyCode::Char('2'));
        type_text(&mut app, "Em");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.catalog().len(), 1);
        assert_eq!(
            app.status_text(),
            Some("No book with title 'Em' found in your library.")
        );
    }

    #[test]
    fn search_by_author_lists_matches() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_books(
            &dir,
            vec![
                book("Emma", "Jane Austen", false),
                book("Dune", "Frank Herbert", true),
                book("Persuasion", "Jane Austen", true),
            ],
        );

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "AUSTEN");
        press(&mut app, KeyCode::Enter);

        match &app.screen {
            Screen::Books(list) => {
                let titles: Vec<&str> = list.books.iter().map(|b| b.title.as_str()).collect();
                assert_eq!(titles, vec!["Emma", "Persuasion"]);
            }
            _ => panic!("expected search results"),
        }
        let screen = render(&app);
        assert!(screen.contains("1. Emma by Jane Austen (1990) - Fiction - Unread"));
        assert!(screen.contains("2. Persuasion by Jane Austen (1990) - Fiction - Read"));
    }

    #[test]
    fn search_without_matches_reports_it() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_books(&dir, vec![book("Emma", "Jane Austen", false)]);

        press(&mut app, KeyCode::Char('3'));
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.status_text(), Some("No books found matching 'zzz'."));
    }

    #[test]
    fn statistics_screen_shows_percentage() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_books(
            &dir,
            vec![
                book("A", "x", true),
                book("B", "x", false),
                book("C", "x", false),
                book("D", "x", false),
            ],
        );

        press(&mut app, KeyCode::Char('5'));
        let screen = render(&app);
        assert!(screen.contains("Total books: 4"));
        assert!(screen.contains("Percentage read: 25.0%"));
        assert!(screen.contains("Current library: 4 books"));
    }

    #[test]
    fn exit_saves_before_quitting() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(saved(&dir).is_empty());
    }

    #[test]
    fn failed_save_keeps_state_and_asks_again_before_exit() {
        let dir = TempDir::new().unwrap();
        // The storage path is a directory, so every save fails.
        let storage = LibraryFile::new(dir.path());
        let loaded = storage.load_or_empty();
        let mut app = App::new(storage, loaded);

        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Emma");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Jane Austen");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Novel");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.catalog().len(), 1);
        assert_eq!(
            app.status_text(),
            Some("Book added to library but failed to save to file.")
        );

        assert!(!press(&mut app, KeyCode::Char('6')));
        assert!(app
            .status_text()
            .unwrap()
            .starts_with("Failed to save library"));
        assert!(press(&mut app, KeyCode::Char('6')));
    }

    #[test]
    fn failed_save_still_mentions_the_year_fallback() {
        let dir = TempDir::new().unwrap();
        let storage = LibraryFile::new(dir.path());
        let loaded = storage.load_or_empty();
        let mut app = App::new(storage, loaded);

        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Emma");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Jane Austen");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Novel");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.catalog().list_all()[0].year, DEFAULT_YEAR);
        assert_eq!(
            app.status_text(),
            Some("Book added to library but failed to save to file. Year set to 2000 (invalid year).")
        );
    }

    #[test]
    fn ctrl_s_saves_library() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.catalog.add(book("Emma", "Jane Austen", false));

        app.handle_ctrl_s().unwrap();
        assert_eq!(app.status_text(), Some("Library saved successfully!"));
        assert_eq!(saved(&dir).len(), 1);
    }

    #[test]
    fn display_all_follows_later_changes() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_books(&dir, vec![book("Emma", "Jane Austen", false)]);

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Frank Herbert");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Sci-Fi");
        press(&mut app, KeyCode::Enter);

        match &app.screen {
            Screen::Books(list) => assert_eq!(list.books.len(), 2),
            _ => panic!("expected the full listing"),
        }
        let screen = render(&app);
        assert!(screen.contains("2. Dune by Frank Herbert (2000) - Sci-Fi - Read"));
    }
}
