//! Ratatui front-end. The shell only translates key presses into catalog
//! operations and reports their outcome; all book logic lives in
//! [`crate::catalog`] and [`crate::storage`].

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
