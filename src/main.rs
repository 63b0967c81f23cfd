//! Binary entry point: resolve configuration, start logging, load the
//! library, and drive the Ratatui event loop until the user exits.
use clap::Parser;
use personal_library_manager::{init_logging, run_app, App, Cli, Config, LibraryFile};

fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;

    // The app still works without a log file.
    if let Err(err) = init_logging(&config) {
        eprintln!("logging disabled: {err:#}");
    }
    tracing::info!(library = %config.library_path.display(), "starting");

    let storage = LibraryFile::new(&config.library_path);
    let loaded = storage.load_or_empty();

    let mut app = App::new(storage, loaded);
    run_app(&mut app)
}
