use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use folio::catalog::Catalog;
use folio::event_source::TerminalEventSource;
use folio::pdf::DocumentLoader;
use folio::{App, export, panic_handler, run_app_with_event_source, settings};

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Browse PDF documents in the terminal")]
struct Cli {
    /// PDF files to show; overrides any configured catalog
    files: Vec<PathBuf>,

    /// YAML catalog of `{ title, url }` entries
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Device pixel ratio for page renders (clamped to 1..=3)
    #[arg(long, value_name = "RATIO")]
    dpr: Option<f32>,

    #[arg(long, value_name = "FILE", default_value = "folio.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Write catalog thumbnails as PNG files into DIR and exit
    #[arg(long, value_name = "DIR")]
    export_thumbnails: Option<PathBuf>,

    /// Container width used for exported thumbnails
    #[arg(long, value_name = "PX", default_value_t = 300.0)]
    thumbnail_width: f32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow::anyhow!("Unknown log level: {}", cli.log_level))?;
    WriteLogger::init(level, Config::default(), File::create(&cli.log_file)?)?;
    info!("Starting folio");

    match &cli.config {
        Some(path) => settings::load_settings_from(path),
        None => settings::load_settings(),
    }
    if let Some(dpr) = cli.dpr {
        settings::set_device_pixel_ratio(dpr);
    }

    let catalog = select_catalog(&cli)?;
    info!("Catalog has {} entries", catalog.len());
    let loader = create_loader(catalog.base_dir())?;

    if let Some(dir) = &cli.export_thumbnails {
        let written =
            export::export_thumbnails(&catalog, loader.as_ref(), cli.thumbnail_width, dir)?;
        println!("Wrote {} thumbnails to {}", written.len(), dir.display());
        return Ok(());
    }

    panic_handler::initialize_panic_handler();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        catalog,
        loader,
        settings::get_viewer_config(),
        settings::get_thumbnail_workers(),
    );
    let mut event_source = TerminalEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down folio");
    Ok(())
}

fn select_catalog(cli: &Cli) -> Result<Catalog> {
    if !cli.files.is_empty() {
        return Ok(Catalog::from_paths(&cli.files));
    }
    if let Some(path) = &cli.catalog {
        return Ok(Catalog::load(path)?);
    }
    let configured = settings::get_catalog();
    if !configured.is_empty() {
        return Ok(Catalog::new(configured));
    }
    Ok(Catalog::builtin())
}

#[cfg(feature = "pdf")]
fn create_loader(base_dir: Option<&Path>) -> Result<Arc<dyn DocumentLoader>> {
    Ok(Arc::new(folio::pdf::MuPdfLoader::new(
        base_dir.map(Path::to_path_buf),
    )))
}

#[cfg(not(feature = "pdf"))]
fn create_loader(_base_dir: Option<&Path>) -> Result<Arc<dyn DocumentLoader>> {
    anyhow::bail!("folio was built without the `pdf` feature; no PDF engine is available")
}
