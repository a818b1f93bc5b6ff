//! mdforge - Main Entry Point
//!
//! Command line front end over the [`App`] backend.

mod cli;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{debug, error, info, warn, LevelFilter};

use cli::{Cli, Commands};
use mdforge::config::{get_config_file_path, load_config};
#[cfg(feature = "native-dialogs")]
use mdforge::files::dialogs::NativeDialogs;
use mdforge::files::dialogs::{FilePicker, PresetPicker};
use mdforge::files::read_text;
use mdforge::i18n::Language;
use mdforge::markdown::MarkdownRenderer;
use mdforge::{App, Error, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_no_selection() => {
            warn!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Version => {
            println!("mdforge {}", App::version());
            Ok(())
        }
        Commands::Render { input } => {
            let bytes = fs::read(&input).map_err(|e| Error::FileRead {
                path: input.clone(),
                source: e,
            })?;
            let html = MarkdownRenderer::default().render_bytes(&bytes)?;
            print!("{}", html);
            Ok(())
        }
        Commands::Export {
            input,
            output,
            title,
            lang,
            open,
        } => export(&input, output, title, lang, open),
    }
}

fn export(
    input: &Path,
    output: Option<PathBuf>,
    title: Option<String>,
    lang: Option<String>,
    open: bool,
) -> Result<()> {
    let settings = load_config();
    debug!("Interface language: {}", settings.language.native_name());
    let markdown = read_text(input)?;

    // Command line overrides apply to this export only
    let mut options = settings.export.clone();
    if let Some(code) = lang {
        options.language = Some(Language::from_code(&code));
    }
    if title.is_some() {
        options.title = title;
    }
    let shell = options.shell(settings.language);
    let open_after = open || settings.export.open_after_export;
    debug!("Exporting with lang={} title={:?}", shell.lang, shell.title);

    let picker = match output {
        Some(path) => Arc::new(PresetPicker::new(path)) as Arc<dyn FilePicker>,
        None => default_picker(input),
    };

    let mut app = App::new(settings, picker);
    if let Ok(config_path) = get_config_file_path() {
        app = app.with_config_path(config_path);
    }

    let path = app.export_to_html_as_with(&markdown, &shell)?;
    info!("Exported {} to {}", input.display(), path.display());

    if open_after {
        if let Err(e) = open::that(&path) {
            warn!("Failed to open {}: {}", path.display(), e);
        }
    }
    Ok(())
}

/// Where the export goes when `--output` is not given.
#[cfg(feature = "native-dialogs")]
fn default_picker(_input: &Path) -> Arc<dyn FilePicker> {
    Arc::new(NativeDialogs)
}

/// Where the export goes when `--output` is not given: next to the input.
#[cfg(not(feature = "native-dialogs"))]
fn default_picker(input: &Path) -> Arc<dyn FilePicker> {
    Arc::new(PresetPicker::new(input.with_extension("html")))
}
