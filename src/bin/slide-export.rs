//! slide-export CLI
//!
//! Exports a slide deck rendered by the presentation frontend into the
//! presentation model JSON, or prints that model's JSON schema.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use slide_export::{BrowserSession, ConnectionOptions, ExportOptions, ExportResponse, LaunchOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "slide-export")]
#[command(version)]
#[command(about = "Export rendered slide decks into presentation models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export one presentation and print the result as JSON
    Export(ExportArgs),
    /// Print the JSON schema of the presentation model
    Schema,
}

#[derive(Args)]
struct ExportArgs {
    /// Presentation id, opened at <frontend-url>/pdf-maker?id=<ID>
    #[arg(long, value_name = "ID", conflicts_with = "url", required_unless_present = "url")]
    presentation_id: Option<String>,

    /// Page to export, used instead of the frontend URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Frontend base URL (default: NEXT_PUBLIC_URL or http://localhost:3000)
    #[arg(long, value_name = "URL")]
    frontend_url: Option<String>,

    /// Screenshot directory (default: $TEMP_DIRECTORY/screenshots)
    #[arg(long, value_name = "DIR")]
    screenshots_dir: Option<PathBuf>,

    /// Write the response to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Fail the export when a screenshot capture fails
    #[arg(long)]
    strict_capture: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Schema => {
            let schema = slide_export::presentation_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Export(args) => run_export(args),
    }
}

fn run_export(args: ExportArgs) -> anyhow::Result<ExitCode> {
    let mut options = ExportOptions::from_env().strict_capture(args.strict_capture);
    if let Some(url) = args.frontend_url {
        options = options.frontend_url(url);
    }
    if let Some(dir) = args.screenshots_dir {
        options = options.screenshots_dir(dir);
    }

    let url = match (args.url, args.presentation_id) {
        (Some(url), _) => url,
        (None, Some(id)) => options.presentation_url(&id),
        (None, None) => anyhow::bail!("either --url or --presentation-id is required"),
    };

    let session = match args.ws_endpoint {
        Some(endpoint) => BrowserSession::connect(ConnectionOptions::new(endpoint)),
        None => {
            let mut launch = LaunchOptions::new().headless(!args.headed);
            if let Some(path) = args.executable_path {
                launch = launch.chrome_path(path);
            }
            BrowserSession::launch(launch)
        }
    }
    .context("Failed to start browser")?;

    let response = ExportResponse::from(session.export_presentation(&url, &options));
    // Shuts the browser down before the output is written
    drop(session);
    if let Some(error) = &response.error {
        log::error!("Export failed: {}", error);
    }

    let json = serde_json::to_string_pretty(&response)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(response.exit_code())
}
