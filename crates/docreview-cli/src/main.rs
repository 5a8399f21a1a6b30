mod commands;
mod output;

use clap::{Parser, Subcommand};
use docreview_core::error::DocReviewError;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "docreview",
    version,
    about = "Line-indexed review comments for PDF documents"
)]
struct Cli {
    /// JSON config file with indexing and navigation tunables
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// State file (overrides DOCREVIEW_STORE and the config)
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write the log to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in locally; the display name is the part of the email before '@'
    Login { email: String },
    /// Forget the logged-in user
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage the document library
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },
    /// Build the line index of a PDF or a JSON page item dump
    Index {
        /// Path to PDF or JSON page item dump
        input_file: PathBuf,

        /// Only this page
        #[arg(short, long)]
        page: Option<u32>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Find the indexed line nearest to a y position
    Locate {
        /// Path to PDF or JSON page item dump
        input_file: PathBuf,

        #[arg(short, long)]
        page: u32,

        /// Viewport y (top-left origin)
        #[arg(short, long, allow_hyphen_values = true)]
        y: f64,

        /// Search radius (default from config)
        #[arg(short, long)]
        radius: Option<f64>,
    },
    /// List the sections of a document manifest's outline
    Sections {
        /// Document manifest (JSON)
        manifest: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Compute section anchors for a continuous page layout
    Anchors {
        /// Document manifest (JSON)
        manifest: PathBuf,

        #[command(flatten)]
        layout: commands::anchors::LayoutArgs,

        /// Jump to this section id and report where the viewport lands
        #[arg(long, value_name = "SECTION")]
        jump: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Add or list comments
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },
    /// Export a file's comments to CSV
    Export {
        file_id: String,

        /// Document manifest providing page labels
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output file (default: <name>_comments.csv in the current directory)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum FilesAction {
    /// List uploaded documents
    List {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Upload a PDF into the library
    Add { path: PathBuf },
    /// Remove a document and all of its comments
    Remove { file_id: String },
}

#[derive(Subcommand)]
enum CommentAction {
    /// Add a comment to a page
    Add(commands::comment::AddArgs),
    /// List the comments of a file
    List {
        file_id: String,

        /// Document manifest providing page labels
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), DocReviewError> {
    let result = match log_file {
        Some(path) => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            WriteLogger::init(level, Config::default(), File::create(path)?)
        }
        None => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            };
            TermLogger::init(
                level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )
        }
    };
    result.map_err(|e| DocReviewError::InvalidInput(format!("could not start logging: {e}")))
}

fn run(cli: Cli) -> Result<(), DocReviewError> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let ctx = commands::Context::load(cli.config.as_deref(), cli.store.as_deref())?;

    match cli.command {
        Commands::Login { email } => commands::session::login(&ctx, &email),
        Commands::Logout => commands::session::logout(&ctx),
        Commands::Whoami => commands::session::whoami(&ctx),
        Commands::Files { action } => match action {
            FilesAction::List { output } => commands::files::list(&ctx, &output),
            FilesAction::Add { path } => commands::files::add(&ctx, &path),
            FilesAction::Remove { file_id } => commands::files::remove(&ctx, &file_id),
        },
        Commands::Index {
            input_file,
            page,
            output,
        } => commands::index::run(&ctx, &input_file, page, &output),
        Commands::Locate {
            input_file,
            page,
            y,
            radius,
        } => commands::index::locate(&ctx, &input_file, page, y, radius),
        Commands::Sections { manifest, output } => commands::sections::run(&manifest, &output),
        Commands::Anchors {
            manifest,
            layout,
            jump,
            output,
        } => commands::anchors::run(&ctx, &manifest, &layout, jump.as_deref(), &output),
        Commands::Comment { action } => match action {
            CommentAction::Add(args) => commands::comment::add(&ctx, args),
            CommentAction::List {
                file_id,
                manifest,
                output,
            } => commands::comment::list(&ctx, &file_id, manifest.as_deref(), &output),
        },
        Commands::Export {
            file_id,
            manifest,
            out,
        } => commands::export::run(&ctx, &file_id, manifest.as_deref(), out),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
