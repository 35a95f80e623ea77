//! Command-line interface for datadoc

/// Clap argument definitions
mod args;

/// Config command handlers
mod config;

/// `diff` and `history` commands
mod diff;

/// `init` command and CSV reading
mod init;

/// `update`, `insert`, `delete` and `ask` commands
mod rows;

/// `show` command
mod show;

/// Shared CLI utilities
mod util;

use clap::Parser;

use datadoc_core::DatadocApp;
use datadoc_core::fs::RealFileSystem;

use args::{Cli, Commands};

/// Type alias for DatadocApp on the real filesystem.
pub type CliDatadocApp = DatadocApp<RealFileSystem>;

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = util::load_config();
    log::debug!("Using config: {config:?}");
    util::apply_color_choice(config.color);

    let mut options = config.parse_options();
    options.strict_counts |= cli.strict;
    let app = DatadocApp::with_options(RealFileSystem, options);

    // Execute commands and track success
    let success = match cli.command {
        Commands::Init { csv, output, force } => init::handle_init(&app, &csv, &output, force),

        Commands::Show {
            path,
            revision,
            json,
        } => show::handle_show(&app, &path, revision, json),

        Commands::Update {
            path,
            facet,
            index,
            patch,
        } => rows::handle_update(&app, &path, facet, index, &patch),

        Commands::Insert { path, facet, row } => rows::handle_insert(&app, &path, facet, &row),

        Commands::Delete {
            path,
            facet,
            indices,
        } => rows::handle_delete(&app, &path, facet, &indices),

        Commands::Ask { path, message } => rows::handle_ask(&app, &path, &message),

        Commands::Diff {
            path,
            from,
            to,
            json,
            color,
        } => diff::handle_diff(&app, &config, &path, from, to, json, color.map(Into::into)),

        Commands::History { path } => diff::handle_history(&app, &path),

        Commands::Config { command } => config::handle_config_command(command, config),
    };

    if !success {
        std::process::exit(1);
    }
}
