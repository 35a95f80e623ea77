//! Shared utilities for CLI commands

use std::io::IsTerminal;

use colored::Colorize;
use datadoc_core::config::{ColorChoice, Config};
use datadoc_core::{DatadocError, Result};

/// Load the user config, falling back to defaults when it cannot be read
pub fn load_config() -> Config {
    match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} Error loading config: {}", "✗".red(), e);
            eprintln!("  Using default settings");
            Config::default()
        }
    }
}

/// Apply the colour choice to `colored` for all status output
pub fn apply_color_choice(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {}
    }
}

/// Whether ANSI colour should be written to stdout
pub fn use_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::io::stdout().is_terminal() && colored::control::SHOULD_COLORIZE.should_colorize()
        }
    }
}

/// Print an error, as JSON when the command was asked for JSON output
pub fn print_error(err: &DatadocError, json: bool) {
    if json && let Ok(text) = serde_json::to_string(&err.to_serializable()) {
        eprintln!("{text}");
        return;
    }
    eprintln!("{} {}", "✗".red(), err);
}

/// Print a ✓ line on success or the error on failure
/// Returns true on success
pub fn report<T>(result: Result<T>, success: impl FnOnce(&T) -> String) -> bool {
    match result {
        Ok(value) => {
            println!("{} {}", "✓".green(), success(&value));
            true
        }
        Err(e) => {
            print_error(&e, false);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_color_choice_wins() {
        assert!(use_color(ColorChoice::Always));
        assert!(!use_color(ColorChoice::Never));
    }

    #[test]
    fn test_report_returns_outcome() {
        assert!(report(Ok(3), |n| format!("revision +{n}")));
        assert!(!report::<usize>(
            Err(DatadocError::EmptyConversation),
            |n| format!("revision +{n}")
        ));
    }
}
