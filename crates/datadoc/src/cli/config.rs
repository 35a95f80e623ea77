//! Config command handlers

use colored::Colorize;
use datadoc_core::config::{ColorChoice, Config, DiffFormat};

use crate::cli::args::ConfigCommands;

pub fn handle_config_command(command: Option<ConfigCommands>, config: Config) -> bool {
    match command {
        None | Some(ConfigCommands::Show) => {
            show_config(&config);
            true
        }
        Some(ConfigCommands::Path) => match Config::config_path() {
            Some(path) => {
                println!("{}", path.display());
                true
            }
            None => {
                eprintln!("{} No config directory on this platform", "✗".red());
                false
            }
        },
        Some(ConfigCommands::Set { key, value }) => set_value(config, &key, &value),
    }
}

fn show_config(config: &Config) {
    println!("datadoc configuration");
    println!("=====================");
    println!("color: {}", color_name(config.color));
    println!("diff_format: {}", format_name(config.diff_format));
    println!("strict_counts: {}", config.strict_counts);
    if let Some(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

fn set_value(mut config: Config, key: &str, value: &str) -> bool {
    if let Err(message) = apply_setting(&mut config, key, value) {
        eprintln!("{} {}", "✗".red(), message);
        return false;
    }
    match config.save() {
        Ok(()) => {
            println!("{} Set {} = {}", "✓".green(), key, value);
            true
        }
        Err(e) => {
            eprintln!("{} Error saving config: {}", "✗".red(), e);
            false
        }
    }
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    match key {
        "color" => {
            config.color = match value {
                "auto" => ColorChoice::Auto,
                "always" => ColorChoice::Always,
                "never" => ColorChoice::Never,
                _ => return Err(format!("Invalid color '{value}' (auto, always, never)")),
            }
        }
        "diff_format" => {
            config.diff_format = match value {
                "markdown" => DiffFormat::Markdown,
                "json" => DiffFormat::Json,
                _ => return Err(format!("Invalid diff_format '{value}' (markdown, json)")),
            }
        }
        "strict_counts" => {
            config.strict_counts = value
                .parse()
                .map_err(|_| format!("Invalid strict_counts '{value}' (true, false)"))?
        }
        _ => {
            return Err(format!(
                "Unknown key '{key}' (color, diff_format, strict_counts)"
            ));
        }
    }
    Ok(())
}

fn color_name(choice: ColorChoice) -> &'static str {
    match choice {
        ColorChoice::Auto => "auto",
        ColorChoice::Always => "always",
        ColorChoice::Never => "never",
    }
}

fn format_name(format: DiffFormat) -> &'static str {
    match format {
        DiffFormat::Markdown => "markdown",
        DiffFormat::Json => "json",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();
        apply_setting(&mut config, "color", "never").unwrap();
        apply_setting(&mut config, "diff_format", "json").unwrap();
        apply_setting(&mut config, "strict_counts", "true").unwrap();

        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.diff_format, DiffFormat::Json);
        assert!(config.strict_counts);
    }

    #[test]
    fn test_apply_setting_rejects_bad_input() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "colour", "never").is_err());
        assert!(apply_setting(&mut config, "color", "sometimes").is_err());
        assert!(apply_setting(&mut config, "strict_counts", "yes").is_err());
        assert_eq!(config, Config::default());
    }
}
