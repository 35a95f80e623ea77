#![doc = include_str!("../README.md")]

/// CLI module - command-line interface for datadoc
mod cli;

fn main() {
    cli::run_cli();
}
