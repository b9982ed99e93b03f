use std::path::Path;

use owo_colors::OwoColorize;

use crate::conf::{ConfigError, EncserveConfig, load_config};

/// Validate a config file, printing a summary or the error with a hint.
/// Exits with status 1 if the config is invalid.
pub fn check(path: &Path, plain: bool) -> anyhow::Result<()> {
    match load_config(path) {
        Ok(cfg) => {
            print_summary(&cfg);
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_summary(cfg: &EncserveConfig) {
    let on_off = |enabled: bool| if enabled { "on" } else { "off" };

    println!("✔ Config loaded successfully");
    println!("✔ listening on {}", cfg.server.listen);
    println!("✔ serving {}", cfg.static_files.root.display());
    println!(
        "✔ directory listing {}",
        on_off(cfg.static_files.directory_listing)
    );
    if cfg.test_handlers.delay || cfg.test_handlers.add_headers {
        println!(
            "✔ test handlers: delay {}, add_headers {}",
            on_off(cfg.test_handlers.delay),
            on_off(cfg.test_handlers.add_headers)
        );
    }
}

fn print_config_error(err: &ConfigError, plain: bool) {
    if plain {
        eprintln!("error: {err}");
    } else {
        eprintln!();
        eprintln!("{}: {err}", "error".red().bold());
    }

    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        if plain {
            eprintln!("{hint}");
        } else {
            eprintln!("{}", hint.dimmed());
        }
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::InvalidListen { .. } => Some(
            "The listen address must be an IP address and a port.\n\
             \n\
             Example:\n\
             \n\
             [server]\n\
             listen = \"127.0.0.1:8080\"",
        ),

        ConfigError::MissingRoot { .. } => Some(
            "The static root must be an existing directory.\n\
             \n\
             Relative paths are resolved against the directory holding the config file.",
        ),

        ConfigError::InvalidThreads => Some(
            "Remove `threads` to let Pingora decide, or set it to a positive number.",
        ),

        ConfigError::ReadFile { .. } => Some(
            "Pass the config file explicitly, e.g.\n\
             \n\
             encserve check --config config/encserve.toml",
        ),

        ConfigError::Parse { .. } => None,
    }
}
