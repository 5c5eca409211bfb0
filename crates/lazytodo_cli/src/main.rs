//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `lazytodo_core` linkage and schema bootstrap from a binary.
//! - Start file logging when a log directory is supplied.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `lazytodo_cli [DB_PATH] [LOG_DIR]`. `LOG_DIR` falls back to
//! `LAZYTODO_LOG_DIR` and must be absolute.

use lazytodo_core::db::migrations::latest_version;
use lazytodo_core::db::{open_db, open_db_in_memory};
use lazytodo_core::{default_log_level, init_logging, LoggingError};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "LAZYTODO_LOG_DIR";

fn main() -> ExitCode {
    println!("lazytodo_core ping={}", lazytodo_core::ping());
    println!("lazytodo_core version={}", lazytodo_core::core_version());

    let mut args = std::env::args().skip(1);
    let db_path = args.next();
    let log_dir = resolve_log_dir(args.next(), std::env::var(LOG_DIR_ENV).ok());

    match start_logging(log_dir.as_deref()) {
        Ok(true) => println!("lazytodo_core logging=on"),
        Ok(false) => {}
        Err(err) => {
            eprintln!("lazytodo_core logging=failed error={err}");
            return ExitCode::FAILURE;
        }
    }

    let opened = match db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    match opened {
        Ok(_) => {
            println!("lazytodo_core schema_version={}", latest_version());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("lazytodo_core db_open=failed error={err}");
            ExitCode::FAILURE
        }
    }
}

/// Positional argument wins over the environment; blank values count as unset.
fn resolve_log_dir(arg: Option<String>, env: Option<String>) -> Option<String> {
    arg.into_iter()
        .chain(env)
        .find(|value| !value.trim().is_empty())
}

/// Returns whether a logger was started.
fn start_logging(log_dir: Option<&str>) -> Result<bool, LoggingError> {
    match log_dir {
        Some(dir) => init_logging(default_log_level(), dir).map(|()| true),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_log_dir, start_logging};
    use lazytodo_core::{logging_status, LoggingError};

    #[test]
    fn log_dir_argument_overrides_environment() {
        assert_eq!(
            resolve_log_dir(Some("/tmp/a".into()), Some("/tmp/b".into())),
            Some("/tmp/a".to_string())
        );
        assert_eq!(
            resolve_log_dir(None, Some("/tmp/b".into())),
            Some("/tmp/b".to_string())
        );
        assert_eq!(
            resolve_log_dir(Some("  ".into()), Some("/tmp/b".into())),
            Some("/tmp/b".to_string())
        );
        assert_eq!(resolve_log_dir(None, Some(String::new())), None);
        assert_eq!(resolve_log_dir(None, None), None);
    }

    #[test]
    fn start_logging_initializes_core_logger() {
        assert!(!start_logging(None).expect("no dir is not an error"));
        assert!(matches!(
            start_logging(Some("relative/logs")),
            Err(LoggingError::RelativeLogDir(_))
        ));

        let dir = tempfile::tempdir().expect("temp dir");
        let dir_str = dir.path().to_str().expect("utf-8 path");
        assert!(start_logging(Some(dir_str)).expect("absolute dir should start logging"));

        let active = logging_status().expect("logger should be active");
        assert_eq!(active.log_dir(), &dir.path().to_path_buf());
    }
}
