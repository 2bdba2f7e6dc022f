use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use lesson_core::model::Catalog;
use services::engine::RProcessEngine;
use services::{AppServices, Clock, InterpreterSession, ProgressStore, SessionConfig};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://rzero.sqlite3";
const DEFAULT_R_BINARY: &str = "R";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTimeout { raw: String },
    InvalidAttempts { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeout { raw } => {
                write!(f, "invalid --eval-timeout value: {raw} (seconds, 0 disables)")
            }
            ArgsError::InvalidAttempts { raw } => {
                write!(f, "invalid --init-attempts value: {raw} (must be at least 1)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    clock: Clock,
}

impl UiApp for DesktopApp {
    fn catalog(&self) -> Arc<Catalog> {
        self.services.catalog()
    }

    fn session(&self) -> Arc<InterpreterSession> {
        self.services.session()
    }

    fn progress_store(&self) -> ProgressStore {
        self.services.store()
    }

    fn clock(&self) -> Clock {
        self.clock
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    r_binary: String,
    eval_timeout: Option<Duration>,
    init_attempts: u32,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  rzero [ui] [--db <sqlite_url>] [--r-binary <path>] [--eval-timeout <secs>] [--init-attempts <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://rzero.sqlite3");
    eprintln!("  --r-binary R");
    eprintln!("  --eval-timeout 60   (0 disables the limit)");
    eprintln!("  --init-attempts 3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RZERO_DB_URL, RZERO_R_BIN, RZERO_EVAL_TIMEOUT_SECS, RZERO_INIT_ATTEMPTS");
    eprintln!("  RUST_LOG (tracing filter, default \"info\")");
}

fn parse_timeout(raw: String) -> Result<Option<Duration>, ArgsError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ArgsError::InvalidTimeout { raw: raw.clone() })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn parse_attempts(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(attempts) if attempts > 0 => Ok(attempts),
        _ => Err(ArgsError::InvalidAttempts { raw }),
    }
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let defaults = SessionConfig::default();
        let mut db_url = env("RZERO_DB_URL")
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut r_binary = env("RZERO_R_BIN").unwrap_or_else(|| DEFAULT_R_BINARY.into());
        let mut eval_timeout = match env("RZERO_EVAL_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(raw)?,
            None => defaults.eval_timeout,
        };
        let mut init_attempts = match env("RZERO_INIT_ATTEMPTS") {
            Some(raw) => parse_attempts(raw)?,
            None => defaults.init_attempts,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--r-binary" => {
                    r_binary = require_value(args, "--r-binary")?;
                }
                "--eval-timeout" => {
                    eval_timeout = parse_timeout(require_value(args, "--eval-timeout")?)?;
                }
                "--init-attempts" => {
                    init_attempts = parse_attempts(require_value(args, "--init-attempts")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            r_binary,
            eval_timeout,
            init_attempts,
        })
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_init_attempts(self.init_attempts)
            .with_eval_timeout(self.eval_timeout)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    match argv.first().map(String::as_str) {
        None => {}
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("ui") => {
            argv.remove(0);
        }
        Some(first) if first.starts_with("--") => {}
        Some(first) => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(ArgsError::UnknownArg(first.to_string()).into());
        }
    }

    let parsed = Args::parse(&mut argv.into_iter(), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;
    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let engine = Arc::new(RProcessEngine::new(parsed.r_binary.clone()));
    tracing::info!(db = %parsed.db_url, r = %engine.binary().display(), "starting");
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        engine,
        parsed.session_config(),
        tokio::runtime::Handle::current(),
    )
    .await?;
    services.session().spawn_initialize();

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        clock: Clock::system(),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("R from zero")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Args, ArgsError> {
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter, |key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let args = parse(&[], &[]).unwrap();
        assert_eq!(args.db_url, DEFAULT_DB_URL);
        assert_eq!(args.r_binary, "R");
        assert_eq!(args.eval_timeout, Some(Duration::from_secs(60)));
        assert_eq!(args.init_attempts, 3);
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--r-binary", "/opt/R/bin/R", "--eval-timeout", "5"],
            &[("RZERO_R_BIN", "Rscript"), ("RZERO_EVAL_TIMEOUT_SECS", "30"), ("RZERO_INIT_ATTEMPTS", "7")],
        )
        .unwrap();
        assert_eq!(args.r_binary, "/opt/R/bin/R");
        assert_eq!(args.eval_timeout, Some(Duration::from_secs(5)));
        assert_eq!(args.init_attempts, 7);
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let args = parse(&["--eval-timeout", "0"], &[]).unwrap();
        assert_eq!(args.eval_timeout, None);
        assert_eq!(args.session_config().eval_timeout, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            parse(&["--init-attempts", "0"], &[]),
            Err(ArgsError::InvalidAttempts { .. })
        ));
        assert!(matches!(
            parse(&["--eval-timeout", "soon"], &[]),
            Err(ArgsError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            parse(&["--db"], &[]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--bogus", "1"], &[]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn sqlite_urls_become_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:/tmp/r.db".into()),
            "sqlite:///tmp/r.db"
        );
        assert!(normalize_sqlite_url("local.db".into()).starts_with("sqlite:///"));
    }
}
