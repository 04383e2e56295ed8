use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use onboard_core::steps;
use services::{
    AppServices, Clock, DeploymentService, HeaderService, KeyService, ProgressService,
    SimulationProfile, SubscriptionService, WhitelistService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://onboard.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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
}

impl UiApp for DesktopApp {
    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn whitelist(&self) -> Arc<WhitelistService> {
        self.services.whitelist()
    }

    fn keys(&self) -> Arc<KeyService> {
        self.services.keys()
    }

    fn deployment(&self) -> Arc<DeploymentService> {
        self.services.deployment()
    }

    fn subscription(&self) -> Arc<SubscriptionService> {
        self.services.subscription()
    }

    fn headers(&self) -> Arc<HeaderService> {
        self.services.headers()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    instant: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--db <sqlite_url>] [--instant]");
    eprintln!("  cargo run -p app -- status [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ONBOARD_DB_URL, ONBOARD_INSTANT, ONBOARD_LOG (RUST_LOG takes precedence)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Status,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "status" => Some(Self::Status),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

fn env_flag(value: Option<String>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env_db: Option<String>,
        env_instant: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db.map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut instant = env_flag(env_instant);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--instant" => instant = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, instant })
    }

    fn from_env(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        Self::parse(
            args,
            std::env::var("ONBOARD_DB_URL").ok(),
            std::env::var("ONBOARD_INSTANT").ok(),
        )
    }

    fn profile(&self) -> SimulationProfile {
        if self.instant {
            SimulationProfile::instant()
        } else {
            SimulationProfile::default()
        }
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

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| {
            std::env::var("ONBOARD_LOG")
                .ok()
                .and_then(|raw| EnvFilter::try_new(raw).ok())
        })
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::from_env(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging();

    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), parsed.profile()).await?;

    match cmd {
        Command::Ui => {
            info!(db = %parsed.db_url, instant = parsed.instant, "launching desktop ui");
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("ONDC Onboarding")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Status => {
            let record = services.progress().load().await?;
            for step in steps::derive_steps(&record) {
                let mark = if step.is_completed { "x" } else { " " };
                println!("[{mark}] {}. {} ({})", step.number, step.title, step.path);
            }
            println!("Progress: {}%", steps::progress_percent(&record));
            match steps::next_step(&record) {
                Some(next) => println!("Next: {}", next.title),
                None => println!("All steps complete."),
            }
            if let Some(session) = record.session_id() {
                println!("Session: {session}");
            }
            Ok(())
        }
        Command::Reset => {
            services.progress().reset().await?;
            println!("Progress cleared in {}", parsed.db_url);
            Ok(())
        }
    }
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(
        args: &[&str],
        env_db: Option<&str>,
        env_instant: Option<&str>,
    ) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(ToString::to_string);
        Args::parse(
            &mut iter,
            env_db.map(str::to_string),
            env_instant.map(str::to_string),
        )
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let args = parse(&[], None, None).unwrap();
        assert_eq!(args.db_url, DEFAULT_DB_URL);
        assert!(!args.instant);
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--db", "sqlite://flag.sqlite3", "--instant"],
            Some("sqlite://env.sqlite3"),
            Some("0"),
        )
        .unwrap();
        assert_eq!(args.db_url, "sqlite://flag.sqlite3");
        assert!(args.instant);
        assert_eq!(args.profile(), SimulationProfile::instant());
    }

    #[test]
    fn environment_instant_flag_is_read() {
        let args = parse(&[], Some("sqlite::memory:"), Some("true")).unwrap();
        assert_eq!(args.db_url, "sqlite::memory:");
        assert!(args.instant);
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(matches!(
            parse(&["--db"], None, None),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--db", "  "], None, None),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
        assert!(matches!(
            parse(&["--verbose"], None, None),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/onboard.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/onboard.sqlite3"));
    }

    #[test]
    fn memory_url_needs_no_file() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("postgres://nope").is_err());
    }
}
