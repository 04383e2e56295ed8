use std::fmt;

use chrono::{DateTime, Utc};
use onboard_core::model::{KeySet, ProgressRecord, SessionId, SubscriberId};
use onboard_core::steps::{self, StepId};
use storage::repository::Storage;

const SEED_SESSION_SUFFIX: &str = "seeded000";

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    steps: Vec<StepId>,
    subscriber: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidStep { raw: String },
    InvalidStepList { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidStep { raw } => write!(
                f,
                "invalid --through value (expected none|whitelist|keys|deployment|subscription): {raw}"
            ),
            ArgsError::InvalidStepList { raw } => write!(
                f,
                "invalid --steps value (expected a comma list of whitelist|keys|deployment|subscription): {raw}"
            ),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
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

/// Steps 1..=`raw`, in wizard order.
fn parse_through(raw: &str) -> Result<Vec<StepId>, ArgsError> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    let last =
        StepId::from_name(raw).ok_or_else(|| ArgsError::InvalidStep { raw: raw.to_string() })?;
    Ok(StepId::ALL
        .into_iter()
        .take_while(|step| step.number() <= last.number())
        .collect())
}

/// Exactly the listed steps, regardless of wizard order.
fn parse_step_list(raw: &str) -> Result<Vec<StepId>, ArgsError> {
    let invalid = || ArgsError::InvalidStepList { raw: raw.to_string() };
    if raw.trim().eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    let mut steps = Vec::new();
    for name in raw.split(',') {
        let step = StepId::from_name(name).ok_or_else(invalid)?;
        if !steps.contains(&step) {
            steps.push(step);
        }
    }
    Ok(steps)
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("ONBOARD_DB_URL")
            .unwrap_or_else(|_| "sqlite://onboard.sqlite3".into());
        let mut steps = StepId::ALL.to_vec();
        let mut subscriber = "buyer-app.ondc.org".to_string();
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--through" => {
                    let value = require_value(&mut args, "--through")?;
                    steps = parse_through(&value)?;
                }
                "--steps" => {
                    let value = require_value(&mut args, "--steps")?;
                    steps = parse_step_list(&value)?;
                }
                "--subscriber" => {
                    subscriber = require_value(&mut args, "--subscriber")?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
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
            steps,
            subscriber,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://onboard.sqlite3)");
    eprintln!("  --through <step>          Last completed step: none, whitelist, keys,");
    eprintln!("                            deployment or subscription (default: subscription)");
    eprintln!("  --steps <a,b,..>          Exactly these steps, ignoring wizard order");
    eprintln!("                            (e.g. deployment,subscription with no keys)");
    eprintln!("  --subscriber <id>         Subscriber id to record (default: buyer-app.ondc.org)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  ONBOARD_DB_URL");
}

fn sample_keys(session: &SessionId) -> KeySet {
    KeySet {
        sign_private_key: "seed-sign-private-key".into(),
        sign_public_key: "seed-sign-public-key".into(),
        enc_private_key: "seed-enc-private-key".into(),
        enc_public_key: "seed-enc-public-key".into(),
        session_id: Some(session.clone()),
    }
}

fn build_record(
    steps: &[StepId],
    subscriber: SubscriberId,
    session: SessionId,
) -> ProgressRecord {
    let mut record = ProgressRecord::new();
    for step in steps {
        match step {
            StepId::Whitelist => record.mark_whitelisted(subscriber.clone(), session.clone()),
            StepId::Keys => record.set_keys(sample_keys(&session)),
            StepId::Deployment => record.set_deployment_completed(true),
            StepId::Subscription => record.set_subscription_completed(true),
        }
    }
    record
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);
    let subscriber = SubscriberId::new(&args.subscriber)?;
    let session = SessionId::new(now.timestamp_millis(), SEED_SESSION_SUFFIX)?;

    let record = build_record(&args.steps, subscriber, session);
    storage.progress.save_progress(&record).await?;

    println!(
        "Seeded {} of {} steps ({}%) into {}",
        steps::completed_count(&record),
        StepId::ALL.len(),
        steps::progress_percent(&record),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
