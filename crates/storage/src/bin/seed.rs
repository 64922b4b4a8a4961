use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use study_core::model::MaterialDraft;
use storage::repository::{NewCourseRecord, NewMaterialRecord, Storage};

const SAMPLE_NOTES: &str = "Price ceilings set a legal maximum price. When the ceiling sits \
below equilibrium, quantity demanded exceeds quantity supplied and a shortage follows. \
Price floors set a legal minimum; above equilibrium they create a surplus.\n\n\
A tariff is a tax on imports. It raises the domestic price, lowers imports and \
creates government revenue plus a deadweight loss.";

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    course_name: String,
    exam_date: Option<NaiveDate>,
    material_title: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidExamDate { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidExamDate { raw } => {
                write!(f, "invalid --exam-date value (expected YYYY-MM-DD): {raw}")
            }
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("STUDY_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut course_name =
            std::env::var("STUDY_COURSE_NAME").unwrap_or_else(|_| "Microeconomics".into());
        let mut exam_date = None;
        let mut material_title = "Lecture notes".to_string();
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
                "--name" => {
                    course_name = require_value(&mut args, "--name")?;
                }
                "--exam-date" => {
                    let value = require_value(&mut args, "--exam-date")?;
                    let parsed = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                        .map_err(|_| ArgsError::InvalidExamDate { raw: value.clone() })?;
                    exam_date = Some(parsed);
                }
                "--title" => {
                    material_title = require_value(&mut args, "--title")?;
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
            course_name,
            exam_date,
            material_title,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --name <name>             Course name (default: Microeconomics)");
    eprintln!("  --exam-date <YYYY-MM-DD>  Optional exam date");
    eprintln!("  --title <title>           Title of the sample material (default: Lecture notes)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  STUDY_DB_URL, STUDY_COURSE_NAME");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let course = storage
        .courses
        .insert_course(NewCourseRecord::new(
            args.course_name.clone(),
            args.exam_date,
            now,
        )?)
        .await?;

    let material = MaterialDraft::new(args.material_title.clone(), SAMPLE_NOTES).validate()?;
    let material = storage
        .materials
        .insert_material(NewMaterialRecord::from_validated(course.id(), material, now))
        .await?;

    println!(
        "Seeded course {} ({}) with material {} into {}",
        course.id(),
        course.name(),
        material.id,
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
