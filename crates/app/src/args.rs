use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use study_core::model::CourseId;
use study_core::quiz::Topic;

pub const DEFAULT_DB_URL: &str = "sqlite://dev.sqlite3";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str, command: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidCourseId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidTopic { raw: String },
    InvalidCount { raw: String },
    InvalidMinutes { raw: String },
    InvalidExamDate { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag, command } => {
                write!(f, "{command} requires {flag}")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTopic { raw } => write!(
                f,
                "invalid --topic value: {raw} (expected price_controls, quota_tariff or shifts)"
            ),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidMinutes { raw } => write!(f, "invalid --exam value: {raw}"),
            ArgsError::InvalidExamDate { raw } => {
                write!(f, "invalid --exam-date value (expected YYYY-MM-DD): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quiz,
    Courses,
    AddCourse,
    Materials,
    AddMaterial,
    Generate,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "courses" => Some(Self::Courses),
            "add-course" => Some(Self::AddCourse),
            "materials" => Some(Self::Materials),
            "add-material" => Some(Self::AddMaterial),
            "generate" => Some(Self::Generate),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Courses => "courses",
            Self::AddCourse => "add-course",
            Self::Materials => "materials",
            Self::AddMaterial => "add-material",
            Self::Generate => "generate",
        }
    }
}

/// Parsed command line. Flags that do not apply to the chosen command are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub db_url: String,
    pub course_id: Option<CourseId>,
    pub topic: Option<Topic>,
    pub count: Option<usize>,
    pub exam_minutes: Option<u32>,
    pub name: Option<String>,
    pub exam_date: Option<NaiveDate>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub pdf: Option<PathBuf>,
}

/// Outcome of parsing: either work to do or a request for help.
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Args),
    Help,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_course_id(raw: String) -> Result<CourseId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidCourseId { raw })
}

impl Args {
    /// Parse `argv` (without the program name). `env` supplies
    /// `STUDY_DB_URL` and `STUDY_COURSE_ID` defaults.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Parsed, ArgsError> {
        let mut args = argv.into_iter().peekable();

        let command = match args.peek().map(String::as_str) {
            None => Command::Quiz,
            Some(first) if first.starts_with('-') => Command::Quiz,
            Some(first) => Command::from_arg(first)
                .ok_or_else(|| ArgsError::UnknownCommand(first.to_string()))?,
        };
        if args.peek().is_some_and(|first| !first.starts_with('-')) {
            args.next();
        }

        let mut parsed = Self {
            command,
            db_url: env("STUDY_DB_URL")
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
            course_id: env("STUDY_COURSE_ID").and_then(|v| v.parse().ok()),
            topic: None,
            count: None,
            exam_minutes: None,
            name: None,
            exam_date: None,
            title: None,
            text: None,
            pdf: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--course-id" => {
                    let value = require_value(&mut args, "--course-id")?;
                    parsed.course_id = Some(parse_course_id(value)?);
                }
                "--topic" => {
                    let value = require_value(&mut args, "--topic")?;
                    let topic = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidTopic { raw: value.clone() })?;
                    parsed.topic = Some(topic);
                }
                "--count" => {
                    let value = require_value(&mut args, "--count")?;
                    let count = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                    parsed.count = Some(count);
                }
                "--exam" => {
                    let value = require_value(&mut args, "--exam")?;
                    let minutes = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidMinutes { raw: value.clone() })?;
                    parsed.exam_minutes = Some(minutes);
                }
                "--name" => parsed.name = Some(require_value(&mut args, "--name")?),
                "--exam-date" => {
                    let value = require_value(&mut args, "--exam-date")?;
                    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                        .map_err(|_| ArgsError::InvalidExamDate { raw: value.clone() })?;
                    parsed.exam_date = Some(date);
                }
                "--title" => parsed.title = Some(require_value(&mut args, "--title")?),
                "--text" => parsed.text = Some(require_value(&mut args, "--text")?),
                "--pdf" => parsed.pdf = Some(require_value(&mut args, "--pdf")?.into()),
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(parsed))
    }

    /// The course id, required by course-scoped commands.
    pub fn require_course_id(&self) -> Result<CourseId, ArgsError> {
        self.course_id.ok_or(ArgsError::MissingFlag {
            flag: "--course-id",
            command: self.command.name(),
        })
    }

    pub fn require_name(&self) -> Result<&str, ArgsError> {
        self.name.as_deref().ok_or(ArgsError::MissingFlag {
            flag: "--name",
            command: self.command.name(),
        })
    }

    /// `add-material` needs notes from `--text`, `--pdf` or both.
    pub fn require_text_or_pdf(&self) -> Result<(), ArgsError> {
        if self.text.is_none() && self.pdf.is_none() {
            return Err(ArgsError::MissingFlag {
                flag: "--text or --pdf",
                command: self.command.name(),
            });
        }
        Ok(())
    }
}

/// Content type guessed from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  study [quiz] [--topic <key>] [--count <n>] [--exam <minutes>]");
    eprintln!("  study courses [--db <sqlite_url>]");
    eprintln!("  study add-course --name <name> [--exam-date <YYYY-MM-DD>]");
    eprintln!("  study materials --course-id <id>");
    eprintln!("  study add-material --course-id <id> (--text <notes> | --pdf <file>) [--title <title>]");
    eprintln!("  study generate (--course-id <id> | --text <notes>)");
    eprintln!();
    eprintln!("Topics:");
    for topic in Topic::ALL {
        eprintln!("  {:<16} {}", topic.key(), topic.label());
    }
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!("  --count 10, --exam 20 (counts: 5 8 10 12 15; minutes: 5 10 15 20 30 45 60)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DB_URL, STUDY_COURSE_ID");
    eprintln!("  STUDY_QUIZ_TOPIC, STUDY_QUIZ_COUNT, STUDY_EXAM_MINUTES");
    eprintln!("  STUDY_AI_API_KEY, STUDY_AI_BASE_URL, STUDY_AI_MODEL");
    eprintln!("  RUST_LOG (log filter, default: warn)");
}

pub fn normalize_sqlite_url(raw: String) -> String {
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

/// Creates the database file (and parent directories) so `SQLite` can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
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
