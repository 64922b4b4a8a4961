mod args;
mod render;
mod terminal;

use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{
    AppServices, Clock, PdfTextExtractor, QuizGenerationService, QuizSettings, import_document,
};
use study_core::model::MaterialDraft;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::args::{
    Args, ArgsError, Command, Parsed, content_type_for, prepare_sqlite_file, print_usage,
};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Environment defaults overridden by `--topic`, `--count` and `--exam`.
fn quiz_settings(args: &Args) -> Result<QuizSettings, Box<dyn std::error::Error>> {
    let mut settings = QuizSettings::from_env()?;
    if let Some(topic) = args.topic {
        settings = settings.with_topic(topic);
    }
    if let Some(count) = args.count {
        settings = settings.with_count(count)?;
    }
    if let Some(minutes) = args.exam_minutes {
        settings = settings.with_exam_minutes(minutes)?;
    }
    Ok(settings)
}

async fn open_services(args: &Args) -> Result<AppServices, Box<dyn std::error::Error>> {
    // Open + migrate SQLite here so core/services stay free of file-system concerns.
    prepare_sqlite_file(&args.db_url)?;
    Ok(AppServices::new_sqlite(&args.db_url, Clock::system()).await?)
}

/// `--text` and/or the text layer of `--pdf`, titled by `--title` or the file name.
fn material_draft(args: &Args) -> Result<MaterialDraft, Box<dyn std::error::Error>> {
    args.require_text_or_pdf()?;
    let mut draft = MaterialDraft::new(
        args.title.clone().unwrap_or_default(),
        args.text.clone().unwrap_or_default(),
    );
    if let Some(path) = &args.pdf {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        import_document(
            &mut draft,
            &file_name,
            content_type_for(path),
            &bytes,
            &PdfTextExtractor,
        )?;
    }
    Ok(draft)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .inspect_err(|_| print_usage())?;
    let args = match parsed {
        Parsed::Run(args) => args,
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
    };
    tracing::debug!(command = ?args.command, db = %args.db_url, "starting");

    match args.command {
        Command::Quiz => {
            let settings = quiz_settings(&args)?;
            let exam = args.exam_minutes.map(|_| settings.exam_minutes());
            terminal::run(StdRng::from_os_rng(), settings, exam).await
        }
        Command::Courses => {
            let services = open_services(&args).await?;
            let courses = services.courses();
            let list = courses.list_courses().await?;
            if list.is_empty() {
                println!("No courses yet. Add one with `study add-course --name <name>`.");
            }
            for course in &list {
                println!("{}", render::course_line(course, courses.days_until_exam(course)));
            }
            Ok(())
        }
        Command::AddCourse => {
            let name = args.require_name()?.to_owned();
            let services = open_services(&args).await?;
            let course = services.courses().add_course(name, args.exam_date).await?;
            println!("Added course #{} {}", course.id(), course.name());
            Ok(())
        }
        Command::Materials => {
            let course_id = args.require_course_id()?;
            let services = open_services(&args).await?;
            let list = services.materials().list(course_id).await?;
            if list.is_empty() {
                println!("No materials for course #{course_id}.");
            }
            for material in &list {
                println!("{}", render::material_line(material));
            }
            Ok(())
        }
        Command::AddMaterial => {
            let course_id = args.require_course_id()?;
            let draft = material_draft(&args)?;
            let services = open_services(&args).await?;
            let material = services.materials().add(course_id, &draft).await?;
            println!(
                "Saved material #{} \"{}\" to course #{course_id}",
                material.id,
                material.display_title()
            );
            Ok(())
        }
        Command::Generate => {
            let notes = match (&args.text, args.course_id) {
                (Some(text), _) => text.clone(),
                (None, Some(course_id)) => {
                    let services = open_services(&args).await?;
                    services.materials().combined_notes(course_id).await?
                }
                (None, None) => {
                    return Err(ArgsError::MissingFlag {
                        flag: "--course-id or --text",
                        command: "generate",
                    }
                    .into());
                }
            };
            let generated = QuizGenerationService::from_env().generate(&notes).await?;
            println!("{}", generated.quiz);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
