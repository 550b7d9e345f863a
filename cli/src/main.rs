use clap::{Parser, Subcommand};
use lectern::model::entity::{
    Course, CourseCreate, Enrollment, EnrollmentCreate, Lecture, LectureKind, UserEntity,
    UserEntityCreate,
};
use lectern::model::{CrudRepository, ModelManager, StoreError, store::open_store};
use lectern::web::UserRole;
use lectern::web::dto::lectures::LectureCreateBody;
use lectern::{Config, progress};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the learning store", long_about = None)]
pub struct Cli {
    /// Store to write to, `memory` or a sqlite connection string.
    /// Falls back to STORAGE_URI, then to the config file.
    #[arg(long, global = true)]
    pub storage: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage lectures
    Lecture {
        #[command(subcommand)]
        action: LectureCommands,
    },

    /// Enroll a student in a course
    Enroll {
        #[arg(long)]
        student_email: String,
        #[arg(long)]
        course_title: String,
    },

    /// Print a student's standing in a course
    Progress {
        #[arg(long)]
        student_email: String,
        #[arg(long)]
        course_title: String,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// `instructor` or `student`
        #[arg(long, default_value = "student", value_parser = ["instructor", "student"])]
        role: String,
    },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        /// Email of the owning instructor
        #[arg(long)]
        instructor_email: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

/// Lecture management. Lectures are appended after the existing ones.
#[derive(Subcommand, Debug)]
pub enum LectureCommands {
    AddReading {
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        /// Path to a Markdown file with the reading content
        #[arg(long)]
        file: String,
    },
    AddQuiz {
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        /// Path to a JSON array of `{question, options, correctAnswer}`
        #[arg(long)]
        file: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("progress error: {0}")]
    Progress(#[from] progress::ProgressError),
    #[error("config error: {0}")]
    Config(#[from] lectern::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

type CliResult<T> = Result<T, CliError>;

fn storage_uri(explicit: Option<String>) -> CliResult<String> {
    if let Some(uri) = explicit {
        return Ok(uri);
    }
    if let Ok(uri) = std::env::var("STORAGE_URI") {
        return Ok(uri);
    }
    let config = Config::load(cfg!(debug_assertions))?;
    Ok(config.app().storage_uri().to_string())
}

async fn user_by_email(mm: &ModelManager, email: &str) -> CliResult<UserEntity> {
    UserEntity::find_by_email(mm, email)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("user {email}")))
}

async fn course_by_title(mm: &ModelManager, title: &str) -> CliResult<Course> {
    mm.load::<Course>()
        .await?
        .into_iter()
        .find(|c| c.title() == title)
        .ok_or_else(|| CliError::NotFound(format!("course {title}")))
}

async fn add_lecture(mm: &ModelManager, course_title: &str, body: LectureCreateBody) -> CliResult<()> {
    let course = course_by_title(mm, course_title).await?;
    let create = body.into_create(course.id()).map_err(CliError::Invalid)?;
    let lecture = Lecture::create(mm, create).await?;
    println!("Lecture #{} created: {:?}", lecture.order(), lecture);
    Ok(())
}

async fn execute(mm: &ModelManager, command: Commands) -> CliResult<()> {
    match command {
        Commands::User { action } => match action {
            UserCommands::Add { email, name, role } => {
                let user = UserEntity::create(
                    mm,
                    UserEntityCreate {
                        email,
                        name,
                        role: UserRole::from(role.as_str()),
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add { instructor_email, title, description } => {
                let instructor = user_by_email(mm, &instructor_email).await?;
                if !matches!(instructor.role(), UserRole::Instructor) {
                    return Err(CliError::Invalid(format!("{instructor_email} is not an instructor")));
                }

                let course = Course::create(
                    mm,
                    CourseCreate {
                        title,
                        description,
                        instructor_id: instructor.id(),
                        instructor_name: instructor.name().to_string(),
                    },
                )
                .await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Lecture { action } => match action {
            LectureCommands::AddReading { course_title, title, file } => {
                let content = std::fs::read_to_string(file)?;
                let body = LectureCreateBody {
                    title,
                    kind: LectureKind::Reading,
                    content: Some(content),
                    questions: None,
                };
                add_lecture(mm, &course_title, body).await?;
            }

            LectureCommands::AddQuiz { course_title, title, file } => {
                let questions = serde_json::from_str(&std::fs::read_to_string(file)?)?;
                let body = LectureCreateBody {
                    title,
                    kind: LectureKind::Quiz,
                    content: None,
                    questions: Some(questions),
                };
                add_lecture(mm, &course_title, body).await?;
            }
        },

        Commands::Enroll { student_email, course_title } => {
            let student = user_by_email(mm, &student_email).await?;
            let course = course_by_title(mm, &course_title).await?;
            let enrollment = Enrollment::create(
                mm,
                EnrollmentCreate {
                    student_id: student.id(),
                    course_id: course.id(),
                },
            )
            .await?;
            println!("Enrolled: {:?}", enrollment);
        }

        Commands::Progress { student_email, course_title } => {
            let student = user_by_email(mm, &student_email).await?;
            let course = course_by_title(mm, &course_title).await?;
            let standing = progress::course_progress(mm, student.id(), course.id()).await?;

            println!("{} ({:.0}% complete)", course.title(), standing.percentage());
            for lecture in standing.lectures() {
                let mark = match (lecture.completed, lecture.accessible) {
                    (true, _) => "done",
                    (false, true) => "open",
                    (false, false) => "locked",
                };
                let score = lecture.score.map(|s| format!(" {s}%")).unwrap_or_default();
                println!("  {:>2}. [{mark:>6}] {} ({}){score}", lecture.order, lecture.title, lecture.kind);
            }
            if standing.is_finished() {
                println!("Course finished.");
            }
        }
    }

    Ok(())
}

async fn run(args: Cli) -> CliResult<()> {
    let uri = storage_uri(args.storage)?;
    let store = open_store(&uri).await?;
    let mm = ModelManager::new(store);
    execute(&mm, args.command).await
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
