use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tailor_tutor::api::{Fetched, QuestionContext, ResourceId, TutorApi, TutorClient};
use tailor_tutor::views::navigator;
use tailor_tutor::{App, Config, document};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tailor-tutor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the tutor API (overrides config and TUTOR_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available subjects
    Subjects,
    /// List the chapters of a subject
    Chapters {
        /// Subject id
        subject_id: String,
    },
    /// Show a chapter and its topics
    Chapter {
        /// Chapter id
        chapter_id: String,
    },
    /// Print the content of a topic
    Topic {
        /// Topic id
        topic_id: String,
    },
    /// Ask the tutor a question
    Ask {
        /// The question
        question: String,
        /// Chapter the question is about
        #[arg(long)]
        chapter: Option<String>,
        /// Topic the question is about
        #[arg(long)]
        topic: Option<String>,
    },
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "tailor_tutor=info".into())
}

/// Log to stderr for one-shot commands
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Log to a file while the terminal UI owns the screen
fn init_tui_logging() -> Result<()> {
    let path = Config::log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

/// Unwrap a fetch result, printing `empty` when there is nothing
fn require<T>(fetched: Fetched<T>, empty: &str) -> Result<Option<T>> {
    match fetched {
        Fetched::Data(value) => Ok(Some(value)),
        Fetched::NoData => {
            println!("{}", empty);
            Ok(None)
        }
        Fetched::Failed(e) => Err(anyhow!(e)),
    }
}

async fn run_command(api: &dyn TutorApi, command: Commands) -> Result<()> {
    match command {
        Commands::Subjects => {
            if let Some(subjects) = require(api.fetch_subjects().await, "No subjects available")? {
                for subject in subjects {
                    match &subject.grade {
                        Some(grade) => {
                            println!("{}\t{} (Grade {})", subject.id, subject.name, grade)
                        }
                        None => println!("{}\t{}", subject.id, subject.name),
                    }
                }
            }
        }
        Commands::Chapters { subject_id } => {
            let id = ResourceId::new(subject_id);
            let fetched = api.fetch_chapters(&id).await;
            if let Some(chapters) = require(fetched, "No chapters available for this subject")? {
                for (i, chapter) in chapters.iter().enumerate() {
                    println!("{:>3}. {}\t{}", i + 1, chapter.id, chapter.title);
                }
            }
        }
        Commands::Chapter { chapter_id } => {
            let id = ResourceId::new(chapter_id);
            let fetched = navigator::fetch_outline(api, &id).await;
            let Some(chapter) = require(fetched, "Chapter not found")? else {
                return Ok(());
            };
            if chapter.title.trim().is_empty() {
                println!("Chapter {}", id);
            } else {
                println!("{}", chapter.title);
            }
            if let Some(description) = &chapter.description {
                println!("{}", description);
            }
            if chapter.topics.is_empty() {
                println!("No topics available in this chapter");
            }
            for (i, topic) in chapter.topics.iter().enumerate() {
                println!("{:>3}. {}\t{}", i + 1, topic.id, topic.display_title());
            }
        }
        Commands::Topic { topic_id } => {
            let id = ResourceId::new(topic_id);
            let fetched = api.fetch_topic_content(&id).await;
            if let Some(topic) = require(fetched, "No content available for this topic")? {
                println!("{}", document::parse_topic(&topic, id.as_str()).plain_text());
            }
        }
        Commands::Ask { question, chapter, topic } => {
            if question.trim().is_empty() {
                return Err(anyhow!("Please enter a question."));
            }
            let context = (chapter.is_some() || topic.is_some()).then(|| QuestionContext {
                chapter_id: chapter.map(ResourceId::new),
                topic_id: topic.map(ResourceId::new),
            });
            let fetched = api.ask_question(question.trim(), context).await;
            if let Some(answer) = require(fetched, "No answer available")? {
                println!("{}", answer.answer);
                if !answer.sources.is_empty() {
                    println!("\nSources: {}", answer.sources.join(", "));
                }
                if !answer.related_concepts.is_empty() {
                    println!("Related: {}", answer.related_concepts.join(", "));
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    config.apply_overrides(cli.api_url.as_deref());

    match cli.command {
        Some(command) => {
            init_cli_logging();
            let client = TutorClient::new(&config.api_url)
                .with_context(|| format!("Invalid API URL {:?}", config.api_url))?;
            tracing::debug!("Using tutor API at {}", client.base_url());
            run_command(&client, command).await?;
        }
        None => {
            init_tui_logging()?;
            let mut app = App::new(config)?;
            app.run().await?;
        }
    }

    Ok(())
}
