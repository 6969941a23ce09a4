use std::path::PathBuf;

use clap::Parser;
use picture_quiz::{
    load_questions_from_json, logging, HandoffStore, QuestionBank, Quiz, QuizConfig, QuizError,
    DEFAULT_PRACTICE_SIZE,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the question bank from
    #[arg(short, long, required_unless_present = "resume")]
    questions: Option<PathBuf>,

    /// Run every question of this category instead of a practice draw
    #[arg(short, long)]
    category: Option<String>,

    /// Seconds allowed per question; untimed when omitted
    #[arg(short, long)]
    time_limit: Option<u32>,

    /// Largest number of questions in a practice draw
    #[arg(long, default_value_t = DEFAULT_PRACTICE_SIZE)]
    practice_size: usize,

    /// Directory holding the session and results files
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Resume the session saved in --state-dir
    #[arg(long, requires = "state_dir", conflicts_with = "category")]
    resume: bool,

    /// Print the categories of the question bank and exit
    #[arg(long)]
    list_categories: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_file.as_deref()) {
        eprintln!("Error opening log file: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let config = QuizConfig {
        time_limit: args.time_limit,
        practice_size: args.practice_size,
        state_dir: args.state_dir,
    };
    config.validate()?;
    let store = HandoffStore::for_dir(config.state_dir.as_deref());

    if args.resume {
        return Quiz::resume(config, store)?.run().await;
    }

    let path = args.questions.ok_or(QuizError::NoQuestionBank)?;
    let bank = QuestionBank::new(load_questions_from_json(path)?);

    if args.list_categories {
        for category in bank.categories() {
            println!("{}", category);
        }
        return Ok(());
    }

    let quiz = match args.category.as_deref() {
        Some(label) => Quiz::category(&bank, label, config, store)?,
        None => Quiz::practice(&bank, config, store)?,
    };
    quiz.run().await
}
