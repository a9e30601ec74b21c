use std::io::{self, BufRead, Write};

use anyhow::Context;
use bible_quiz::clients::ReqwestTransport;
use bible_quiz::{
    check_api_status, ApiEndpoint, QuestionBuilder, QuestionKind, QuizConfig, SessionState,
    Translation, VerseFetcher,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const HISTORY_PREVIEW: usize = 5;

#[derive(Parser)]
#[command(author, version, about = "Bible verse quiz with questions fetched from bible-api.com", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    BIBLE_QUIZ_API_URL             Base URL of the verse API [default: https://bible-api.com/]
    BIBLE_QUIZ_TRANSLATION         Translation code (RV1960|NVI|DHH|RVA|KJV|ESV)
    BIBLE_QUIZ_FETCH_TIMEOUT_SECS  Verse request timeout [default: 10]
    BIBLE_QUIZ_PROBE_TIMEOUT_SECS  Status check timeout [default: 5]
    RUST_LOG                       Log filter, e.g. bible_quiz=debug

COMMANDS (inside the quiz):
    n        new question          1-4      answer
    m        show the answer       s        check API status
    r        reset score
    h        history               p        progress
    t <code> switch translation    a        API information
    q        quit")]
struct Args {
    /// Translation code, overrides BIBLE_QUIZ_TRANSLATION
    #[arg(short, long)]
    translation: Option<Translation>,

    /// Base URL of the verse API, overrides BIBLE_QUIZ_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Seed the question generator for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

enum Command {
    NewQuestion,
    Answer(usize),
    Reveal,
    Status,
    Reset,
    History,
    Progress,
    Translation(String),
    Apis,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Ok(number) = line.parse::<usize>() {
            return Some(Command::Answer(number));
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        let command = match parts.next()?.to_lowercase().as_str() {
            "n" | "new" => Command::NewQuestion,
            "m" | "show" => Command::Reveal,
            "s" | "status" => Command::Status,
            "r" | "reset" => Command::Reset,
            "h" | "history" => Command::History,
            "p" | "progress" => Command::Progress,
            "t" | "translation" => Command::Translation(parts.next().unwrap_or("").trim().to_string()),
            "a" | "apis" => Command::Apis,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = QuizConfig::from_env().context("Invalid quiz configuration")?;
    if let Some(translation) = args.translation {
        config = config.with_translation(translation);
    }
    if let Some(url) = args.api_url {
        config = config.with_api_base_url(url).validate()?;
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let builder = QuestionBuilder::new(VerseFetcher::new(ReqwestTransport::new(), config.clone()));
    let mut translation = config.translation;
    let mut session = SessionState::new();

    println!("✝ Bible Quiz");
    println!("Translation: {} ({})", translation.display_name(), translation);
    println!("Type 'n' for a new question, '?' for help.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Some(Command::NewQuestion) => {
                println!("Fetching question from the API...");
                match builder.build(QuestionKind::Verse, translation, &mut rng).await {
                    Some(question) => {
                        session.set_question(question);
                        show_question(&session);
                    }
                    None => println!("❌ Could not fetch a question. Check the connection and try 'n' again."),
                }
            }
            Some(Command::Answer(number)) => answer(&mut session, number),
            Some(Command::Reveal) => reveal(&mut session),
            Some(Command::Status) => {
                let status = check_api_status(builder.fetcher().transport(), builder.fetcher().config()).await;
                session.set_api_status(status);
                for (api, status) in session.api_status() {
                    println!("{}: {}", api, status);
                }
            }
            Some(Command::Reset) => {
                session.reset();
                println!("Score reset.");
            }
            Some(Command::History) => show_history(&session),
            Some(Command::Progress) => show_progress(&session),
            Some(Command::Translation(code)) => match code.parse::<Translation>() {
                Ok(t) => {
                    translation = t;
                    println!("Translation set to {} ({})", t.display_name(), t);
                }
                Err(e) => println!("{}", e),
            },
            Some(Command::Apis) => show_apis(),
            Some(Command::Help) => print_help(),
            Some(Command::Quit) => break,
            None => println!("Unknown command. Type '?' for help."),
        }
    }

    show_progress(&session);
    Ok(())
}

fn show_question(session: &SessionState) {
    let Some(question) = session.current_question() else {
        println!("Press 'n' to get a question from the API.");
        return;
    };
    println!();
    println!("[{} | {} | {}]", question.kind, question.difficulty, question.version.display_name());
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
}

fn answer(session: &mut SessionState, number: usize) {
    if session.answer_shown() {
        println!("Already answered. Press 'n' for the next question.");
        return;
    }
    match session.submit_option(number) {
        Ok(outcome) => {
            if let Some(question) = session.current_question() {
                println!("Reference: {}", question.reference);
            }
            if outcome.correct {
                println!("✅ Correct! You identified the verse.");
            } else {
                println!("❌ Incorrect.");
                println!("Full verse: {}", outcome.correct_answer);
                println!("Explanation: {}", outcome.explanation);
            }
            println!("Score: {}/{}", session.score(), session.answered_count());
        }
        Err(e) => println!("{}", e),
    }
}

fn reveal(session: &mut SessionState) {
    if session.answer_shown() {
        println!("Already answered. Press 'n' for the next question.");
        return;
    }
    match session.reveal_answer() {
        Ok(outcome) => {
            println!("Correct verse: {}", outcome.correct_answer);
            println!("Explanation: {}", outcome.explanation);
        }
        Err(e) => println!("{}", e),
    }
}

fn show_progress(session: &SessionState) {
    println!("Score: {}/{}", session.score(), session.answered_count());
    if let Some(accuracy) = session.accuracy() {
        println!("{:.1}% correct", accuracy);
    }
    if !session.history().is_empty() {
        println!(
            "Correct: {} | Total: {}",
            session.correct_in_history(),
            session.history().len()
        );
    }
}

fn show_history(session: &SessionState) {
    if session.history().is_empty() {
        println!("No answers yet.");
        return;
    }
    for (i, entry) in session.history().iter().take(HISTORY_PREVIEW).enumerate() {
        println!("Question {}: {} - {}", i + 1, entry.prompt, entry.timestamp);
        println!("  Your answer: {}", entry.user_answer);
        println!("  {}", if entry.was_correct { "✅ Correct" } else { "❌ Incorrect" });
        println!("  Reference: {}", entry.reference);
    }
}

fn show_apis() {
    for api in ApiEndpoint::ALL {
        println!("{} ({})", api, api.url());
        println!("  {}", api.description());
        println!("  API key required: {}", if api.needs_key() { "yes" } else { "no" });
    }
}

fn print_help() {
    println!("n: new question | 1-4: answer | m: show answer | s: API status | r: reset");
    println!("h: history | p: progress | t <code>: translation | a: API info | q: quit");
    let codes: Vec<&str> = Translation::ALL.iter().map(|t| t.code()).collect();
    println!("Translations: {}", codes.join(", "));
}
