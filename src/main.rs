use ask_page::answer::OpenAiAnswerSource;
use ask_page::config::AppConfig;
use ask_page::fetch::WebDriverFetcher;
use ask_page::history::SessionHistory;
use ask_page::{Pipeline, PipelineError, QueryOutcome};
use clap::Parser;
use std::io::{self, BufRead, Write};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging and .env configuration
    env_logger::init();
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, starting from defaults
    let mut config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config from {}: {}", path.display(), e);
                return;
            }
        },
        None => AppConfig::default(),
    };
    apply_overrides(&args, &mut config);

    println!("Note: fetching requires a WebDriver server (e.g. ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL or pass --webdriver-url if not using the default {}",
        config.fetcher.webdriver_url
    );

    // The API key is resolved once at startup; a missing key is a
    // misconfiguration, not something to discover mid-query
    let source = match OpenAiAnswerSource::from_env(config.answer.clone()) {
        Ok(source) => source,
        Err(e) => {
            ::log::error!("Cannot start: {}", e);
            return;
        }
    };

    let fetcher = WebDriverFetcher::new(config.fetcher.clone());
    let pipeline = Pipeline::new(Box::new(fetcher), Box::new(source))
        .with_max_chunk_chars(config.max_chunk_chars);

    if args.interactive {
        run_interactive(&pipeline, &args).await;
    } else {
        match (&args.url, &args.question) {
            (Some(url), Some(question)) => {
                run_query(&pipeline, url, question, &args).await;
            }
            _ => {
                ::log::error!("A URL and a question are required unless --interactive is set");
            }
        }
    }
}

/// Applies command-line and environment overrides on top of the loaded
/// configuration
fn apply_overrides(args: &Args, config: &mut AppConfig) {
    if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
        if !webdriver_url.is_empty() {
            config.fetcher.webdriver_url = webdriver_url;
        }
    }
    if let Some(webdriver_url) = &args.webdriver_url {
        config.fetcher.webdriver_url = webdriver_url.clone();
    }
    if let Some(max_chunk_chars) = args.max_chunk_chars {
        config.max_chunk_chars = max_chunk_chars;
    }
    if let Some(model) = &args.model {
        config.answer.model = model.clone();
    }
    if let Some(screenshot) = &args.screenshot {
        config.fetcher.screenshot_path = screenshot.clone();
    }
}

/// Runs a single query and prints the outcome
async fn run_query(pipeline: &Pipeline, url: &str, question: &str, args: &Args) -> Option<QueryOutcome> {
    match pipeline.run(url, question).await {
        Ok(outcome) => {
            print_outcome(&outcome, args);
            Some(outcome)
        }
        Err(PipelineError::Fetch { reason, log }) => {
            print_log(&log);
            ::log::error!("Scraping failed: {}", reason);
            None
        }
        Err(e) => {
            ::log::error!("{}", e);
            None
        }
    }
}

fn print_log(log: &[String]) {
    println!("== Fetch log ==");
    for line in log {
        println!("{}", line);
    }
}

fn print_outcome(outcome: &QueryOutcome, args: &Args) {
    print_log(&outcome.log);

    if args.show_html {
        println!("== Raw HTML ==");
        println!("{}", outcome.raw_html);
    }

    if args.show_text {
        println!("== Cleaned text ==");
        println!("{}", outcome.cleaned_text);
    }

    println!("== Answer ==");
    if outcome.found_answer() {
        println!("{}", outcome.answer);
    } else {
        println!("(no relevant information found)");
    }

    if !outcome.failures.is_empty() {
        println!("Some chunks could not be processed:");
        for failure in &outcome.failures {
            println!("  chunk {}: {}", failure.chunk_index + 1, failure.reason);
        }
    }

    if let Some(path) = &outcome.screenshot {
        println!("Screenshot saved to {}", path.display());
    }
}

/// Prompt-and-answer loop with an in-memory chat history.
///
/// The history lives for this process invocation only; each invocation
/// is its own session.
async fn run_interactive(pipeline: &Pipeline, args: &Args) {
    let mut history = SessionHistory::new();

    println!("Interactive mode. Commands: :history, :show <id>, :quit");

    loop {
        let Some(input) = prompt("url> ") else { break };
        let input = input.trim().to_string();

        if input.is_empty() {
            continue;
        }
        match parse_command(&input) {
            Some(Command::Quit) => break,
            Some(Command::History) => {
                print_history(&history);
                continue;
            }
            Some(Command::Show(Some(id))) => {
                show_record(&history, id);
                continue;
            }
            Some(Command::Show(None)) => {
                println!("Usage: :show <id>");
                continue;
            }
            None => {}
        }

        let Some(question) = prompt("question> ") else { break };
        let question = question.trim().to_string();
        if question.is_empty() {
            println!("Please enter a question.");
            continue;
        }

        let id = history.new_chat(&input, &question);
        if let Some(outcome) = run_query(pipeline, &input, &question, args).await {
            history.record_answer(id, &outcome.answer, &outcome.cleaned_text);
        }
    }
}

/// Commands recognized at the url prompt
#[derive(Debug, PartialEq)]
enum Command {
    Quit,
    History,
    /// `:show <id>`; None when the id is missing or not a number
    Show(Option<u64>),
}

/// Recognizes a `:command` line; anything else is treated as a URL
fn parse_command(input: &str) -> Option<Command> {
    match input {
        ":quit" => Some(Command::Quit),
        ":history" => Some(Command::History),
        _ => input.strip_prefix(":show").and_then(|rest| {
            if rest.is_empty() {
                // A bare `:show` is still the command, just missing its id
                Some(Command::Show(None))
            } else if rest.starts_with(char::is_whitespace) {
                Some(Command::Show(rest.trim().parse().ok()))
            } else {
                None
            }
        }),
    }
}

/// Reads one line from stdin, returning None on EOF
fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => {
            ::log::error!("Failed to read input: {}", e);
            None
        }
    }
}

fn print_history(history: &SessionHistory) {
    if history.is_empty() {
        println!("(no chats yet)");
        return;
    }
    for record in history.iter() {
        let preview = match &record.answer {
            Some(answer) if !answer.is_empty() => answer.lines().next().unwrap_or(""),
            Some(_) => "(no relevant information found)",
            None => "(no answer)",
        };
        println!(
            "[{}] {} | {} | {}: {}",
            record.id, record.label, record.url, record.question, preview
        );
    }
}

fn show_record(history: &SessionHistory, id: u64) {
    match history.get(id) {
        Some(record) => {
            println!("{} | {}", record.label, record.url);
            println!("Q: {}", record.question);
            match &record.answer {
                Some(answer) if !answer.is_empty() => println!("A: {}", answer),
                Some(_) => println!("A: (no relevant information found)"),
                None => println!("A: (no answer recorded)"),
            }
        }
        None => println!("No chat with id {}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_recognizes_commands() {
        assert_eq!(parse_command(":quit"), Some(Command::Quit));
        assert_eq!(parse_command(":history"), Some(Command::History));
        assert_eq!(parse_command(":show 2"), Some(Command::Show(Some(2))));
    }

    #[test]
    fn test_bare_show_is_a_command_not_a_url() {
        // A missing id asks for the usage hint instead of falling
        // through to URL handling
        assert_eq!(parse_command(":show"), Some(Command::Show(None)));
        assert_eq!(parse_command(":show nonsense"), Some(Command::Show(None)));
    }

    #[test]
    fn test_non_commands_fall_through() {
        assert_eq!(parse_command("https://example.com"), None);
        assert_eq!(parse_command(":showcase"), None);
    }
}
