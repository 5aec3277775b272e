use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ask-page")]
#[command(about = "Fetches a web page through a remote browser and answers a question about it")]
#[command(version)]
pub struct Args {
    /// URL of the page to query (required unless --interactive)
    pub url: Option<String>,

    /// Question to answer from the page text (required unless --interactive)
    pub question: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prompt for URLs and questions in a loop, keeping a chat history
    #[arg(short, long)]
    pub interactive: bool,

    /// Override the WebDriver URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Override the maximum characters per chunk
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_chunk_chars: Option<usize>,

    /// Override the language model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Override the screenshot output path
    #[arg(long)]
    pub screenshot: Option<PathBuf>,

    /// Print the cleaned page text with the answer
    #[arg(long)]
    pub show_text: bool,

    /// Print the raw page HTML with the answer
    #[arg(long)]
    pub show_html: bool,
}
