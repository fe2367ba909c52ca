// ABOUTME: Interactive menu for downloading the Bible corpus, verifying it and scraping the Q&A site.
// ABOUTME: Flags only tune pacing and paths; every run is chosen from the numbered menu on stdin.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use bibel_harvest::books::{books_in, resolve_books};
use bibel_harvest::qna::{render_preview, save_outputs};
use bibel_harvest::store::{report_path, save_json};
use bibel_harvest::{
    generate_verification_report, Client, DownloadPlan, DownloadSummary, Downloader, QnaScraper,
    Testament, SAMPLE_BOOKS,
};
use clap::Parser;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

const FULL_OUTPUT: &str = "svenska_reformationsbibeln_srb16.json";
const NEW_TESTAMENT_OUTPUT: &str = "srb16_new_testament.json";
const OLD_TESTAMENT_OUTPUT: &str = "srb16_old_testament.json";
const SAMPLE_OUTPUT: &str = "srb16_sample.json";
const DEBUG_SAMPLE_OUTPUT: &str = "srb16_debug_sample.json";

#[derive(Parser, Debug)]
#[command(name = "bibel-cli")]
#[command(about = "Download Svenska Reformationsbibeln, verify the corpus and scrape bibel.se Q&A")]
struct Args {
    /// Directory for corpus, report and Q&A files
    #[arg(long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Delay between chapter requests in milliseconds
    #[arg(long = "delay-ms")]
    delay_ms: Option<u64>,

    /// Attempts per chapter before giving up
    #[arg(long = "retries")]
    retries: Option<u32>,

    /// Request timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = 30)]
    timeout_secs: u64,

    /// Continue from the temp file of an interrupted download
    #[arg(long = "resume")]
    resume: bool,

    /// Base URL of the chapter service
    #[arg(long = "bible-base-url", hide = true)]
    bible_base_url: Option<String>,

    /// Base URL of the Q&A site
    #[arg(long = "qna-base-url", hide = true)]
    qna_base_url: Option<String>,
}

/// One run picked from the menu.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Download { plan: DownloadPlan, debug: bool },
    Verify(PathBuf),
    Qna { max_questions: Option<usize>, preview: bool },
}

/// Line-oriented prompts over any reader. `None` means input ended.
struct Console<R> {
    input: R,
}

impl<R: BufRead> Console<R> {
    fn new(input: R) -> Self {
        Self { input }
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Option<bool> {
        let answer = self.ask(prompt)?;
        Some(matches!(answer.to_lowercase().as_str(), "y" | "yes" | "j" | "ja"))
    }
}

fn print_banner() {
    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("Svenska Reformationsbibeln (SRB16) - nedladdning och verifiering");
    println!("{}", rule);
}

fn print_menu() {
    println!();
    println!("Choose an option:");
    println!("  1. Download the whole Bible");
    println!("  2. Download one testament");
    println!("  3. Download sample books ({})", SAMPLE_BOOKS.join(", "));
    println!("  4. Download sample books with parser diagnostics");
    println!("  5. Verify an existing JSON file");
    println!("  6. Scrape bibel.se questions and answers");
}

fn choose_testament<R: BufRead>(console: &mut Console<R>) -> Option<Testament> {
    loop {
        let answer = console.ask("Testament - (N)ew or (O)ld: ")?;
        match answer.to_lowercase().as_str() {
            "n" | "new" | "nt" => return Some(Testament::New),
            "o" | "old" | "ot" => return Some(Testament::Old),
            _ => println!("Invalid choice. Enter N or O."),
        }
    }
}

fn choose_question_count<R: BufRead>(console: &mut Console<R>) -> Option<Option<usize>> {
    loop {
        let answer = console.ask("Number of questions (Enter for all): ")?;
        if answer.is_empty() {
            return Some(None);
        }
        match answer.parse::<usize>() {
            Ok(n) if n > 0 => return Some(Some(n)),
            _ => println!("Invalid number. Enter a positive number or press Enter."),
        }
    }
}

/// Show the menu until a valid choice is made.
fn choose_action<R: BufRead>(console: &mut Console<R>, output_dir: &Path) -> Option<Action> {
    loop {
        print_menu();
        let choice = console.ask("Choice (1-6): ")?;
        let action = match choice.as_str() {
            "1" => Action::Download {
                plan: DownloadPlan::all(output_dir.join(FULL_OUTPUT)),
                debug: false,
            },
            "2" => {
                let testament = choose_testament(console)?;
                println!("Downloading the {}.", testament);
                let file = match testament {
                    Testament::New => NEW_TESTAMENT_OUTPUT,
                    Testament::Old => OLD_TESTAMENT_OUTPUT,
                };
                Action::Download {
                    plan: DownloadPlan::new(books_in(testament), output_dir.join(file)),
                    debug: false,
                }
            }
            "3" => Action::Download {
                plan: DownloadPlan::new(resolve_books(SAMPLE_BOOKS), output_dir.join(SAMPLE_OUTPUT)),
                debug: false,
            },
            "4" => Action::Download {
                plan: DownloadPlan::new(
                    resolve_books(SAMPLE_BOOKS),
                    output_dir.join(DEBUG_SAMPLE_OUTPUT),
                ),
                debug: true,
            },
            "5" => {
                let default = output_dir.join(FULL_OUTPUT);
                let answer = console.ask(&format!("JSON file to verify [{}]: ", default.display()))?;
                let path = if answer.is_empty() {
                    default
                } else {
                    PathBuf::from(answer)
                };
                Action::Verify(path)
            }
            "6" => {
                let max_questions = choose_question_count(console)?;
                let preview = console.ask_yes_no("Show a preview of the first answer? (y/n): ")?;
                Action::Qna {
                    max_questions,
                    preview,
                }
            }
            _ => {
                println!("Invalid choice. Enter a number between 1 and 6.");
                continue;
            }
        };
        return Some(action);
    }
}

fn build_client(args: &Args, debug: bool) -> Client {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .resume(args.resume)
        .debug(debug);
    if let Some(ms) = args.delay_ms {
        builder = builder.request_delay(Duration::from_millis(ms));
    }
    if let Some(retries) = args.retries {
        builder = builder.retry_attempts(retries);
    }
    if let Some(url) = &args.bible_base_url {
        builder = builder.bible_base_url(url.clone());
    }
    if let Some(url) = &args.qna_base_url {
        builder = builder.qna_base_url(url.clone());
    }
    builder.build()
}

fn print_download_summary(summary: &DownloadSummary) {
    println!();
    println!("{}", summary.report.render());
    println!();
    println!(
        "Downloaded {} books ({} resumed): {} chapters, {} verses",
        summary.books_downloaded, summary.books_resumed, summary.chapters, summary.verses
    );
    if !summary.failed_chapters.is_empty() {
        println!(
            "Chapters without verses ({}): {}",
            summary.failed_chapters.len(),
            summary.failed_chapters.join(", ")
        );
    }
    println!("Corpus saved to {}", summary.output.display());
    if let Some(report) = &summary.report_path {
        println!("Report saved to {}", report.display());
    }
}

fn verify_file(path: &Path) -> Result<bool> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let report = generate_verification_report(&data);
    println!("{}", report.render());

    let report_file = report_path(path);
    save_json(&report_file, &report)?;
    println!("Report saved to {}", report_file.display());
    Ok(report.is_acceptable())
}

async fn run(action: Action, args: &Args) -> Result<bool> {
    match action {
        Action::Download { plan, debug } => {
            let client = build_client(args, debug);
            let summary = Downloader::new(&client).download(&plan).await?;
            print_download_summary(&summary);
            Ok(summary.verses > 0)
        }
        Action::Verify(path) => verify_file(&path),
        Action::Qna {
            max_questions,
            preview,
        } => {
            let client = build_client(args, false);
            let entries = QnaScraper::new(&client).scrape_all(max_questions).await?;
            let extracted = entries.iter().filter(|e| e.is_extracted()).count();

            if preview {
                if let Some(first) = entries.iter().find(|e| e.is_extracted()) {
                    println!("{}", render_preview(first));
                }
            }

            let outputs = save_outputs(&entries, &args.output_dir)?;
            println!(
                "Extracted {} of {} questions",
                extracted,
                entries.len()
            );
            println!("JSON saved to {}", outputs.json.display());
            println!("Markdown saved to {}", outputs.markdown.display());
            Ok(extracted > 0)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Run the menu on its own thread so a pending prompt never blocks the
/// interrupt handler. A plain thread is used because the runtime would wait
/// for a blocking task stuck on stdin at shutdown.
fn spawn_menu(output_dir: PathBuf) -> oneshot::Receiver<Option<Action>> {
    let (tx, rx) = oneshot::channel();
    thread::spawn(move || {
        let mut console = Console::new(io::stdin().lock());
        let _ = tx.send(choose_action(&mut console, &output_dir));
    });
    rx
}

fn interrupted() -> ExitCode {
    println!();
    println!("Operation interrupted by user.");
    ExitCode::from(1)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();
    print_banner();

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let chosen = tokio::select! {
        biased;
        _ = &mut interrupt => return interrupted(),
        chosen = spawn_menu(args.output_dir.clone()) => chosen.ok().flatten(),
    };
    let Some(action) = chosen else {
        eprintln!("error: no choice made before input ended");
        return ExitCode::from(1);
    };

    tokio::select! {
        biased;
        _ = &mut interrupt => interrupted(),
        outcome = run(action, &args) => match outcome {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(1),
            Err(e) => {
                eprintln!("error: {:#}", e);
                ExitCode::from(1)
            }
        },
    }
}
