//! Terminal front end: index one document, then answer questions about it
//!
//! Run with: cargo run -p doc-qa --bin doc-qa -- report.pdf -q "What is this about?"

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doc_qa::{AppConfig, AskOutcome, Document, DocumentAssistant, Session, Severity};

#[derive(Parser, Debug)]
#[command(name = "doc-qa", version, about = "Ask questions about a PDF, DOCX or TXT file")]
struct Args {
    /// Document to index
    file: PathBuf,

    /// Question to ask; repeat for several. Without any, questions are read from stdin
    #[arg(short = 'q', long = "question")]
    questions: Vec<String>,

    /// Save the chat transcript to this file when done
    #[arg(long)]
    export: Option<PathBuf>,

    /// Save the rendered first page of a PDF to this PNG file
    #[arg(long)]
    save_preview: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_qa=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    let assistant = DocumentAssistant::from_config(&config)?;

    if !assistant.health_check().await {
        eprintln!(
            "{} Ollama not reachable at {} (models: {}, {})",
            style("warning:").yellow().bold(),
            config.llm.base_url,
            config.llm.model,
            config.embeddings.model
        );
    }

    let mut session = Session::new();

    let document = match Document::open(&args.file) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{}", style(e.status_message()).yellow());
            std::process::exit(1);
        }
    };

    let pb = spinner(&format!("Indexing {}", document.filename));
    let uploaded = assistant.upload(&mut session, document).await;
    pb.finish_and_clear();

    let outcome = match uploaded {
        Ok(outcome) => outcome,
        Err(e) if e.severity() == Severity::Warning => {
            eprintln!("{}", style(e.status_message()).yellow());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", style(&outcome.status).green().bold());
    println!(
        "{} {} ({}, {} chunks)",
        style("Document:").bold(),
        outcome.document.filename,
        outcome.document.file_type.display_name(),
        outcome.document.total_chunks
    );

    if let Some(png) = &outcome.preview.image_png {
        match &args.save_preview {
            Some(path) => {
                std::fs::write(path, png)?;
                println!("{} first page saved to {}", style("Preview:").bold(), path.display());
            }
            None => println!("{} first page rendered ({} bytes PNG)", style("Preview:").bold(), png.len()),
        }
    }
    if let Some(text) = &outcome.preview.text {
        println!("{}\n{}", style("Preview:").bold(), style(text.trim_end()).dim());
    }

    println!("\n{}\n{}\n", style("📄 Summary").cyan().bold(), outcome.summary);

    if args.questions.is_empty() {
        println!("{}", style("Ask a question (empty line to finish):").dim());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let question = line.trim();
            if question.is_empty() {
                break;
            }
            ask(&assistant, &mut session, question).await?;
        }
    } else {
        for question in &args.questions {
            ask(&assistant, &mut session, question).await?;
        }
    }

    if let Some(path) = &args.export {
        let saved = assistant.export(&session)?.persist(path)?;
        println!("{} {}", style("Transcript saved to").green(), saved.display());
    }

    Ok(())
}

async fn ask(
    assistant: &DocumentAssistant,
    session: &mut Session,
    question: &str,
) -> anyhow::Result<()> {
    let pb = spinner("Thinking...");
    let outcome = assistant.ask(session, question).await;
    pb.finish_and_clear();

    let outcome = outcome?;
    println!("{} {}", style("Q:").cyan().bold(), question);
    match &outcome {
        AskOutcome::Answered { turn, sources } => {
            println!("{} {}", style("A:").green().bold(), turn.answer);
            let indices: Vec<String> = sources.iter().map(|s| s.chunk.index.to_string()).collect();
            println!("{}\n", style(format!("   sources: chunks {}", indices.join(", "))).dim());
        }
        AskOutcome::Warning { turn } => println!("{}\n", style(&turn.answer).yellow()),
    }
    Ok(())
}
