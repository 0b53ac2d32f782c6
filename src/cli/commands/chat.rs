//! Interactive session over one document at a time.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::session::Session;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// A parsed line of input.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Empty,
    Exit,
    Help,
    Load(&'a str),
    Spoken(&'a str),
    Question(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();

    if line.is_empty() {
        return Input::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Input::Exit;
    }
    if line.eq_ignore_ascii_case("help") {
        return Input::Help;
    }
    if let Some(path) = line.strip_prefix("load ") {
        return Input::Load(path.trim());
    }
    if let Some(path) = line.strip_prefix('@') {
        return Input::Spoken(path.trim());
    }
    Input::Question(line)
}

fn print_help() {
    println!(
        "{}",
        style(
            "Type a question, '@question.wav' to ask out loud, 'load <file>' to switch documents, 'exit' to quit."
        )
        .dim()
    );
}

/// Run the interactive chat command.
pub async fn run_chat(document: &str, model: Option<String>, mut settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings)
        .and_then(|_| preflight::check_document(Path::new(document)))
    {
        Output::error(&format!("{}", e));
        Output::info("Run 'ekko doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.llm.model = model;
    }

    let spinner = Output::spinner("Loading embedding model...");
    let session = Session::new(settings).await;
    spinner.finish_and_clear();
    let mut session = session?;

    load(&mut session, document).await?;

    println!(
        "\n{} {}",
        style("Ekko").bold().cyan(),
        style(format!("- {}", session.document_name().unwrap_or(document))).dim()
    );
    print_help();
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut replies = 0usize;

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Exit => {
                Output::info("Goodbye!");
                break;
            }
            Input::Help => print_help(),
            Input::Load(path) => {
                if let Err(e) = load(&mut session, path).await {
                    Output::error(&format!("{}", e));
                }
            }
            Input::Spoken(path) => {
                replies += 1;
                if let Err(e) = spoken(&session, path, replies).await {
                    Output::error(&format!("{}", e));
                }
            }
            Input::Question(question) => {
                let spinner = Output::spinner("Thinking...");
                let answer = session.ask(question).await;
                spinner.finish_and_clear();
                match answer {
                    Ok(answer) => {
                        println!("\n{} {}\n", style("Ekko:").cyan().bold(), answer.text)
                    }
                    Err(e) => Output::error(&format!("{}", e)),
                }
            }
        }
    }

    Ok(())
}

async fn load(session: &mut Session, path: &str) -> Result<()> {
    let spinner = Output::spinner(&format!("Reading {}...", path));
    let summary = session.load_document(Path::new(path)).await;
    spinner.finish_and_clear();
    let summary = summary?;
    Output::success(&format!(
        "Processed {} chunks from {}",
        summary.chunks, summary.name
    ));
    Ok(())
}

async fn spoken(session: &Session, path: &str, n: usize) -> Result<()> {
    let recording = tokio::fs::read(path).await?;

    let spinner = Output::spinner("Listening and thinking...");
    let turn = session.ask_spoken(&recording).await;
    spinner.finish_and_clear();
    let turn = turn?;

    println!("{} {}", style("You said:").bold(), turn.answer.question);
    println!("\n{} {}\n", style("Ekko:").cyan().bold(), turn.answer.text);

    let target = session
        .settings()
        .output_dir()
        .join(format!("answer-{}.{}", n, turn.reply.extension()));
    turn.reply.save(&target).await?;
    println!("{}", style(format!("  spoken answer: {}", target.display())).dim());
    Ok(())
}
