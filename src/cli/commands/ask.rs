//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::session::Session;
use crate::voice::SynthesizedAudio;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Run the ask command.
pub async fn run_ask(
    document: &str,
    question: Option<&str>,
    audio: Option<&str>,
    speak: Option<&str>,
    top_k: Option<usize>,
    model: Option<String>,
    mut settings: Settings,
) -> Result<()> {
    let document = Path::new(document);

    if let Err(e) = preflight::check(Operation::Ask, &settings)
        .and_then(|_| preflight::check_document(document))
    {
        Output::error(&format!("{}", e));
        Output::info("Run 'ekko doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.llm.model = model;
    }
    let k = top_k.unwrap_or(settings.retrieval.top_k);

    let spinner = Output::spinner("Loading embedding model...");
    let session = Session::new(settings).await;
    spinner.finish_and_clear();
    let mut session = session?;

    let spinner = Output::spinner(&format!("Reading {}...", document.display()));
    let summary = session.load_document(document).await;
    spinner.finish_and_clear();
    let summary = summary?;
    Output::success(&format!(
        "Processed {} chunks from {}",
        summary.chunks, summary.name
    ));

    match (question, audio) {
        (_, Some(audio_path)) => {
            let recording = tokio::fs::read(audio_path).await?;

            let spinner = Output::spinner("Listening and thinking...");
            let turn = session.ask_spoken_top_k(&recording, k).await;
            spinner.finish_and_clear();

            let turn = match turn {
                Ok(turn) => turn,
                Err(e) => {
                    Output::error(&format!("{}", e));
                    return Err(e.into());
                }
            };

            Output::answer(
                Some(turn.answer.question.as_str()),
                &turn.answer.format_for_display(),
            );
            let target = reply_path(speak, &session, &turn.reply);
            save_reply(&turn.reply, &target).await?;
        }
        (Some(question), None) => {
            let spinner = Output::spinner("Thinking...");
            let answer = session.ask_top_k(question, k).await;
            spinner.finish_and_clear();

            let answer = match answer {
                Ok(answer) => answer,
                Err(e) => {
                    Output::error(&format!("Failed to generate answer: {}", e));
                    return Err(e.into());
                }
            };

            Output::answer(None, &answer.format_for_display());

            if speak.is_some() {
                let spinner = Output::spinner("Synthesizing speech...");
                let reply = session.speak(&answer.text).await;
                spinner.finish_and_clear();
                let reply = reply?;
                let target = reply_path(speak, &session, &reply);
                save_reply(&reply, &target).await?;
            }
        }
        (None, None) => {
            anyhow::bail!("provide a question or --audio");
        }
    }

    Ok(())
}

/// Where a spoken answer goes: the requested path, else the output directory.
fn reply_path(requested: Option<&str>, session: &Session, reply: &SynthesizedAudio) -> PathBuf {
    match requested {
        Some(path) => PathBuf::from(path),
        None => session
            .settings()
            .output_dir()
            .join(format!("answer.{}", reply.extension())),
    }
}

async fn save_reply(reply: &SynthesizedAudio, target: &Path) -> Result<()> {
    reply.save(target).await?;
    Output::success(&format!("Spoken answer saved to {}", target.display()));
    Ok(())
}
