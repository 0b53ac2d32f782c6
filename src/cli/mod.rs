//! CLI module for Ekko.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Ekko - Ask a document out loud
///
/// Load a resume or other document, ask questions by voice or text, and get
/// first-person answers spoken back.
#[derive(Parser, Debug)]
#[command(name = "ekko")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask one question about a document
    Ask {
        /// Document to answer from (.pdf, .txt, .md)
        document: String,

        /// The question to ask (omit when using --audio)
        #[arg(required_unless_present = "audio", conflicts_with = "audio")]
        question: Option<String>,

        /// Recorded question (WAV) to transcribe
        #[arg(short, long)]
        audio: Option<String>,

        /// Write the spoken answer to this file
        #[arg(short, long)]
        speak: Option<String>,

        /// Number of chunks to answer from
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// LLM model to use for the answer
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show the chunks of a document most similar to a query
    Search {
        /// Document to search
        document: String,

        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show how a document is split into chunks
    Chunks {
        /// Document to chunk
        document: String,

        /// Words per chunk
        #[arg(short, long)]
        size: Option<usize>,
    },

    /// Start an interactive session over a document
    Chat {
        /// Document to answer from
        document: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check configuration and requirements
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_requires_question_or_audio() {
        assert!(Cli::try_parse_from(["ekko", "ask", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from(["ekko", "ask", "cv.pdf", "Who are you?"]).is_ok());
        assert!(Cli::try_parse_from(["ekko", "ask", "cv.pdf", "--audio", "q.wav"]).is_ok());
        assert!(
            Cli::try_parse_from(["ekko", "ask", "cv.pdf", "Who?", "--audio", "q.wav"]).is_err()
        );
    }

    #[test]
    fn test_search_top_k() {
        let cli = Cli::try_parse_from(["ekko", "search", "cv.txt", "rust", "-k", "5"]).unwrap();
        match cli.command {
            Commands::Search { top_k, .. } => assert_eq!(top_k, Some(5)),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
