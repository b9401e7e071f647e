use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "richnote")]
#[command(about = "Inspect and convert rich-text notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the list preview of a note
    Preview {
        /// Stored note content
        file: PathBuf,
    },

    /// Print the plain text of a note
    Text { file: PathBuf },

    /// Print line, word and character counts
    Stats { file: PathBuf },

    /// Convert a plain text file into a structured note
    Import {
        /// Plain text input
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-save a note, upgrading legacy plain text
    Normalize {
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a sample .richnoterc
    SampleRc,
}
