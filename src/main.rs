use clap::Parser;
use log::debug;
use richnote::clipboard::MemoryClipboard;
use richnote::config::RcLoader;
use richnote::controller::MAX_IMPORT_BYTES;
use richnote::document_model::TextStats;
use richnote::error::Result;
use richnote::serializer::{self, NotePreview};
use richnote::{EditorError, EditorSession, logging};
use std::fs;
use std::path::Path;

mod args;
use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else {
        logging::default_log_level()
    };
    if let Err(e) = logging::init_logging(level) {
        eprintln!("{e}");
    }

    if let Err(e) = run(cli.command) {
        eprintln!("richnote: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Preview { file } => {
            let preview = NotePreview::from_content(&fs::read_to_string(file)?);
            if preview.truncated {
                println!("{}...", preview.text);
            } else {
                println!("{}", preview.text);
            }
        }
        Commands::Text { file } => {
            println!("{}", serializer::plain_text_preview(&fs::read_to_string(file)?));
        }
        Commands::Stats { file } => {
            let document = serializer::deserialize(&fs::read_to_string(file)?);
            let stats = TextStats::of(&document.text());
            println!(
                "lines: {}\nwords: {}\ncharacters: {}",
                stats.lines, stats.words, stats.chars
            );
        }
        Commands::Import { file, output } => {
            let config = RcLoader::load_config();
            debug!("Importing {} with {config:?}", file.display());
            let mut session = EditorSession::new(config, Box::new(MemoryClipboard::new()));
            if !session.import_file(&file)? {
                return Err(EditorError::Io(format!(
                    "{} is not a readable file under {MAX_IMPORT_BYTES} bytes",
                    file.display()
                )));
            }
            emit(&session.content(), output.as_deref())?;
        }
        Commands::Normalize { file, output } => {
            let document = serializer::deserialize(&fs::read_to_string(file)?);
            emit(&serializer::serialize(&document), output.as_deref())?;
        }
        Commands::SampleRc => print!("{}", RcLoader::generate_sample_rc()),
    }
    Ok(())
}

fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, content)?,
        None => print!("{content}"),
    }
    Ok(())
}
