//! pdf-chapters - list PDF bookmarks and split a PDF into chapter files

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pdf_chapters::{extract_outline, split_by_outline, SplitOptions};

#[derive(Parser)]
#[command(name = "pdf-chapters")]
#[command(version, about = "Split PDFs into chapters by their outline", long_about = None)]
#[command(after_help = "EXAMPLES:
    pdf-chapters outline book.pdf             List bookmarks
    pdf-chapters outline book.pdf --json      List bookmarks as JSON
    pdf-chapters split book.pdf               One PDF per top-level bookmark
    pdf-chapters split book.pdf --level 2     One PDF per second-level bookmark

Set RUST_LOG=debug for detailed logging.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the document outline
    Outline {
        /// Input PDF
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print bookmarks as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Split the document into a zip of chapter PDFs
    Split {
        /// Input PDF
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// One-based outline level to split at
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        level: i64,

        /// Archive path (defaults to the suggested archive name)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Directory to write the archive into
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Copy document metadata into each chapter (reserved)
        #[arg(long)]
        include_metadata: bool,

        /// Allow pages to appear in more than one chapter (reserved)
        #[arg(long)]
        allow_duplicates: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Outline { input, json } => show_outline(&input, json),
        Command::Split {
            input,
            level,
            output,
            output_dir,
            include_metadata,
            allow_duplicates,
        } => {
            let options = SplitOptions::new()
                .with_bookmark_level(level)
                .with_include_metadata(include_metadata)
                .with_allow_duplicates(allow_duplicates);
            split(&input, options, output, output_dir)
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn show_outline(input: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let bytes = std::fs::read(input)?;
    let bookmarks = extract_outline(&bytes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bookmarks)?);
        return Ok(());
    }

    if bookmarks.is_empty() {
        println!("No outline found in {}", input.display());
        return Ok(());
    }

    for bookmark in &bookmarks {
        let page = match bookmark.page_number {
            Some(page) => page.to_string(),
            None => "?".to_string(),
        };
        println!("{}{} (page {})", "  ".repeat(bookmark.level), bookmark.title, page);
    }
    Ok(())
}

fn split(
    input: &Path,
    options: SplitOptions,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let bytes = std::fs::read(input)?;
    let options = match input.file_name() {
        Some(name) => options.with_source_name(name.to_string_lossy()),
        None => options,
    };

    let outcome = split_by_outline(&bytes, &options)?;

    let path = match (output, output_dir) {
        (Some(path), _) => path,
        (None, Some(dir)) => dir.join(&outcome.archive_name),
        (None, None) => PathBuf::from(&outcome.archive_name),
    };
    std::fs::write(&path, &outcome.archive)?;

    match outcome.empty_reason {
        Some(reason) => println!("No chapters written ({reason}): {}", path.display()),
        None => {
            for chapter in &outcome.chapters {
                println!(
                    "{} (pages {}-{})",
                    chapter.file_name(),
                    chapter.start_page + 1,
                    chapter.end_page + 1
                );
            }
            println!("Wrote {} chapters to {}", outcome.chapters.len(), path.display());
        },
    }
    Ok(())
}
