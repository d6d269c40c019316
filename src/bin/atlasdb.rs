//! AtlasDB Shell Binary
//!
//! Interactive prompt over a single database file.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use atlasdb::command::{constants_report, Input, MetaCommand, Statement};
use atlasdb::config::TABLE_MAX_PAGES;
use atlasdb::{Config, Engine};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

const PROMPT: &str = ">>> ";

/// AtlasDB Shell
#[derive(Parser, Debug)]
#[command(name = "atlasdb")]
#[command(about = "Single-table B+tree database")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(default_value = "atlas.db")]
    db_file: PathBuf,

    /// Maximum number of pages in the file
    #[arg(long, default_value_t = TABLE_MAX_PAGES)]
    max_pages: u32,

    /// Page cache capacity (defaults to the page budget)
    #[arg(long)]
    cache_pages: Option<usize>,
}

fn main() {
    // Logs go to stderr so they never interleave with query output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,atlasdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("AtlasDB v{}", atlasdb::VERSION);

    let config = Config::builder()
        .path(&args.db_file)
        .max_pages(args.max_pages)
        .cache_capacity(args.cache_pages.unwrap_or(args.max_pages as usize))
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open {}: {}", args.db_file.display(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&engine) {
        tracing::error!("Shell error: {}", e);
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close database: {}", e);
        std::process::exit(1);
    }
}

/// Read-eval-print loop; returns on `.exit` or end of input
fn run(engine: &Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            writeln!(stdout)?;
            return Ok(());
        };
        let line = line?;

        match Input::parse(&line) {
            Ok(Input::Empty) => {}
            Ok(Input::Meta(MetaCommand::Exit)) => return Ok(()),
            Ok(Input::Meta(MetaCommand::Btree)) => match engine.describe() {
                Ok(tree) => {
                    writeln!(stdout, "Tree:")?;
                    write!(stdout, "{}", tree)?;
                }
                Err(e) => writeln!(stdout, "Error: {}", e)?,
            },
            Ok(Input::Meta(MetaCommand::Constants)) => {
                writeln!(stdout, "Constants:")?;
                write!(stdout, "{}", constants_report())?;
            }
            Ok(Input::Statement(statement)) => execute(engine, statement, &mut stdout)?,
            Err(e) => writeln!(stdout, "Error: {}", e)?,
        }
    }
}

fn execute(engine: &Engine, statement: Statement, out: &mut impl Write) -> io::Result<()> {
    match engine.execute(statement) {
        Ok(rows) => {
            for row in rows.unwrap_or_default() {
                writeln!(out, "{}", row)?;
            }
            writeln!(out, "Executed.")
        }
        Err(e) => writeln!(out, "Error: {}", e),
    }
}
