// commandpro: parse CommandPro automation scripts into a JSON AST

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};

use commandpro::parser::{tokenize, ParseOptions, Parser};
use commandpro::serializer;
use commandpro::ui::App;

/// Parse a CommandPro script and print its AST as JSON
#[derive(ClapParser, Debug)]
#[command(name = "commandpro", version, about)]
struct Cli {
    /// Script to parse
    file: PathBuf,

    /// Print the token stream instead of the AST
    #[arg(long)]
    tokens: bool,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Write the JSON AST to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Open the interactive inspector
    #[arg(long)]
    tui: bool,

    /// Report identifiers and calls that do not resolve to a declaration
    #[arg(long)]
    resolve_names: bool,

    /// Report calls whose argument count differs from the definition
    #[arg(long)]
    check_arity: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.file.exists() {
        eprintln!("Error: File '{}' not found", cli.file.display());
        eprintln!("Usage: commandpro <script> [--pretty] [--tokens] [--tui]");
        std::process::exit(1);
    }

    let source = fs::read_to_string(&cli.file)?;
    let options = ParseOptions {
        resolve_names: cli.resolve_names,
        check_arity: cli.check_arity,
    };

    if cli.tui {
        return run_inspector(source, options);
    }

    info!("parsing {}", cli.file.display());
    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.tokens {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for token in &tokens {
            writeln!(
                out,
                "{:>4}  {:<8} {}",
                token.line,
                token.kind.as_str(),
                token.value.as_deref().unwrap_or("")
            )?;
        }
        return Ok(());
    }

    let program = match Parser::with_options(tokens, options).parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };
    info!("parsed {} top-level statements", program.statements().len());

    match &cli.output {
        Some(path) => {
            let file = fs::File::create(path)?;
            serializer::write_json(io::BufWriter::new(file), &program, cli.pretty)?;
            info!("wrote AST to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serializer::write_json(&mut out, &program, cli.pretty)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Open the inspector over `source`, even if it fails to parse.
fn run_inspector(source: String, options: ParseOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::load(source, options);
    if app.error.is_some() {
        warn!("opening inspector on a script with errors");
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
