use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use lexregex::{lex_pattern, lex_replacement, Dialect};

/// Lex a regular expression and print its styled spans.
#[derive(Parser)]
#[command(name = "lexregex")]
#[command(version)]
struct Cli {
    /// Regular expression (or replacement template with -R) to lex
    regex: String,

    /// Regex language syntax: python, perl, php, ruby or javascript
    #[arg(short, long = "language", default_value = "python")]
    language: Dialect,

    /// Lex a replacement template instead of a pattern
    #[arg(short = 'R', long)]
    replacement: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!(replacement = cli.replacement, language = %cli.language, "starting");
    let spans = if cli.replacement {
        lex_replacement(&cli.regex, cli.language)?
    } else {
        lex_pattern(&cli.regex, cli.language)?
    };
    for span in spans {
        println!("{span}");
    }
    Ok(())
}
