use anyhow::Result;
use clap::{Parser, Subcommand};
use kol_cli::{
    format_source, load_source, parse_source, render_ast, render_tokens, render_tokens_json, Format,
};
use kol_parse::{Diagnostics, ParseLimits};

#[derive(Parser, Debug)]
#[command(name = "kol")]
#[command(about = "kol: lexer, parser and formatter for the kol language")]
struct Cli {
    /// Maximum nesting depth accepted by the parser (library default if omitted)
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a source file and dump the syntax tree
    Parse {
        /// Path to .kol source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Sexpr)]
        format: Format,
    },

    /// Print the token stream of a source file
    Tokens {
        /// Path to .kol source file
        file: String,

        /// Include whitespace and comments
        #[arg(long)]
        all: bool,

        /// Print tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical formatting of a source file
    Fmt {
        /// Path to .kol source file
        file: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut limits = ParseLimits::default();
    if let Some(depth) = cli.max_depth {
        limits = limits.with_max_depth(depth);
    }

    match cli.command {
        Commands::Parse { file, format } => cmd_parse(&file, format, &limits),
        Commands::Tokens { file, all, json } => cmd_tokens(&file, all, json, &limits),
        Commands::Fmt { file } => cmd_fmt(&file, &limits),
    }
}

fn cmd_parse(file: &str, format: Format, limits: &ParseLimits) -> Result<()> {
    let src = load_source(file, limits)?;
    match parse_source(&src, limits) {
        Ok(tree) => println!("{}", render_ast(&tree, format)?),
        Err(diags) => fail(&diags),
    }
    Ok(())
}

fn cmd_tokens(file: &str, all: bool, json: bool, limits: &ParseLimits) -> Result<()> {
    let src = load_source(file, limits)?;
    if json {
        println!("{}", render_tokens_json(&src, all)?);
    } else {
        print!("{}", render_tokens(&src, all));
    }
    Ok(())
}

fn cmd_fmt(file: &str, limits: &ParseLimits) -> Result<()> {
    let src = load_source(file, limits)?;
    match format_source(&src, limits) {
        Ok(text) => print!("{}", text),
        Err(diags) => fail(&diags),
    }
    Ok(())
}

fn fail(diags: &Diagnostics) -> ! {
    for d in diags {
        eprintln!("{}", d);
    }
    std::process::exit(1);
}
