use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use elmdef::diagnostics::render_syntax_error;
use elmdef::{workspace, Query};

#[derive(Parser)]
#[command(name = "elmdef", version, about = "Go to definition for Elm type names")]
struct Cli {
    /// Log more (-v for debug, -vv for trace). Logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top-level declarations found in a file
    Parse {
        /// Source file path
        file: PathBuf,
        /// Print the statements as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report declarations that were skipped because they did not parse
    Check {
        /// Source file path
        file: PathBuf,
    },
    /// List every project file with its module, dependencies and types
    Index {
        /// Project root (defaults to current dir)
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Print the dependency graph as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print where a type is defined, as path:line:column
    Definition {
        /// File the lookup starts from
        file: PathBuf,
        /// Type name to look up
        #[arg(required_unless_present = "line", conflicts_with_all = ["line", "column"])]
        symbol: Option<String>,
        /// One-based line of the caret
        #[arg(long, requires = "column")]
        line: Option<usize>,
        /// One-based column of the caret
        #[arg(long, requires = "line")]
        column: Option<usize>,
        /// Project root (defaults to the nearest directory holding elm.json)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn read_file(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read '{}': {err}", file.display());
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { file, json } => {
            let source = read_file(&file);
            let result = elmdef::parse(&source);
            if json {
                print_json(&result);
            } else if !result.succeeded() {
                eprintln!("error [{}]: parse failed", file.display());
                std::process::exit(1);
            } else {
                for stmt in result.statements() {
                    println!("{}  {stmt}", stmt.position());
                }
            }
        }
        Commands::Check { file } => {
            let source = read_file(&file);
            let (result, recovered) = elmdef::parser::parse_with_diagnostics(&source);
            let filename = file.display().to_string();
            for err in &recovered {
                if let Err(io) = render_syntax_error(&source, &filename, err) {
                    eprintln!("error [{filename}]: {err} ({io})");
                }
            }
            if !result.succeeded() {
                eprintln!("error [{filename}]: parse failed");
                std::process::exit(1);
            }
            if !recovered.is_empty() {
                eprintln!("{filename}: {} declaration(s) skipped", recovered.len());
                std::process::exit(1);
            }
            println!("{filename}: ok");
        }
        Commands::Index { root, json } => {
            let index = match elmdef::index_project(&root) {
                Ok(index) => index,
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            };
            let graph = index.graph();
            if json {
                print_json(graph);
                return;
            }
            for node in graph.files() {
                let record = &node.record;
                match &record.module_name {
                    Some(name) => println!("{} (module {name})", record.path.display()),
                    None => println!("{} (no module header)", record.path.display()),
                }
                for dep in &node.dependencies {
                    println!("    imports {}", dep.display());
                }
                for ty in &record.exposed_types {
                    println!("    type {} at {}", ty.name, ty.position);
                }
            }
            for module in graph.ambiguous_modules() {
                eprintln!("warning: module {module} is declared by more than one file");
            }
        }
        Commands::Definition { file, symbol, line, column, root } => {
            let query = match (&symbol, line, column) {
                (Some(symbol), _, _) => Query::Symbol(symbol),
                (None, Some(line), Some(column)) => Query::Caret {
                    line: line.saturating_sub(1),
                    column: column.saturating_sub(1),
                },
                _ => {
                    eprintln!("error: give a symbol or both --line and --column");
                    std::process::exit(2);
                }
            };
            let root = root.unwrap_or_else(|| workspace::find_project_root(&file));
            match elmdef::find_definition(&root, &file, query) {
                Ok(Some(def)) => println!("{}:{}", def.path.display(), def.position),
                Ok(None) => {
                    eprintln!("no definition found");
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
    }
}
