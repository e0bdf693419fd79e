//! Arbor CLI - command-line interface for code index and dependency graph queries

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Code index and dependency graph queries", long_about = None)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files the scanner would index
    Scan,

    /// Show repository statistics
    Stats,

    /// Generate the condensed repository map
    Map {
        /// Include docstrings in the map
        #[arg(long)]
        docstrings: bool,
    },

    /// Show imports, importers and symbols for one file
    Deps {
        /// Repo-relative file path
        file: String,
    },

    /// Build the call graph for a function
    Callgraph {
        /// Function or method name
        function: String,

        /// Traversal direction
        #[arg(short, long, default_value = "both", value_parser = ["callers", "callees", "both"])]
        direction: String,
    },

    /// Trace execution flow from an entry symbol
    Flow {
        /// Entry function name
        entry: String,

        /// Maximum trace depth
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Find every reference to a symbol
    Usages {
        /// Symbol name
        symbol: String,
    },

    /// Analyze what changing a file would affect
    Impact {
        /// Repo-relative file path
        file: String,
    },

    /// Render files in a token-efficient format
    Compress {
        /// Repo-relative file paths
        files: Vec<String>,

        /// Rendering mode
        #[arg(short, long, default_value = "smart", value_parser = ["full", "signatures", "smart"])]
        mode: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let result = match cli.command {
        Commands::Scan => cmd_scan(&root, cli.json),
        Commands::Stats => cmd_stats(&root, cli.json),
        Commands::Map { docstrings } => cmd_map(&root, docstrings, cli.json),
        Commands::Deps { file } => cmd_deps(&root, &file, cli.json),
        Commands::Callgraph {
            function,
            direction,
        } => cmd_callgraph(&root, &function, &direction, cli.json),
        Commands::Flow { entry, max_depth } => cmd_flow(&root, &entry, max_depth, cli.json),
        Commands::Usages { symbol } => cmd_usages(&root, &symbol, cli.json),
        Commands::Impact { file } => cmd_impact(&root, &file, cli.json),
        Commands::Compress { files, mode } => cmd_compress(&root, &files, &mode, cli.json),
    };

    if let Err(e) = result {
        if cli.json {
            let error_json = serde_json::json!({ "error": e.to_string() });
            eprintln!("{}", serde_json::to_string_pretty(&error_json).unwrap());
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn load_config(root: &PathBuf) -> arbor_core::Result<arbor_core::Config> {
    arbor_core::Config::load_or_default(root)
}

fn cmd_scan(root: &PathBuf, json: bool) -> arbor_core::Result<()> {
    use arbor_core::scan::{scan, ScanOptions};
    use colored::Colorize;

    let config = load_config(root)?;
    let mut files = scan(root, &ScanOptions::from_config(&config.scan))?;
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    if json {
        println!("{}", serde_json::to_string_pretty(&files).unwrap());
    } else {
        for file in &files {
            println!(
                "{} [{}] {} bytes",
                file.relative_path.cyan(),
                file.language.as_str(),
                file.size_bytes
            );
        }
        println!("({} files)", files.len());
    }
    Ok(())
}

fn cmd_stats(root: &PathBuf, json: bool) -> arbor_core::Result<()> {
    use arbor_core::scan::{repo_stats, ScanOptions};
    use colored::Colorize;

    let config = load_config(root)?;
    let stats = repo_stats(root, &ScanOptions::from_config(&config.scan))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats).unwrap());
    } else {
        println!("{}: {}", "Files".blue(), stats.total_files);
        println!("{}: {}", "Lines".blue(), stats.total_lines);
        for (language, count) in &stats.languages {
            println!("  {}: {} files", language.cyan(), count);
        }
    }
    Ok(())
}

fn cmd_map(root: &PathBuf, docstrings: bool, json: bool) -> arbor_core::Result<()> {
    let config = load_config(root)?;
    let map = arbor_core::repomap::repo_map(root, &config, docstrings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&map).unwrap());
    } else {
        println!("{}", map.text);
        if map.truncated {
            eprintln!("(truncated at {} tokens)", config.map.max_tokens);
        }
    }
    Ok(())
}

fn cmd_deps(root: &PathBuf, file: &str, json: bool) -> arbor_core::Result<()> {
    use colored::Colorize;

    let config = load_config(root)?;
    let index = arbor_core::build_index(root, &config)?;
    let deps = index.file_dependencies(file);

    if json {
        println!("{}", serde_json::to_string_pretty(&deps).unwrap());
    } else {
        println!("{}:", "Imports".blue());
        for import in &deps.imports {
            println!("  {}", import);
        }
        println!("{}:", "Imported by".blue());
        for importer in &deps.imported_by {
            println!("  {}", importer);
        }
        println!("{}:", "Symbols".blue());
        for symbol in &deps.symbols {
            println!(
                "  {} {}{} @ {}",
                symbol.kind.as_str().cyan(),
                symbol.name,
                symbol.signature,
                symbol.start_line
            );
        }
    }
    Ok(())
}

fn cmd_callgraph(
    root: &PathBuf,
    function: &str,
    direction: &str,
    json: bool,
) -> arbor_core::Result<()> {
    use arbor_core::callgraph::{call_graph, Direction};
    use colored::Colorize;

    let config = load_config(root)?;
    let index = arbor_core::build_index(root, &config)?;
    let direction = Direction::parse(direction).unwrap_or(Direction::Both);
    let graph = call_graph(&index, root, function, direction, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&graph).unwrap());
    } else {
        println!(
            "{} @ {}:{}",
            graph.function.cyan(),
            graph.file,
            graph.line
        );
        if let Some(callers) = &graph.callers {
            println!("{}:", "Callers".blue());
            for caller in callers {
                println!("  {} @ {}:{}", caller.function, caller.file, caller.line);
            }
        }
        if let Some(callees) = &graph.callees {
            println!("{}:", "Callees".blue());
            for callee in callees {
                println!("  {}()", callee);
            }
        }
    }
    Ok(())
}

fn cmd_flow(
    root: &PathBuf,
    entry: &str,
    max_depth: Option<usize>,
    json: bool,
) -> arbor_core::Result<()> {
    use arbor_core::callgraph::trace_flow;

    let config = load_config(root)?;
    let index = arbor_core::build_index(root, &config)?;
    let max_depth = max_depth.unwrap_or(config.callgraph.flow_max_depth);
    let trace = trace_flow(&index, root, entry, max_depth, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&trace).unwrap());
    } else {
        for step in &trace.steps {
            let indent = "  ".repeat(step.depth);
            if step.external {
                println!("{indent}→ {}() [external]", step.function);
            } else {
                println!(
                    "{indent}→ {}() @ {}:{}",
                    step.function,
                    step.file.as_deref().unwrap_or("?"),
                    step.line.unwrap_or(0)
                );
            }
        }
        println!("({} steps)", trace.steps.len());
    }
    Ok(())
}

fn cmd_usages(root: &PathBuf, symbol: &str, json: bool) -> arbor_core::Result<()> {
    use colored::Colorize;

    let config = load_config(root)?;
    let usages = arbor_core::usages::find_usages(root, symbol, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&usages).unwrap());
    } else {
        for usage in &usages {
            println!(
                "{}:{} [{}] {}",
                usage.file.cyan(),
                usage.line,
                usage.kind.as_str(),
                usage.content
            );
        }
        println!("({} usages)", usages.len());
    }
    Ok(())
}

fn cmd_impact(root: &PathBuf, file: &str, json: bool) -> arbor_core::Result<()> {
    use colored::Colorize;

    let config = load_config(root)?;
    let index = arbor_core::build_index(root, &config)?;
    let impact = arbor_core::impact::change_impact(&index, root, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&impact).unwrap());
    } else {
        let risk = match impact.risk_level {
            arbor_core::RiskLevel::Low => impact.risk_level.as_str().green(),
            arbor_core::RiskLevel::Medium => impact.risk_level.as_str().yellow(),
            arbor_core::RiskLevel::High => impact.risk_level.as_str().red(),
        };
        println!("{}: {}", "Risk".blue(), risk);
        println!(
            "{}: {} direct, {} indirect",
            "Dependents".blue(),
            impact.direct_dependents.len(),
            impact.indirect_dependents.len()
        );
        for dependent in &impact.direct_dependents {
            println!("  {}", dependent);
        }
        for dependent in &impact.indirect_dependents {
            println!("  {} (indirect)", dependent.dimmed());
        }
        println!("{}:", "Exports".blue());
        for symbol in &impact.symbols_exported {
            println!("  {}", symbol);
        }
        println!("{}", impact.recommendation);
    }
    Ok(())
}

fn cmd_compress(root: &PathBuf, files: &[String], mode: &str, json: bool) -> arbor_core::Result<()> {
    use arbor_core::compress::{compress, CompressMode};

    let config = load_config(root)?;
    let mode = CompressMode::parse(mode).unwrap_or(CompressMode::Smart);
    let result = compress(root, files, mode, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        println!("{}", result.content);
        eprintln!(
            "({} files, ~{} tokens, {} mode)",
            result.files_included,
            result.estimated_tokens,
            result.mode.as_str()
        );
    }
    Ok(())
}
