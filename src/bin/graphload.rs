use std::{io, path::PathBuf, process};

use clap::{Parser, Subcommand, ValueEnum};
use graphload::{
    EdgeLookup, LoadError, Loader, LoaderConfig, PropertyValue, ReservedKeyPolicy, SqliteConfig,
    SqliteGraph, StampHooks, dump_graph, open_graph, summary,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Load GraphSON documents into an embedded graph store, reusing existing
/// nodes and edges by external id.
#[derive(Parser)]
#[command(name = "graphload", version, about)]
struct Cli {
    /// Database path, or `memory` for a throwaway in-memory store
    #[arg(long = "db", alias = "database", global = true, default_value = "memory")]
    database: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load a GraphSON file into the store
    Load(LoadArgs),
    /// Print every node and edge with its properties
    Dump,
    /// Print node and edge counts
    Status,
}

#[derive(clap::Args)]
struct LoadArgs {
    /// GraphSON file with `vertices` and `edges` arrays
    file: PathBuf,

    /// Property key holding the external id
    #[arg(long, env = "GRAPHLOAD_ID_KEY", default_value = graphload::config::DEFAULT_ID_KEY)]
    id_key: String,

    /// How existing edges are found by external id
    #[arg(long, value_enum, default_value_t = EdgeLookupArg::Scan)]
    edge_lookup: EdgeLookupArg,

    /// What to do with record keys that collide with the id key
    #[arg(long, value_enum, default_value_t = ReservedKeyArg::Reject)]
    reserved_key: ReservedKeyArg,

    /// Set KEY=VALUE as a string property on every created node and edge
    #[arg(long = "stamp", value_name = "KEY=VALUE", value_parser = parse_stamp)]
    stamps: Vec<(String, String)>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EdgeLookupArg {
    Scan,
    Indexed,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReservedKeyArg {
    Reject,
    Prefix,
}

impl From<EdgeLookupArg> for EdgeLookup {
    fn from(arg: EdgeLookupArg) -> Self {
        match arg {
            EdgeLookupArg::Scan => EdgeLookup::Scan,
            EdgeLookupArg::Indexed => EdgeLookup::Indexed,
        }
    }
}

impl From<ReservedKeyArg> for ReservedKeyPolicy {
    fn from(arg: ReservedKeyArg) -> Self {
        match arg {
            ReservedKeyArg::Reject => ReservedKeyPolicy::Reject,
            ReservedKeyArg::Prefix => ReservedKeyPolicy::Prefix,
        }
    }
}

fn parse_stamp(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let graph = match open_graph(&cli.database, &SqliteConfig::default()) {
        Ok(graph) => graph,
        Err(err) => {
            eprintln!("error[{}]: {err}", err.name());
            process::exit(2);
        }
    };

    if let Err(err) = run_command(&graph, cli.command.unwrap_or(Command::Status)) {
        eprintln!("error[{}]: {err}", err.name());
        process::exit(1);
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn run_command(graph: &SqliteGraph, command: Command) -> Result<(), LoadError> {
    match command {
        Command::Load(args) => {
            let config = LoaderConfig::default()
                .with_id_key(args.id_key)
                .with_edge_lookup(args.edge_lookup.into())
                .with_reserved_key(args.reserved_key.into());
            let hooks = args
                .stamps
                .into_iter()
                .fold(StampHooks::new(), |hooks, (key, value)| {
                    hooks.with(key, PropertyValue::String(value))
                });
            let mut loader = Loader::new(graph).with_config(config);
            let stats = if hooks.is_empty() {
                loader.load_path(&args.file)?
            } else {
                loader.with_hooks(hooks).load_path(&args.file)?
            };
            println!(
                "nodes_created={} nodes_reused={} edges_created={} edges_reused={} \
                 endpoints_synthesized={} properties_set={} properties_skipped={}",
                stats.nodes_created,
                stats.nodes_reused,
                stats.edges_created,
                stats.edges_reused,
                stats.endpoints_synthesized,
                stats.properties_set,
                stats.properties_skipped,
            );
            Ok(())
        }
        Command::Dump => {
            let stdout = io::stdout();
            dump_graph(graph, stdout.lock())?;
            Ok(())
        }
        Command::Status => {
            let counts = summary(graph)?;
            println!("nodes={} edges={}", counts.nodes, counts.edges);
            Ok(())
        }
    }
}
