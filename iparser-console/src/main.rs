mod console;
mod escape;
mod graph;

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use env_logger::Env;
use log::info;

use crate::graph::Graph;

/// Feed typed lines to an iparser machine and watch it move.
#[derive(Debug, Parser)]
#[command(name = "iparser-console", version, about)]
struct Args {
    /// JSON graph description, the built-in demo graph when omitted.
    #[arg(short, long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Print every state with its branches and exit.
    #[arg(long)]
    dump: bool,

    /// Raise the log level, once for debug and twice for trace.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .init();

    let graph = match &args.graph {
        Some(path) => Graph::load(path)?,
        None => Graph::demo()?,
    };
    let mut machine = graph.build()?;
    info!("machine ready with {} states", machine.states().len());

    if args.dump {
        print!("{}", machine.dump());
        return Ok(());
    }

    console::run(&mut machine, io::stdin().lock(), io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn verbosity_is_counted() {
        let args = Args::parse_from(["iparser-console", "-vv", "--dump"]);
        assert_eq!(args.verbose, 2);
        assert!(args.dump);
        assert!(args.graph.is_none());
    }
}
