use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use graph_ranker::config::Settings;
use graph_ranker::page_rank::{DanglingPolicy, IteratedPageRank, PageRank};
use graph_ranker::report::{report, Selection};
use graph_ranker::EdgeLoader;

/// Rank the nodes of a directed edge list with PageRank.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Edge list, one `from<TAB>to` pair per line.
    #[arg(long)]
    input: Option<PathBuf>,

    /// TOML settings file; flags given here override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of iterations before giving up on convergence.
    #[arg(long)]
    maxiteration: Option<usize>,

    /// Damping factor: probability of following an edge instead of teleporting.
    #[arg(long)]
    lambda: Option<f64>,

    /// Convergence threshold on the L1 change between iterations.
    #[arg(long)]
    thr: Option<f64>,

    /// Node ids to report. Without it every node is listed, highest rank first.
    #[arg(long, num_args = 1..)]
    nodes: Option<Vec<u64>>,

    /// Only list the top N nodes when reporting every node.
    #[arg(long)]
    top: Option<usize>,

    /// Update nodes on the rayon thread pool.
    #[arg(long)]
    parallel: bool,

    /// Drop the rank of dangling nodes instead of redistributing it.
    #[arg(long)]
    leak_dangling: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut s = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        if let Some(input) = &self.input {
            s.loader.path = input.clone();
        }
        if let Some(n) = self.maxiteration {
            s.engine.max_iterations = n;
        }
        if let Some(d) = self.lambda {
            s.engine.damping = d;
        }
        if let Some(t) = self.thr {
            s.engine.threshold = t;
        }
        if self.parallel {
            s.engine.parallel = true;
        }
        if self.leak_dangling {
            s.engine.dangling = DanglingPolicy::Leak;
        }
        if self.nodes.is_some() {
            s.report.nodes = self.nodes.clone();
        }
        if self.top.is_some() {
            s.report.top = self.top;
        }
        s.validate()?;
        Ok(s)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    println!("maxiteration: {}", settings.engine.max_iterations);
    println!("lambda: {}", settings.engine.damping);
    println!("thr: {}", settings.engine.threshold);
    match &settings.report.nodes {
        Some(nodes) => println!("nodes: {nodes:?}"),
        None => println!("nodes: all"),
    }

    let loader = EdgeLoader::new(settings.loader.clone());
    let loaded = loader
        .load::<u64>()
        .with_context(|| format!("loading {}", settings.loader.path.display()))?;
    info!(
        nodes = loaded.graph.node_count(),
        edges = loaded.records,
        skipped = loaded.skipped,
        "graph ready"
    );

    let engine = IteratedPageRank::new(&loaded.graph, &settings.engine)?;
    let result = engine.calc();
    info!(
        iterations = result.iterations,
        delta = result.delta,
        converged = result.converged,
        "page rank done"
    );

    let selection = Selection::from_requested(settings.report.nodes.clone(), settings.report.top);
    for entry in report(&result, &selection) {
        println!("{entry}");
    }
    Ok(())
}
