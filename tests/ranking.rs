use anyhow::Result;
use graph_ranker::config::Settings;
use graph_ranker::page_rank::{IteratedPageRank, PageRank, PageRankResult};
use graph_ranker::report::{report, Selection};
use graph_ranker::EdgeLoader;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

fn settings_for(dir: &TempDir, edges: &str, toml: &str) -> Result<Settings> {
    let edge_path = dir.path().join("edges.txt");
    let mut file = File::create(&edge_path)?;
    write!(file, "{edges}")?;

    let mut settings = Settings::from_toml(toml)?;
    settings.loader.path = edge_path;
    Ok(settings)
}

#[test]
fn three_cycle_from_file() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = settings_for(
        &dir,
        "# FromNodeId\tToNodeId\n1\t2\n2\t3\n3\t1\n",
        "[report]\nnodes = [1, 2, 3, 42]\n",
    )?;

    let loaded = EdgeLoader::new(settings.loader.clone()).load::<u64>()?;
    let engine = IteratedPageRank::new(&loaded.graph, &settings.engine)?;
    let result = engine.calc();
    assert!(result.converged);

    let selection = Selection::from_requested(settings.report.nodes.clone(), None);
    let lines: Vec<String> = report(&result, &selection)
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(lines.len(), 4);
    for (line, id) in lines.iter().zip(["1", "2", "3"]) {
        assert!(line.starts_with(&format!("NodeID: {id}, PageRank: 0.333")), "{line}");
    }
    assert_eq!(lines[3], "NodeID: 42 not found in input data");
    Ok(())
}

#[test]
fn ranked_listing_of_a_star() -> Result<()> {
    let dir = TempDir::new()?;
    // Every leaf points at the hub; the hub points back at leaf 1 only.
    let settings = settings_for(
        &dir,
        "2 1\n3 1\n4 1\n5 1\n1 2\nbroken line\n",
        "[engine]\nthreshold = 1e-8\nmax_iterations = 500\n",
    )?;

    let loaded = EdgeLoader::new(settings.loader.clone()).load::<u64>()?;
    assert_eq!(loaded.skipped, 1);
    let result = IteratedPageRank::new(&loaded.graph, &settings.engine)?.calc();
    assert!(result.converged);
    assert!((result.mass() - 1.0).abs() < 1e-9);

    let entries = report(&result, &Selection::All { limit: None });
    let order: Vec<u64> = entries.iter().map(|e| e.node).collect();
    assert_eq!(order, vec![1, 2, 3, 4, 5]);
    assert_eq!(entries[2].rank, entries[3].rank);
    assert_eq!(result.rank(&3), result.rank(&5));
    Ok(())
}

#[test]
fn same_graph_different_parameters() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = settings_for(&dir, "1 2\n2 3\n3 1\n3 4\n", "")?;
    let loaded = EdgeLoader::new(settings.loader.clone()).load::<u64>()?;

    let mut low = settings.engine.clone();
    low.damping = 0.5;
    let a = IteratedPageRank::new(&loaded.graph, &settings.engine)?.calc();
    let b = IteratedPageRank::new(&loaded.graph, &low)?.calc();
    assert!(a.converged && b.converged);
    assert_ne!(a.rank(&4), b.rank(&4));

    let again = IteratedPageRank::new(&loaded.graph, &settings.engine)?.calc();
    assert_eq!(a.page_rank, again.page_rank);
    Ok(())
}
