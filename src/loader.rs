use crate::{error::*, graph::GraphModel};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    hash::Hash,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub path: PathBuf,
    /// Lines starting with this prefix are skipped.
    pub comment_prefix: String,
    /// Column separator. `None` splits on any run of whitespace.
    pub delimiter: Option<char>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/test-web-Stanford.txt"),
            comment_prefix: "#".to_string(),
            delimiter: None,
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.comment_prefix.trim().is_empty() {
            return Err(Error::invalid_parameter(
                "comment_prefix",
                format!("{:?}", self.comment_prefix),
            ));
        }
        if let Some(d) = self.delimiter {
            // `None` already splits on runs of whitespace.
            if d.is_whitespace() && d != '\t' {
                return Err(Error::invalid_parameter("delimiter", format!("{d:?}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport<K> {
    pub graph: GraphModel<K>,
    /// Edge records accepted into the graph.
    pub records: usize,
    /// Malformed records that were skipped.
    pub skipped: usize,
}

/// Builds a graph from already clean `(from, to)` pairs.
pub fn load<K, I>(edges: I) -> GraphModel<K>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = (K, K)>,
{
    edges.into_iter().collect()
}

/// Reads two-column edge lists, one edge per line.
#[derive(Debug, Clone, Default)]
pub struct EdgeLoader {
    config: LoaderConfig,
}

impl EdgeLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Parses one line. Comments and blank lines give `Ok(None)`.
    pub fn parse_record<K: FromStr>(&self, line_no: usize, line: &str) -> Result<Option<(K, K)>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(self.config.comment_prefix.as_str()) {
            return Ok(None);
        }
        let fields: Vec<&str> = match self.config.delimiter {
            Some(d) => line.split(d).map(str::trim).collect(),
            None => line.split_whitespace().collect(),
        };
        let malformed = |reason: String| Error::MalformedEdgeRecord {
            line: line_no,
            reason,
        };
        let [from, to] = fields[..] else {
            return Err(malformed(format!("expected 2 fields, found {}", fields.len())));
        };
        let from = K::from_str(from)
            .map_err(|_| malformed(format!("cannot parse {from:?} as a node id")))?;
        let to =
            K::from_str(to).map_err(|_| malformed(format!("cannot parse {to:?} as a node id")))?;
        Ok(Some((from, to)))
    }

    /// Loads the file named by the configured path.
    pub fn load<K>(&self) -> Result<LoadReport<K>>
    where
        K: Clone + Eq + Hash + FromStr,
    {
        let path = &self.config.path;
        let file = File::open(path).map_err(|source| Error::SourceUnavailable {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "loading edge list");
        self.read_records(BufReader::new(file), path)
    }

    /// Loads from an arbitrary reader. Read failures are reported against
    /// the pseudo path `<reader>`.
    pub fn load_reader<K, R>(&self, reader: R) -> Result<LoadReport<K>>
    where
        K: Clone + Eq + Hash + FromStr,
        R: BufRead,
    {
        self.read_records(reader, Path::new("<reader>"))
    }

    fn read_records<K, R>(&self, reader: R, source_path: &Path) -> Result<LoadReport<K>>
    where
        K: Clone + Eq + Hash + FromStr,
        R: BufRead,
    {
        self.config.validate()?;
        let mut report = LoadReport {
            graph: GraphModel::new(),
            records: 0,
            skipped: 0,
        };
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| Error::SourceUnavailable {
                path: source_path.to_path_buf(),
                source,
            })?;
            report.accept(self.parse_record(i + 1, &line));
        }
        report.log();
        Ok(report)
    }

    /// Parses `lines` on the rayon pool, then inserts edges in input order.
    /// The graph is the same as the one `load_reader` builds from the same lines.
    pub fn load_lines_parallel<K, S>(&self, lines: &[S]) -> Result<LoadReport<K>>
    where
        K: Clone + Eq + Hash + FromStr + Send,
        S: AsRef<str> + Sync,
    {
        self.config.validate()?;
        let parsed: Vec<Result<Option<(K, K)>>> = lines
            .par_iter()
            .enumerate()
            .map(|(i, line)| self.parse_record(i + 1, line.as_ref()))
            .collect();
        let mut report = LoadReport {
            graph: GraphModel::new(),
            records: 0,
            skipped: 0,
        };
        for r in parsed {
            report.accept(r);
        }
        report.log();
        Ok(report)
    }
}

impl<K: Clone + Eq + Hash> LoadReport<K> {
    fn accept(&mut self, record: Result<Option<(K, K)>>) {
        match record {
            Ok(Some((from, to))) => {
                self.graph.add_edge(from, to);
                self.records += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("skipping record: {e}");
                self.skipped += 1;
            }
        }
    }

    fn log(&self) {
        debug!(
            nodes = self.graph.node_count(),
            edges = self.records,
            skipped = self.skipped,
            "edge list loaded"
        );
    }
}
