use super::*;
use crate::{common::*, error::*, graph::GraphModel};
use algograph::graph::{QueryableGraph, VertexId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, hash::Hash};
use tracing::{debug, trace};

/// What happens to the rank held by nodes without outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// Spread it uniformly over all nodes, keeping the total mass at 1.
    #[default]
    Redistribute,
    /// Drop it. Ranks no longer sum to 1 once a dangling node holds mass.
    Leak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub damping: f64,
    pub threshold: f64,
    pub max_iterations: usize,
    pub dangling: DanglingPolicy,
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: 0.85,
            threshold: 0.0001,
            max_iterations: 100,
            dangling: DanglingPolicy::Redistribute,
            parallel: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let damping = self.damping;
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(Error::invalid_parameter("damping", damping));
        }
        let threshold = self.threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(Error::invalid_parameter("threshold", threshold));
        }
        Ok(())
    }
}

/// Power iteration over a [`GraphModel`].
///
/// The graph is compiled once into dense arrays indexed by vertex position:
/// incoming sources in CSR layout, out-degrees and the list of dangling
/// vertices. Every iteration then reads the previous rank buffer and writes
/// the next one without allocating.
pub struct IteratedPageRank<'a, K> {
    graph: &'a GraphModel<K>,
    config: Config,
    vertices: Vec<VertexId>,
    offsets: Vec<usize>,
    sources: Vec<usize>,
    out_degrees: Vec<usize>,
    dangling: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct RankResult<K> {
    pub page_rank: HashMap<K, f64, ahash::RandomState>,
    pub iterations: usize,
    pub delta: f64,
    pub converged: bool,
}

impl<K> RankResult<K> {
    pub fn mass(&self) -> f64
    where
        K: Eq + Hash,
    {
        norm_1(&self.page_rank)
    }
}

impl<'a, K: Clone + Eq + Hash> IteratedPageRank<'a, K> {
    pub fn new(g: &'a GraphModel<K>, config: &Config) -> Result<Self> {
        config.validate()?;
        if g.is_empty() {
            return Err(Error::InvalidGraph);
        }
        let graph = g.graph();
        let vertices: Vec<VertexId> = graph.iter_vertices().collect();
        let index: HashMap<VertexId, usize, ahash::RandomState> = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (*v, i))
            .collect();
        let (offsets, sources) = {
            let mut offsets = Vec::with_capacity(vertices.len() + 1);
            let mut sources = Vec::with_capacity(graph.edge_size());
            offsets.push(0);
            for v in vertices.iter() {
                for e in g.in_edges(*v) {
                    sources.push(*index.get(&e.source).unwrap());
                }
                offsets.push(sources.len());
            }
            (offsets, sources)
        };
        let out_degrees: Vec<usize> = vertices
            .iter()
            .map(|v| graph.out_edges(v).count())
            .collect();
        let dangling: Vec<usize> = out_degrees
            .iter()
            .enumerate()
            .filter_map(|(i, d)| if *d == 0 { Some(i) } else { None })
            .collect();
        debug!(
            nodes = vertices.len(),
            edges = sources.len(),
            dangling = dangling.len(),
            "compiled graph for power iteration"
        );
        Ok(Self {
            graph: g,
            config: config.clone(),
            vertices,
            offsets,
            sources,
            out_degrees,
            dangling,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a computation from the uniform distribution.
    ///
    /// The returned iterator performs one update per call to `next`. Dropping
    /// it early abandons the computation; [`PowerIteration::finish`] turns
    /// whatever state was reached into a [`RankResult`].
    pub fn iter(&self) -> PowerIteration<'_, 'a, K> {
        let n = self.vertices.len();
        let uniform = 1.0 / n as f64;
        let state = if self.config.max_iterations == 0 {
            State::Exhausted
        } else {
            State::Iterating
        };
        PowerIteration {
            engine: self,
            prev: vec![uniform; n],
            next: vec![0.0; n],
            shares: vec![0.0; n],
            iteration: 0,
            delta: f64::INFINITY,
            state,
        }
    }

    fn step(&self, prev: &[f64], shares: &mut [f64], next: &mut [f64]) {
        let n = prev.len() as f64;
        let damping = self.config.damping;
        for ((s, p), d) in shares.iter_mut().zip(prev).zip(self.out_degrees.iter()) {
            *s = if *d == 0 { 0.0 } else { p / *d as f64 };
        }
        let dangling_mass: f64 = match self.config.dangling {
            DanglingPolicy::Redistribute => self.dangling.iter().map(|i| prev[*i]).sum(),
            DanglingPolicy::Leak => 0.0,
        };
        let base = (1.0 - damping) / n + damping * dangling_mass / n;

        let shares = &*shares;
        let offsets = &self.offsets;
        let sources = &self.sources;
        let update = |(i, slot): (usize, &mut f64)| {
            let incoming = &sources[offsets[i]..offsets[i + 1]];
            let sum: f64 = incoming.iter().map(|m| shares[*m]).sum();
            *slot = base + damping * sum;
        };
        if self.config.parallel {
            next.par_iter_mut().enumerate().for_each(update);
        } else {
            next.iter_mut().enumerate().for_each(update);
        }
    }
}

impl<K: Clone + Eq + Hash + std::fmt::Debug> PageRank<K> for IteratedPageRank<'_, K> {
    type Result = RankResult<K>;

    fn calc(&self) -> Self::Result {
        self.iter().run()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Iterating,
    Converged,
    Exhausted,
}

/// Report of a single update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub iteration: usize,
    /// `Σ |rank'(n) - rank(n)|` over all nodes.
    pub delta: f64,
    /// Total rank after the update.
    pub mass: f64,
}

pub struct PowerIteration<'e, 'a, K> {
    engine: &'e IteratedPageRank<'a, K>,
    prev: Vec<f64>,
    next: Vec<f64>,
    shares: Vec<f64>,
    iteration: usize,
    delta: f64,
    state: State,
}

impl<K: Clone + Eq + Hash> PowerIteration<'_, '_, K> {
    pub fn state(&self) -> State {
        self.state
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Runs until convergence or until the iteration cap is hit.
    pub fn run(mut self) -> RankResult<K> {
        for _ in self.by_ref() {}
        self.finish()
    }

    pub fn finish(self) -> RankResult<K> {
        let g = self.engine.graph;
        let page_rank = self
            .engine
            .vertices
            .iter()
            .zip(self.prev.iter())
            .map(|(v, r)| (g.node(*v).clone(), *r))
            .collect();
        RankResult {
            page_rank,
            iterations: self.iteration,
            delta: self.delta,
            converged: self.state == State::Converged,
        }
    }
}

impl<K: Clone + Eq + Hash> Iterator for PowerIteration<'_, '_, K> {
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Iterating {
            return None;
        }
        self.engine.step(&self.prev, &mut self.shares, &mut self.next);
        self.delta = distance_1(&self.next, &self.prev);
        std::mem::swap(&mut self.prev, &mut self.next);
        self.iteration += 1;
        let mass: f64 = self.prev.iter().sum();
        trace!(
            iteration = self.iteration,
            delta = self.delta,
            mass,
            "power iteration step"
        );

        if self.delta < self.engine.config.threshold {
            self.state = State::Converged;
            debug!(
                iterations = self.iteration,
                delta = self.delta,
                "page rank converged"
            );
        } else if self.iteration >= self.engine.config.max_iterations {
            self.state = State::Exhausted;
            debug!(
                iterations = self.iteration,
                delta = self.delta,
                "page rank hit the iteration cap"
            );
        }
        Some(Step {
            iteration: self.iteration,
            delta: self.delta,
            mass,
        })
    }
}

impl<K: Clone + Eq + Hash + std::fmt::Debug> PageRankResult<K> for RankResult<K> {
    fn page_rank(&self) -> &HashMap<K, f64, ahash::RandomState> {
        &self.page_rank
    }

    fn debug<'a>(&'a self, graph: &'a GraphModel<K>) -> impl std::fmt::Debug + 'a {
        ResultDebug {
            graph,
            result: self,
        }
    }
}

pub struct ResultDebug<'a, K> {
    graph: &'a GraphModel<K>,
    result: &'a RankResult<K>,
}

impl<K: Clone + Eq + Hash + std::fmt::Debug> std::fmt::Debug for ResultDebug<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for v in self.graph.iter_nodes() {
            let p = self.result.page_rank.get(v);
            writeln!(f, "{v:?}: {p:?}")?;
        }
        writeln!(
            f,
            "iterations: {}, delta: {:?}, converged: {}",
            self.result.iterations, self.result.delta, self.result.converged
        )
    }
}
