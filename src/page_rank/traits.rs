use crate::graph::GraphModel;
use std::{collections::HashMap, hash::Hash};

pub trait PageRank<K: Eq + Hash> {
    type Result: PageRankResult<K>;

    fn calc(&self) -> Self::Result;
}

pub trait PageRankResult<K: Eq + Hash> {
    fn page_rank(&self) -> &HashMap<K, f64, ahash::RandomState>;

    fn rank(&self, node: &K) -> Option<f64> {
        self.page_rank().get(node).copied()
    }

    fn debug<'a>(&'a self, graph: &'a GraphModel<K>) -> impl std::fmt::Debug + 'a;
}
