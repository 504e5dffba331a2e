use crate::{common::FullOrdFloat, page_rank::PageRankResult};
use std::{fmt, hash::Hash};

/// Which nodes a report covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<K> {
    /// The listed nodes, in the listed order.
    Requested(Vec<K>),
    /// Every node, highest rank first, optionally cut to the top `limit`.
    All { limit: Option<usize> },
}

impl<K> Selection<K> {
    /// `Requested` when a list was given, `All` otherwise.
    pub fn from_requested(requested: Option<Vec<K>>, limit: Option<usize>) -> Self {
        match requested {
            Some(nodes) => Selection::Requested(nodes),
            None => Selection::All { limit },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry<K> {
    pub node: K,
    /// `None` when the node never appeared in the edge list.
    pub rank: Option<f64>,
}

impl<K: fmt::Display> fmt::Display for Entry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Some(rank) => write!(f, "NodeID: {}, PageRank: {rank}", self.node),
            None => write!(f, "NodeID: {} not found in input data", self.node),
        }
    }
}

pub fn report<K, R>(result: &R, selection: &Selection<K>) -> Vec<Entry<K>>
where
    K: Clone + Eq + Hash + Ord,
    R: PageRankResult<K>,
{
    match selection {
        Selection::Requested(nodes) => nodes
            .iter()
            .map(|node| Entry {
                node: node.clone(),
                rank: result.rank(node),
            })
            .collect(),
        Selection::All { limit } => {
            let mut ranked: Vec<(&K, f64)> =
                result.page_rank().iter().map(|(k, r)| (k, *r)).collect();
            ranked.sort_by(|(k0, r0), (k1, r1)| {
                FullOrdFloat(*r1)
                    .cmp(&FullOrdFloat(*r0))
                    .then_with(|| k0.cmp(k1))
            });
            if let Some(limit) = limit {
                ranked.truncate(*limit);
            }
            ranked
                .into_iter()
                .map(|(node, rank)| Entry {
                    node: node.clone(),
                    rank: Some(rank),
                })
                .collect()
        }
    }
}
