mod traits;
pub use self::traits::*;

pub mod iterated;
pub use self::iterated::{Config, DanglingPolicy, IteratedPageRank, RankResult};
