use serde::Serialize;

use crate::models::LateSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankLimit {
    Top(usize),
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    /// Minimum `total_late` to be ranked
    pub threshold: u32,
    pub limit: RankLimit,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            threshold: 1,
            limit: RankLimit::Top(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStudent {
    pub rank: usize,
    #[serde(flatten)]
    pub summary: LateSummary,
}

/// Most-late first. Ties keep input order.
pub fn rank(summaries: &[LateSummary], options: &RankingOptions) -> Vec<RankedStudent> {
    let mut eligible: Vec<&LateSummary> = summaries
        .iter()
        .filter(|s| s.total_late >= options.threshold)
        .collect();

    // sort_by is stable
    eligible.sort_by(|a, b| b.total_late.cmp(&a.total_late));

    if let RankLimit::Top(n) = options.limit {
        eligible.truncate(n);
    }

    eligible
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankedStudent {
            rank: i + 1,
            summary: s.clone(),
        })
        .collect()
}
