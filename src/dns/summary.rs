//! Per-resolver aggregation and ranking.

use crate::dns::types::{
    ProbeSample, RankedResult, ResolverEntry, ResolverStats, ResolverSummary,
};

/// Fold the samples of one resolver into a summary.
///
/// Without any successful sample the result is [`ResolverSummary::NoData`].
#[must_use]
pub fn summarize(samples: &[ProbeSample]) -> ResolverSummary {
    let latencies: Vec<f64> = samples.iter().filter_map(ProbeSample::latency_ms).collect();
    let errors = samples.len() - latencies.len();

    if latencies.is_empty() {
        return ResolverSummary::NoData { errors };
    }

    let best = latencies.iter().copied().fold(f64::INFINITY, f64::min);
    let worst = latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // The mean of floats can drift a hair outside [min, max]; pin it.
    let avg = (latencies.iter().sum::<f64>() / latencies.len() as f64).clamp(best, worst);

    ResolverSummary::Measured(ResolverStats {
        successes: latencies.len(),
        errors,
        best_ms: best,
        worst_ms: worst,
        avg_ms: avg,
    })
}

/// Rank summaries by mean latency, fastest first.
///
/// Resolvers without data sort last. The sort is stable, so equal keys keep
/// the order in which the entries were supplied.
#[must_use]
pub fn rank(results: Vec<(ResolverEntry, ResolverSummary)>) -> Vec<RankedResult> {
    let mut results = results;
    results.sort_by(|(_, a), (_, b)| a.rank_key().total_cmp(&b.rank_key()));

    results
        .into_iter()
        .enumerate()
        .map(|(idx, (entry, summary))| RankedResult {
            rank: idx + 1,
            label: entry.label,
            address: entry.address,
            summary,
        })
        .collect()
}
