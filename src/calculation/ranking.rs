//! Ranking of scored representatives.

use std::cmp::Ordering;

use crate::models::PerformanceResult;

use super::saturating_count;

/// Orders results by performance and assigns 1-based ranks.
///
/// Results sort by `performance_score` descending. Equal scores break ties
/// by ascending `user_id`, so a given population always ranks the same way.
///
/// # Examples
///
/// ```
/// use kpi_engine::calculation::rank_performances;
/// use kpi_engine::models::PerformanceResult;
/// use rust_decimal::Decimal;
///
/// let results = vec![
///     PerformanceResult::unranked("b", Decimal::from(70)),
///     PerformanceResult::unranked("a", Decimal::from(70)),
///     PerformanceResult::unranked("c", Decimal::from(90)),
/// ];
/// let ranked = rank_performances(results);
///
/// let order: Vec<_> = ranked.iter().map(|r| (r.user_id.as_str(), r.rank)).collect();
/// assert_eq!(order, vec![("c", Some(1)), ("a", Some(2)), ("b", Some(3))]);
/// ```
pub fn rank_performances(mut results: Vec<PerformanceResult>) -> Vec<PerformanceResult> {
    results.sort_by(compare_for_ranking);

    for (index, result) in results.iter_mut().enumerate() {
        result.rank = Some(saturating_count(index + 1));
    }

    results
}

fn compare_for_ranking(a: &PerformanceResult, b: &PerformanceResult) -> Ordering {
    b.performance_score
        .cmp(&a.performance_score)
        .then_with(|| a.user_id.cmp(&b.user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scored(user_id: &str, score: &str) -> PerformanceResult {
        PerformanceResult::unranked(user_id, dec(score))
    }

    /// RK-001: highest score ranks first
    #[test]
    fn test_ranks_by_descending_score() {
        let ranked = rank_performances(vec![
            scored("mr_001", "39.52"),
            scored("mr_002", "81.10"),
            scored("mr_003", "55.00"),
        ]);

        let ids: Vec<&str> = ranked.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["mr_002", "mr_003", "mr_001"]);
        assert_eq!(ranked[0].rank, Some(1));
        assert_eq!(ranked[2].rank, Some(3));
    }

    /// RK-002: ties break by user id and ranks stay consecutive
    #[test]
    fn test_ties_break_by_user_id() {
        let ranked = rank_performances(vec![
            scored("zeta", "50"),
            scored("alpha", "50.00"),
            scored("mid", "50.0"),
        ]);

        let order: Vec<(&str, Option<u32>)> = ranked
            .iter()
            .map(|r| (r.user_id.as_str(), r.rank))
            .collect();
        assert_eq!(
            order,
            vec![("alpha", Some(1)), ("mid", Some(2)), ("zeta", Some(3))]
        );
    }

    #[test]
    fn test_ranking_ignores_input_order() {
        let forward = rank_performances(vec![scored("a", "10"), scored("b", "20")]);
        let backward = rank_performances(vec![scored("b", "20"), scored("a", "10")]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_performances(Vec::new()).is_empty());
    }
}
