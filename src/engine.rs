//! Orchestration facade for scoring, ranking and reporting.
//!
//! [`PerformanceEngine`] owns a [`RecordSource`] and a validated
//! [`ScoringConfig`]. It resolves peer groups, builds the peer expense
//! baseline once per call, and fans per-user scoring out across threads.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{PeerBaseline, rank_performances, score_representative};
use crate::config::{ConfigLoader, ScoringConfig, validate};
use crate::error::{EngineError, EngineResult};
use crate::models::{PerformanceReport, PerformanceResult, Period, ScoreSummary, TopPerformer};
use crate::source::{PeerGroup, RecordSource};

/// The engine version recorded on every report.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scores representatives against a record source.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use kpi_engine::engine::PerformanceEngine;
/// use kpi_engine::models::{ActivityRecord, Period, Representative, WorkType};
/// use kpi_engine::source::{InMemoryRecordSource, PeerGroup};
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let source = InMemoryRecordSource::new()
///     .with_representative(Representative::new("mr_001", "Asha"))
///     .with_activity(ActivityRecord::new("mr_001", day, WorkType::FieldWork).with_doctors(["doc_1"]));
///
/// let engine = PerformanceEngine::with_default_config(source);
/// let period = Period::parse("2026-01-01", "2026-01-30").unwrap();
/// let result = engine.score("mr_001", &period, &PeerGroup::AllActive).unwrap();
///
/// assert_eq!(result.kpis.field_work_days, 1);
/// ```
#[derive(Debug, Clone)]
pub struct PerformanceEngine<S> {
    source: S,
    config: ScoringConfig,
}

impl<S: RecordSource> PerformanceEngine<S> {
    /// Creates an engine, rejecting an invalid configuration.
    pub fn new(source: S, config: ScoringConfig) -> EngineResult<Self> {
        validate(&config)?;
        Ok(Self { source, config })
    }

    /// Creates an engine with the default scoring constants.
    pub fn with_default_config(source: S) -> Self {
        Self {
            source,
            config: ScoringConfig::default(),
        }
    }

    /// Creates an engine from `scoring.yaml` in `config_dir`.
    pub fn from_config_dir<P: AsRef<Path>>(source: S, config_dir: P) -> EngineResult<Self> {
        let config = ConfigLoader::load(config_dir)?.into_config();
        Ok(Self { source, config })
    }

    /// The scoring configuration in use.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// The underlying record source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Builds the expense baseline for the population of `peer_group`.
    pub fn peer_baseline(&self, period: &Period, peer_group: &PeerGroup) -> EngineResult<PeerBaseline> {
        let peers = self.peer_users(peer_group)?;
        PeerBaseline::collect(&self.source, period, &peers)
    }

    /// Scores one representative, normalizing expenses against `peer_group`.
    ///
    /// The returned result is unranked.
    pub fn score(
        &self,
        user_id: &str,
        period: &Period,
        peer_group: &PeerGroup,
    ) -> EngineResult<PerformanceResult> {
        let baseline = self.peer_baseline(period, peer_group)?;
        self.score_with_baseline(user_id, period, &baseline)
    }

    /// Scores one representative against a precomputed baseline.
    pub fn score_with_baseline(
        &self,
        user_id: &str,
        period: &Period,
        baseline: &PeerBaseline,
    ) -> EngineResult<PerformanceResult> {
        score_representative(&self.source, user_id, period, baseline, &self.config).inspect_err(
            |err| {
                warn!(user_id = %user_id, error = %err, "Scoring failed");
            },
        )
    }

    /// Resolves `peer_group` to distinct user ids, in first-seen order.
    fn peer_users(&self, peer_group: &PeerGroup) -> EngineResult<Vec<String>> {
        let users = self.source.peer_users(peer_group).inspect_err(|err| {
            warn!(peer_group = %peer_group, error = %err, "Peer lookup failed");
        })?;

        let mut seen = HashSet::new();
        Ok(users
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect())
    }
}

impl<S: RecordSource + Sync> PerformanceEngine<S> {
    /// Scores several representatives in parallel.
    ///
    /// The peer baseline is built once and shared. Results come back
    /// unranked, in the order of `user_ids`; the first failure aborts the
    /// batch.
    pub fn score_batch(
        &self,
        user_ids: &[String],
        period: &Period,
        peer_group: &PeerGroup,
    ) -> EngineResult<Vec<PerformanceResult>> {
        let start_time = Instant::now();
        let baseline = self.peer_baseline(period, peer_group)?;

        let results = self.score_all(user_ids, period, &baseline)?;

        info!(
            peer_group = %peer_group,
            users = results.len(),
            peers_with_field_work = baseline.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Batch scoring completed"
        );

        Ok(results)
    }

    /// Scores and ranks every member of `peer_group`.
    ///
    /// The peer group is both the scored population and the expense
    /// normalization population.
    ///
    /// # Errors
    ///
    /// Returns `NoUsersFound` when the group is empty.
    pub fn report(&self, period: &Period, peer_group: &PeerGroup) -> EngineResult<PerformanceReport> {
        let start_time = Instant::now();
        let users = self.peer_users(peer_group)?;
        if users.is_empty() {
            warn!(peer_group = %peer_group, "No users found for report");
            return Err(EngineError::NoUsersFound {
                peer_group: peer_group.to_string(),
            });
        }

        let performances = self.rank_population(&users, period)?;
        let scores: Vec<_> = performances.iter().map(|p| p.performance_score).collect();
        let summary = ScoreSummary::from_scores(&scores);

        let report = PerformanceReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            period_start: period.start_date(),
            period_end: period.end_date(),
            total_users: performances.len(),
            performances,
            summary,
        };

        info!(
            report_id = %report.report_id,
            peer_group = %peer_group,
            users = report.total_users,
            duration_us = start_time.elapsed().as_micros(),
            "Performance report generated"
        );

        Ok(report)
    }

    /// The `limit` best-ranked members of `peer_group`.
    ///
    /// An empty group yields an empty list.
    pub fn top_performers(
        &self,
        period: &Period,
        peer_group: &PeerGroup,
        limit: usize,
    ) -> EngineResult<Vec<TopPerformer>> {
        let users = self.peer_users(peer_group)?;
        if users.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let top = self
            .rank_population(&users, period)?
            .into_iter()
            .take(limit)
            .filter_map(|p| {
                Some(TopPerformer {
                    rank: p.rank?,
                    user_id: p.user_id,
                    performance_score: p.performance_score,
                })
            })
            .collect();

        Ok(top)
    }

    fn rank_population(
        &self,
        users: &[String],
        period: &Period,
    ) -> EngineResult<Vec<PerformanceResult>> {
        let baseline = PeerBaseline::collect(&self.source, period, users)?;
        let results = self.score_all(users, period, &baseline)?;
        Ok(rank_performances(results))
    }

    fn score_all(
        &self,
        user_ids: &[String],
        period: &Period,
        baseline: &PeerBaseline,
    ) -> EngineResult<Vec<PerformanceResult>> {
        user_ids
            .par_iter()
            .map(|user_id| self.score_with_baseline(user_id, period, baseline))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KpiWeights;
    use crate::models::{
        ActivityRecord, ExpenseRecord, ExpenseStatus, LeaveRecord, LeaveStatus, Representative,
        WorkType,
    };
    use crate::source::InMemoryRecordSource;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> Period {
        Period::new(date(2026, 1, 1), date(2026, 1, 30)).unwrap()
    }

    fn field_day(user: &str, day: u32, doctors: &[&str]) -> ActivityRecord {
        ActivityRecord::new(user, date(2026, 1, day), WorkType::FieldWork)
            .with_doctors(doctors.iter().copied())
    }

    fn approved(user: &str, day: u32, amount: i64) -> ExpenseRecord {
        ExpenseRecord {
            user_id: user.to_string(),
            date: date(2026, 1, day),
            amount: Decimal::from(amount),
            status: ExpenseStatus::Approved,
        }
    }

    /// Three reps: "busy" makes many calls cheaply, "frugal" spends nothing,
    /// "idle" files nothing.
    fn team_source() -> InMemoryRecordSource {
        InMemoryRecordSource::new()
            .with_representative(Representative::new("busy", "Busy Rep").with_manager("mgr"))
            .with_representative(Representative::new("frugal", "Frugal Rep").with_manager("mgr"))
            .with_representative(Representative::new("idle", "Idle Rep"))
            .with_activity(field_day("busy", 5, &["d1", "d2", "d3", "d4", "d5", "d6"]))
            .with_activity(field_day("busy", 6, &["d1", "d2", "d3", "d4", "d5", "d6"]))
            .with_expense(approved("busy", 5, 400))
            .with_activity(field_day("frugal", 5, &["d1"]))
    }

    #[test]
    fn test_new_rejects_invalid_weights() {
        let config = ScoringConfig {
            weights: KpiWeights {
                dcr_compliance: Decimal::ONE,
                ..KpiWeights::default()
            },
            ..ScoringConfig::default()
        };

        let err = PerformanceEngine::new(InMemoryRecordSource::new(), config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_config_dir_loads_shipped_config() {
        let engine =
            PerformanceEngine::from_config_dir(InMemoryRecordSource::new(), "./config").unwrap();
        assert_eq!(engine.config(), &ScoringConfig::default());
    }

    #[test]
    fn test_score_uses_peer_group_for_expense_baseline() {
        let engine = PerformanceEngine::with_default_config(team_source());

        let result = engine
            .score("busy", &january(), &PeerGroup::AllActive)
            .unwrap();

        // busy averages 200/day against a peer max of 200: zero efficiency.
        assert_eq!(result.kpis.expense_efficiency, Decimal::ZERO);
        assert_eq!(result.kpis.call_average, Decimal::from(6));
        assert_eq!(result.kpis.call_average_normalized, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_score_batch_matches_individual_scores() {
        let engine = PerformanceEngine::with_default_config(team_source());
        let users = vec!["idle".to_string(), "busy".to_string(), "frugal".to_string()];

        let batch = engine
            .score_batch(&users, &january(), &PeerGroup::AllActive)
            .unwrap();

        let ids: Vec<&str> = batch.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["idle", "busy", "frugal"]);
        for result in &batch {
            let single = engine
                .score(&result.user_id, &january(), &PeerGroup::AllActive)
                .unwrap();
            assert_eq!(&single, result);
        }
    }

    #[test]
    fn test_report_ranks_population() {
        let engine = PerformanceEngine::with_default_config(team_source());

        let report = engine.report(&january(), &PeerGroup::AllActive).unwrap();

        assert_eq!(report.total_users, 3);
        assert_eq!(report.engine_version, ENGINE_VERSION);
        assert_eq!(report.period_start, date(2026, 1, 1));
        assert_eq!(report.period_end, date(2026, 1, 30));
        let ranks: Vec<Option<u32>> = report.performances.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3)]);
        assert!(report
            .performances
            .windows(2)
            .all(|w| w[0].performance_score >= w[1].performance_score));
        assert_eq!(report.performances[2].user_id, "idle");

        let summary = report.summary.unwrap();
        assert_eq!(summary.highest, report.performances[0].performance_score);
        assert_eq!(summary.lowest, report.performances[2].performance_score);
    }

    #[test]
    fn test_report_for_empty_team_fails() {
        let engine = PerformanceEngine::with_default_config(team_source());
        let group = PeerGroup::Team {
            manager_id: "nobody".to_string(),
        };

        let err = engine.report(&january(), &group).unwrap_err();
        assert!(matches!(
            &err,
            EngineError::NoUsersFound { peer_group } if peer_group == "team of nobody"
        ));
    }

    #[test]
    fn test_report_ids_are_unique() {
        let engine = PerformanceEngine::with_default_config(team_source());
        let first = engine.report(&january(), &PeerGroup::AllActive).unwrap();
        let second = engine.report(&january(), &PeerGroup::AllActive).unwrap();

        assert_ne!(first.report_id, second.report_id);
        assert_eq!(first.performances, second.performances);
    }

    #[test]
    fn test_top_performers_truncates_to_limit() {
        let engine = PerformanceEngine::with_default_config(team_source());

        let top = engine
            .top_performers(&january(), &PeerGroup::AllActive, 2)
            .unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[1].rank, 2);
        assert!(top.iter().all(|t| t.user_id != "idle"));
    }

    #[test]
    fn test_top_performers_of_empty_group_is_empty() {
        let engine = PerformanceEngine::with_default_config(team_source());
        let group = PeerGroup::Users { user_ids: vec![] };

        assert!(engine.top_performers(&january(), &group, 10).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_listed_users_are_scored_once() {
        let engine = PerformanceEngine::with_default_config(team_source());
        let group = PeerGroup::Users {
            user_ids: vec!["busy".to_string(), "frugal".to_string(), "busy".to_string()],
        };

        let report = engine.report(&january(), &group).unwrap();
        assert_eq!(report.total_users, 2);
        let ids: Vec<&str> = report
            .performances
            .iter()
            .map(|p| p.user_id.as_str())
            .collect();
        assert_eq!(ids, vec!["busy", "frugal"]);

        let top = engine.top_performers(&january(), &group, 5).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].rank, 2);
    }

    #[test]
    fn test_team_peer_group_excludes_other_managers() {
        let source = team_source().with_leave(LeaveRecord {
            user_id: "frugal".to_string(),
            start_date: date(2026, 1, 12),
            end_date: date(2026, 1, 13),
            status: LeaveStatus::Approved,
        });
        let engine = PerformanceEngine::with_default_config(source);
        let group = PeerGroup::Team {
            manager_id: "mgr".to_string(),
        };

        let report = engine.report(&january(), &group).unwrap();

        assert_eq!(report.total_users, 2);
        let frugal = report
            .performances
            .iter()
            .find(|p| p.user_id == "frugal")
            .unwrap();
        assert_eq!(frugal.kpis.working_days, 19);
    }
}
