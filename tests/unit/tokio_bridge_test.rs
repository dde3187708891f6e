//! Tests for the async entry points

use std::sync::Arc;

use festival_scheduler::builders::FestivalBuilder;
use festival_scheduler::config::{FestivalConfig, Roster};
use festival_scheduler::core::{AbandonReason, FixedDecisions, Outcome, StageKind};
use festival_scheduler::runtime::{perform_async, run_async};

fn config() -> FestivalConfig {
    FestivalConfig {
        acoustic_stages: 1,
        electric_stages: 0,
        coordinators: 1,
        min_performance_ms: 200,
        max_performance_ms: 200,
        max_wait_ms: 100,
        join_bonus_ms: 5,
        collection_ms: 0,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_async_completes_roster() {
    let roster = Roster::parse("A v 0\nB s 0.02\n").unwrap();
    let festival = Arc::new(
        FestivalBuilder::new(config())
            .with_decisions(FixedDecisions::new(StageKind::Acoustic, false))
            .build(&roster)
            .unwrap(),
    );
    let report = run_async(Arc::clone(&festival), roster).await.unwrap();
    assert_eq!(report.outcome(2), Some(Outcome::Joined { host: 1 }));
    festival.check_invariants().unwrap();
}

#[tokio::test]
async fn test_perform_async_reports_impatience() {
    // A bass player on a festival with no electric stage.
    let roster = Roster::parse("Bassist b 0\n").unwrap();
    let festival = Arc::new(FestivalBuilder::new(config()).build(&roster).unwrap());
    let performer = roster.performers()[0].clone();
    let outcome = perform_async(festival, performer).await.unwrap();
    assert_eq!(outcome, Outcome::Abandoned(AbandonReason::Impatience));
}
