//! End-to-end session flows driven through the public engine API, with
//! injected timestamps and seeded randomness.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use ui::tasks::nback::config::{RuleAttribute, TrainerConfig};
use ui::tasks::nback::engine::{
    InputSide, NBackEngine, ResponseAction, ScheduledAdvance, TickOutcome,
};

fn untimed_config() -> TrainerConfig {
    let mut cfg = TrainerConfig::default();
    cfg.timer = false;
    cfg.auto_progress = false;
    cfg
}

fn engine(cfg: TrainerConfig, seed: u64) -> NBackEngine {
    NBackEngine::with_rng(cfg, SmallRng::seed_from_u64(seed))
}

/// The correct response for the current trial. Perspective is off in these
/// flows, so the raw color comparison is the ground truth.
fn truthful_action(eng: &NBackEngine) -> ResponseAction {
    let n = eng.session.level as usize;
    let len = eng.history.len();
    if eng.history[len - 1].color == eng.history[len - 1 - n].color {
        ResponseAction::Match
    } else {
        ResponseAction::NonMatch
    }
}

#[test]
fn long_untimed_session_with_perfect_play_never_penalizes() {
    let mut eng = engine(untimed_config(), 101);
    let first = eng.start(0.0).expect("session starts");
    let mut schedule: ScheduledAdvance = first.schedule;
    let mut clock = 0.0;

    for _ in 0..50 {
        clock += 100.0;
        let update = eng
            .advance_due(schedule.run_id, schedule.epoch, clock)
            .expect("advance fires");
        assert!(!update.missed, "perfect play never misses");
        schedule = update.schedule;

        if eng.judgeable() {
            clock += 50.0;
            let fb = eng.respond(truthful_action(&eng), clock).expect("response");
            assert!(fb.correct);
            assert!(fb.points > 0);
            schedule = fb.schedule;
        }
    }

    assert_eq!(eng.session.mistakes, 0);
    assert_eq!(eng.session.trials, 50, "every judgeable trial was answered");
    assert!(eng.session.score > 0);
    assert_eq!(
        eng.session.level, 1,
        "auto-progress is off, level never moves"
    );
}

#[test]
fn manual_stop_leaves_no_finishable_session_behind() {
    let mut cfg = untimed_config();
    cfg.timer = true;
    cfg.session_secs = 2;
    let mut eng = engine(cfg, 102);

    let first = eng.start(0.0).expect("session starts");
    let second = eng
        .advance_due(first.schedule.run_id, first.schedule.epoch, 5.0)
        .expect("advance fires");
    assert!(second.start_countdown);
    let run_id = second.schedule.run_id;

    eng.stop();

    // Pending callbacks from the stopped run must all be no-ops; in
    // particular the countdown can never produce a session outcome.
    assert_eq!(eng.tick(run_id), TickOutcome::Ignored);
    assert_eq!(eng.tick(run_id), TickOutcome::Ignored);
    assert!(eng
        .advance_due(second.schedule.run_id, second.schedule.epoch, 10.0)
        .is_none());
    assert!(eng.respond(ResponseAction::Match, 10.0).is_none());
}

#[test]
fn tick_is_inert_for_untimed_sessions() {
    let mut eng = engine(untimed_config(), 103);
    let first = eng.start(0.0).expect("session starts");
    eng.advance_due(first.schedule.run_id, first.schedule.epoch, 5.0)
        .expect("advance fires");

    assert_eq!(eng.tick(eng.run_id), TickOutcome::Ignored);
    assert!(eng.is_running(), "session keeps going without a clock");
}

#[test]
fn timed_session_finishes_and_reports_the_adjusted_level() {
    let mut cfg = untimed_config();
    cfg.timer = true;
    cfg.auto_progress = true;
    cfg.session_secs = 3;
    let mut eng = engine(cfg, 104);

    let first = eng.start(0.0).expect("session starts");
    let second = eng
        .advance_due(first.schedule.run_id, first.schedule.epoch, 5.0)
        .expect("advance fires");
    let run_id = second.schedule.run_id;

    let fb = eng.respond(truthful_action(&eng), 6.0).expect("response");
    assert!(fb.correct);

    assert_eq!(eng.tick(run_id), TickOutcome::Running { remaining_secs: 2 });
    assert_eq!(eng.tick(run_id), TickOutcome::Running { remaining_secs: 1 });
    let outcome = match eng.tick(run_id) {
        TickOutcome::Finished(outcome) => outcome,
        other => panic!("expected finished session, got {other:?}"),
    };

    assert_eq!(outcome.summary.trials, 1);
    assert_eq!(outcome.summary.accuracy, 100.0);
    assert_eq!(outcome.summary.level, 1);
    assert_eq!(outcome.level_after, 2);
    assert!(!eng.is_running());

    let record = outcome
        .summary
        .to_record(time::macros::datetime!(2026-08-30 09:00:00 UTC));
    assert_eq!(record.nback, 1, "the record keeps the level as played");
    assert_eq!(record.score, outcome.summary.score);
}

#[test]
fn side_input_matches_explicit_action_under_swapped_controls() {
    // Two engines with the same seed produce identical trial streams; one is
    // driven by sides, the other by explicit actions.
    let mut by_side = engine(untimed_config(), 105);
    let mut by_action = engine(untimed_config(), 105);

    let first_a = by_side.start(0.0).expect("session starts");
    let first_b = by_action.start(0.0).expect("session starts");
    by_side
        .advance_due(first_a.schedule.run_id, first_a.schedule.epoch, 5.0)
        .expect("advance fires");
    by_action
        .advance_due(first_b.schedule.run_id, first_b.schedule.epoch, 5.0)
        .expect("advance fires");

    by_side.session.controls_swapped = true;
    by_action.session.controls_swapped = true;

    // Swapped: the right side now means "match".
    let fb_side = by_side
        .respond_side(InputSide::Right, 10.0)
        .expect("side response");
    let fb_action = by_action
        .respond(ResponseAction::Match, 10.0)
        .expect("action response");

    assert_eq!(fb_side.correct, fb_action.correct);
    assert_eq!(fb_side.points, fb_action.points);
}

#[test]
fn restart_invalidates_the_previous_run() {
    let mut eng = engine(untimed_config(), 106);
    let first = eng.start(0.0).expect("session starts");
    let stale = first.schedule;

    let restarted = eng.start(100.0).expect("session restarts");
    assert_ne!(restarted.schedule.run_id, stale.run_id);
    assert!(eng.advance_due(stale.run_id, stale.epoch, 200.0).is_none());
    assert!(eng
        .advance_due(restarted.schedule.run_id, restarted.schedule.epoch, 200.0)
        .is_some());
}

#[test]
fn rule_rotation_only_draws_from_active_rules() {
    let mut cfg = untimed_config();
    cfg.active_rules = vec![RuleAttribute::Color, RuleAttribute::Position];
    let mut eng = engine(cfg, 107);
    let first = eng.start(0.0).expect("session starts");
    let mut schedule = first.schedule;

    let mut seen_color = false;
    let mut seen_position = false;
    for i in 0..100 {
        let update = eng
            .advance_due(schedule.run_id, schedule.epoch, i as f64)
            .expect("advance fires");
        schedule = update.schedule;
        match update.rule {
            RuleAttribute::Color => seen_color = true,
            RuleAttribute::Position => seen_position = true,
            other => panic!("inactive rule {other:?} was drawn"),
        }
    }
    assert!(seen_color && seen_position);
}
