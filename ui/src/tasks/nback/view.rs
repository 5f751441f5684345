use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;
use time::OffsetDateTime;

use crate::core::timing::InstantStamp;
use crate::core::{format, platform, storage, timing};

use super::config::{SpatialViz, TrainerConfig};
use super::engine::{
    InputSide, LevelChange, NBackEngine, ScheduledAdvance, SessionOutcome, TickOutcome,
};
use super::stimulus::{ObserverPos, Position, Shape, Size, Stimulus};

const TICK_MS: u64 = 1000;

#[component]
pub fn TrainerView() -> Element {
    let engine = use_signal(|| NBackEngine::new(TrainerConfig::load()));
    let status_line = use_signal(|| "Press start to begin a session.".to_string());
    let feedback_line = use_signal(|| Option::<String>::None);
    let last_outcome = use_signal(|| Option::<SessionOutcome>::None);
    let last_error = use_signal(|| Option::<String>::None);

    let sender_slot: Rc<RefCell<Option<UnboundedSender<TrainerEvent>>>> =
        Rc::new(RefCell::new(None));
    let sender_slot_for_loop = sender_slot.clone();

    let coroutine = {
        let engine_ref = engine.clone();
        let status_ref = status_line.clone();
        let feedback_ref = feedback_line.clone();
        let outcome_ref = last_outcome.clone();
        let error_ref = last_error.clone();

        use_coroutine(move |mut rx: UnboundedReceiver<TrainerEvent>| {
            let sender_slot = sender_slot_for_loop.clone();
            let mut engine_signal = engine_ref.clone();
            let mut status_signal = status_ref.clone();
            let mut feedback_signal = feedback_ref.clone();
            let mut outcome_signal = outcome_ref.clone();
            let mut error_signal = error_ref.clone();

            async move {
                while let Some(event) = rx.next().await {
                    match event {
                        TrainerEvent::Start => {
                            error_signal.set(None);
                            outcome_signal.set(None);
                            feedback_signal.set(None);

                            let started = engine_signal.with_mut(|eng| {
                                // Pick up any settings saved since mount.
                                eng.config = TrainerConfig::load();
                                eng.start(timing::now())
                            });
                            match started {
                                Ok(update) => {
                                    status_signal.set("Session running.".to_string());
                                    queue_advance(sender_slot.clone(), update.schedule);
                                    if update.start_countdown {
                                        queue_tick(sender_slot.clone(), update.schedule.run_id);
                                    }
                                }
                                Err(err) => {
                                    status_signal.set(err.to_string());
                                }
                            }
                        }
                        TrainerEvent::Stop => {
                            engine_signal.with_mut(|eng| eng.stop());
                            status_signal.set("Session stopped. Nothing recorded.".to_string());
                            feedback_signal.set(None);
                        }
                        TrainerEvent::AdvanceDue { run_id, epoch } => {
                            let update = engine_signal
                                .with_mut(|eng| eng.advance_due(run_id, epoch, timing::now()));
                            if let Some(update) = update {
                                if update.missed {
                                    feedback_signal.set(Some("Missed: −5".to_string()));
                                }
                                if let Some(change) = update.level_change {
                                    status_signal.set(level_change_message(change));
                                }
                                if update.start_countdown {
                                    queue_tick(sender_slot.clone(), update.schedule.run_id);
                                }
                                queue_advance(sender_slot.clone(), update.schedule);
                            }
                        }
                        TrainerEvent::Respond { side, timestamp } => {
                            let feedback = engine_signal
                                .with_mut(|eng| eng.respond_side(side, timestamp));
                            if let Some(feedback) = feedback {
                                let verdict = if feedback.correct { "Correct" } else { "Wrong" };
                                feedback_signal.set(Some(format!(
                                    "{verdict}: {} ({:.0} ms)",
                                    format::format_points(feedback.points),
                                    feedback.reaction_ms.max(0.0)
                                )));
                                queue_advance(sender_slot.clone(), feedback.schedule);
                            }
                        }
                        TrainerEvent::Tick { run_id } => {
                            let outcome = engine_signal.with_mut(|eng| eng.tick(run_id));
                            match outcome {
                                TickOutcome::Running { .. } => {
                                    queue_tick(sender_slot.clone(), run_id);
                                }
                                TickOutcome::Finished(outcome) => {
                                    finalize_session(
                                        &outcome,
                                        engine_signal.clone(),
                                        status_signal.clone(),
                                        error_signal.clone(),
                                    );
                                    outcome_signal.set(Some(outcome));
                                    feedback_signal.set(None);
                                }
                                TickOutcome::Ignored => {}
                            }
                        }
                    }
                }
            }
        })
    };

    sender_slot.borrow_mut().replace(coroutine.tx());

    let send_event = {
        let coroutine = coroutine.clone();
        move |event: TrainerEvent| {
            coroutine.send(event);
        }
    };

    let respond = {
        let send_event = send_event.clone();
        move |side: InputSide| {
            send_event(TrainerEvent::Respond {
                side,
                timestamp: timing::now(),
            });
        }
    };

    let snapshot = engine.with(|eng| TrainerSnapshot::capture(eng));
    let status = status_line();
    let feedback = feedback_line();
    let outcome = last_outcome();
    let error_message = last_error();

    let respond_left = respond.clone();
    let respond_right = respond.clone();
    let respond_keys = respond.clone();

    rsx! {
        article { class: "task task-trainer",
            div { class: "task-trainer__header",
                h2 { "Perspective n-back" }
                p { "Decide whether the highlighted attribute matches the stimulus from {snapshot.level} trial(s) ago." }
            }

            div { class: "task-trainer__controls",
                button {
                    r#type: "button",
                    class: "task-trainer__start",
                    disabled: snapshot.running,
                    onclick: move |_| send_event(TrainerEvent::Start),
                    "Start"
                }
                button {
                    r#type: "button",
                    class: "task-trainer__stop",
                    disabled: !snapshot.running,
                    onclick: move |_| send_event(TrainerEvent::Stop),
                    "Stop"
                }
            }

            div { class: "task-trainer__hud",
                span { class: "task-trainer__stat", "Score: {snapshot.score}" }
                span { class: "task-trainer__stat", "Level: {snapshot.level}-back" }
                span { class: "task-trainer__stat", "Rule: {snapshot.rule_label}" }
                if let Some(clock) = snapshot.clock.as_ref() {
                    span { class: "task-trainer__stat", "Time: {clock}" }
                }
            }

            div {
                class: "task-trainer__stage",
                tabindex: 0,
                role: "application",
                aria_label: "n-back stimulus stage",
                onkeydown: move |evt| {
                    let key = evt.key().to_string().to_lowercase();
                    if key == "arrowleft" {
                        evt.prevent_default();
                        respond_keys(InputSide::Left);
                    } else if key == "arrowright" {
                        evt.prevent_default();
                        respond_keys(InputSide::Right);
                    }
                },

                if let Some(stim) = snapshot.stimulus.as_ref() {
                    {render_stimulus(stim, &snapshot)}
                } else {
                    p { class: "task-trainer__placeholder", "{status}" }
                }
            }

            div { class: "task-trainer__responses",
                button {
                    r#type: "button",
                    class: "task-trainer__respond task-trainer__respond--left",
                    disabled: !snapshot.judgeable,
                    onclick: move |_| respond_left(InputSide::Left),
                    "{snapshot.left_label}"
                }
                button {
                    r#type: "button",
                    class: "task-trainer__respond task-trainer__respond--right",
                    disabled: !snapshot.judgeable,
                    onclick: move |_| respond_right(InputSide::Right),
                    "{snapshot.right_label}"
                }
            }

            if let Some(feedback) = feedback {
                p { class: "task-trainer__feedback", "{feedback}" }
            }

            if snapshot.running {
                p { class: "task-trainer__status", "{status}" }
            }

            if let Some(outcome) = outcome {
                div { class: "task-trainer__summary",
                    h3 { "Session complete" }
                    ul {
                        li { "Score: {outcome.summary.score}" }
                        li { "Accuracy: {format::format_percent(outcome.summary.accuracy)}" }
                        li { "Trials: {outcome.summary.trials} ({outcome.summary.mistakes} mistakes)" }
                        li { "Played at {outcome.summary.level}-back" }
                        if outcome.level_after != outcome.summary.level {
                            li { "Next session starts at {outcome.level_after}-back" }
                        }
                    }
                }
            }

            if let Some(err) = error_message {
                div { class: "task-trainer__error", "⚠️ {err}" }
            }
        }
    }
}

/// Plain-data snapshot of the engine for rendering, captured once per render
/// to keep the rsx body free of engine borrows.
struct TrainerSnapshot {
    running: bool,
    judgeable: bool,
    score: i64,
    level: u32,
    rule_label: &'static str,
    clock: Option<String>,
    stimulus: Option<Stimulus>,
    left_label: &'static str,
    right_label: &'static str,
    stroop: bool,
    folding_net: bool,
    perspective: bool,
}

impl TrainerSnapshot {
    fn capture(eng: &NBackEngine) -> Self {
        let running = eng.is_running();
        let (left_label, right_label) = if eng.session.controls_swapped {
            ("Different", "Match")
        } else {
            ("Match", "Different")
        };
        Self {
            running,
            judgeable: running && eng.judgeable() && !eng.session.responded,
            score: eng.session.score,
            level: eng.session.level,
            rule_label: eng.session.rule.label(),
            clock: (eng.config.timer && running)
                .then(|| format::format_clock(eng.session.remaining_secs)),
            stimulus: running.then(|| eng.current().cloned()).flatten(),
            left_label,
            right_label,
            stroop: eng.config.stroop,
            folding_net: eng.config.spatial_perspective()
                && eng.config.spatial_viz == SpatialViz::Folding,
            perspective: eng.config.perspective,
        }
    }
}

fn render_stimulus(stim: &Stimulus, snapshot: &TrainerSnapshot) -> Element {
    let size_class = match stim.size {
        Size::Small => "stimulus--small",
        Size::Medium => "stimulus--medium",
        Size::Large => "stimulus--large",
    };
    let shape_class = match stim.shape {
        Shape::Cube => "stimulus--cube",
        Shape::Sphere => "stimulus--sphere",
        Shape::Pyramid => "stimulus--pyramid",
    };
    let color_css = stim.color.css();
    let ink_css = stim.stroop.ink.css();
    let word_label = stim.stroop.word.label();

    rsx! {
        div { class: "task-trainer__scene",
            if snapshot.perspective && stim.observer_pos == ObserverPos::Opposite {
                span { class: "task-trainer__observer", "seen from the opposite side" }
            }

            div { class: "task-trainer__slots",
                for slot in Position::ALL {
                    div { class: format!(
                            "task-trainer__slot {}",
                            if stim.position == slot { "task-trainer__slot--occupied" } else { "" }
                        ),
                        if stim.position == slot {
                            div {
                                class: "stimulus {shape_class} {size_class}",
                                style: "background: {color_css};",
                                if snapshot.stroop {
                                    span {
                                        class: "stimulus__stroop",
                                        style: "color: {ink_css};",
                                        "{word_label}"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            if snapshot.folding_net {
                div { class: "task-trainer__net",
                    for face in stim.net_colors {
                        span {
                            class: "task-trainer__net-face",
                            style: format!("background: {};", face.css()),
                        }
                    }
                }
            }
        }
    }
}

/// Persists the session record and the adjusted level. Timeout is the only
/// path that reaches here; a manual stop records nothing.
fn finalize_session(
    outcome: &SessionOutcome,
    mut engine: Signal<NBackEngine>,
    mut status_line: Signal<String>,
    mut last_error: Signal<Option<String>>,
) {
    let record = outcome.summary.to_record(OffsetDateTime::now_utc());
    match storage::append_session(&record) {
        Ok(()) => {
            last_error.set(None);
            status_line.set("Time's up. Session saved.".to_string());
        }
        Err(err) => {
            last_error.set(Some(format!("Failed to persist session: {err}")));
        }
    }

    let mut config = TrainerConfig::load();
    if config.nback != outcome.level_after {
        config.nback = outcome.level_after;
        if let Err(err) = config.save() {
            last_error.set(Some(format!("Failed to persist level: {err}")));
        }
    }
    engine.with_mut(|eng| eng.config = config);
}

fn level_change_message(change: LevelChange) -> String {
    match change {
        LevelChange::Promoted(level) => format!("Level up: now {level}-back."),
        LevelChange::Demoted(level) => format!("Level down: now {level}-back."),
    }
}

fn queue_advance(
    sender_slot: Rc<RefCell<Option<UnboundedSender<TrainerEvent>>>>,
    schedule: ScheduledAdvance,
) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            timing::sleep_ms(schedule.delay_ms).await;
            let _ = sender.unbounded_send(TrainerEvent::AdvanceDue {
                run_id: schedule.run_id,
                epoch: schedule.epoch,
            });
        });
    }
}

fn queue_tick(sender_slot: Rc<RefCell<Option<UnboundedSender<TrainerEvent>>>>, run_id: u64) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            timing::sleep_ms(TICK_MS).await;
            let _ = sender.unbounded_send(TrainerEvent::Tick { run_id });
        });
    }
}

#[derive(Debug, Clone)]
enum TrainerEvent {
    Start,
    Stop,
    AdvanceDue { run_id: u64, epoch: u64 },
    Respond { side: InputSide, timestamp: InstantStamp },
    Tick { run_id: u64 },
}
