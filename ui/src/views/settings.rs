use dioxus::prelude::*;

use crate::tasks::nback::config::{
    MatchStrategy, PerspectiveKind, RuleAttribute, SpatialViz, TrainerConfig,
};

const SESSION_LENGTHS: [(u32, &str); 5] = [
    (60, "1 minute"),
    (120, "2 minutes"),
    (180, "3 minutes"),
    (300, "5 minutes"),
    (600, "10 minutes"),
];

#[component]
pub fn Settings() -> Element {
    let mut config = use_signal(TrainerConfig::load);
    let mut status = use_signal(|| Option::<String>::None);

    let cfg = config();
    let spatial = cfg.spatial_perspective();

    let on_save = move |_| match config().save() {
        Ok(()) => status.set(Some("Settings saved.".to_string())),
        Err(err) => status.set(Some(format!("Couldn't save settings: {err}"))),
    };

    rsx! {
        section { class: "page page-settings",
            h1 { "Settings" }
            p { "Changes apply the next time a session starts." }

            form { class: "settings",
                onsubmit: move |evt| evt.prevent_default(),

                fieldset { class: "settings__group",
                    legend { "Trained attributes" }
                    p { class: "settings__hint",
                        "Each trial judges one of the checked attributes, chosen at random."
                    }
                    for rule in RuleAttribute::ALL {
                        label { class: "settings__check",
                            input {
                                r#type: "checkbox",
                                checked: cfg.rule_active(rule),
                                // Spatial perspective only transforms color and
                                // position; shape and size would be plain n-back.
                                disabled: spatial
                                    && matches!(rule, RuleAttribute::Shape | RuleAttribute::Size),
                                onchange: move |evt| {
                                    config.with_mut(|c| set_rule(c, rule, evt.checked()));
                                },
                            }
                            "{rule.label()}"
                        }
                    }
                }

                fieldset { class: "settings__group",
                    legend { "Difficulty" }
                    label { class: "settings__field",
                        span { "n-back level" }
                        input {
                            r#type: "number",
                            min: "1",
                            value: "{cfg.nback}",
                            oninput: move |evt| {
                                if let Ok(level) = evt.value().parse::<u32>() {
                                    config.with_mut(|c| c.nback = level.max(1));
                                }
                            },
                        }
                    }
                    label { class: "settings__check",
                        input {
                            r#type: "checkbox",
                            checked: cfg.auto_progress,
                            onchange: move |evt| {
                                config.with_mut(|c| c.auto_progress = evt.checked());
                            },
                        }
                        "Adjust level automatically from accuracy"
                    }
                    label { class: "settings__check",
                        input {
                            r#type: "checkbox",
                            checked: cfg.control_swap,
                            onchange: move |evt| {
                                config.with_mut(|c| c.control_swap = evt.checked());
                            },
                        }
                        "Occasionally swap the match/different buttons"
                    }
                }

                fieldset { class: "settings__group",
                    legend { "Perspective" }
                    label { class: "settings__check",
                        input {
                            r#type: "checkbox",
                            checked: cfg.perspective,
                            onchange: move |evt| {
                                config.with_mut(|c| c.perspective = evt.checked());
                            },
                        }
                        "Judge some trials from another observer's viewpoint"
                    }
                    label { class: "settings__field",
                        span { "Mode" }
                        select {
                            disabled: !cfg.perspective,
                            value: "{kind_value(cfg.perspective_kind)}",
                            oninput: move |evt| {
                                if let Some(kind) = parse_kind(&evt.value()) {
                                    config.with_mut(|c| c.perspective_kind = kind);
                                }
                            },
                            option { value: "symbolic", "Symbolic (relabeled attributes)" }
                            option { value: "spatial", "Spatial (mirrored scene)" }
                        }
                    }
                    label { class: "settings__field",
                        span { "Spatial visualization" }
                        select {
                            disabled: !spatial,
                            value: "{viz_value(cfg.spatial_viz)}",
                            oninput: move |evt| {
                                if let Some(viz) = parse_viz(&evt.value()) {
                                    config.with_mut(|c| c.spatial_viz = viz);
                                }
                            },
                            option { value: "rotation", "Rotating cube" }
                            option { value: "folding", "Unfolded cube net" }
                            option { value: "cutout", "Hollow cutout" }
                            option { value: "instant", "Instant" }
                        }
                    }
                    label { class: "settings__field",
                        span { "Match on" }
                        select {
                            disabled: !spatial,
                            value: "{strategy_value(cfg.match_strategy)}",
                            oninput: move |evt| {
                                if let Some(strategy) = parse_strategy(&evt.value()) {
                                    config.with_mut(|c| c.match_strategy = strategy);
                                }
                            },
                            option { value: "view", "What the observer sees" }
                            option { value: "object", "The object itself" }
                        }
                    }
                }

                fieldset { class: "settings__group",
                    legend { "Distractors" }
                    label { class: "settings__check",
                        input {
                            r#type: "checkbox",
                            checked: cfg.stroop,
                            onchange: move |evt| {
                                config.with_mut(|c| c.stroop = evt.checked());
                            },
                        }
                        "Stroop color words on the stimulus"
                    }
                    label { class: "settings__check",
                        input {
                            r#type: "checkbox",
                            checked: cfg.visual_noise,
                            onchange: move |evt| {
                                config.with_mut(|c| c.visual_noise = evt.checked());
                            },
                        }
                        "Vary untrained attributes as visual noise"
                    }
                }

                fieldset { class: "settings__group",
                    legend { "Session" }
                    label { class: "settings__check",
                        input {
                            r#type: "checkbox",
                            checked: cfg.timer,
                            onchange: move |evt| {
                                config.with_mut(|c| c.timer = evt.checked());
                            },
                        }
                        "Timed session (required for recorded results)"
                    }
                    label { class: "settings__field",
                        span { "Duration" }
                        select {
                            disabled: !cfg.timer,
                            value: "{cfg.session_secs}",
                            oninput: move |evt| {
                                if let Ok(secs) = evt.value().parse::<u32>() {
                                    config.with_mut(|c| c.session_secs = secs);
                                }
                            },
                            for (secs, label) in SESSION_LENGTHS {
                                option { value: "{secs}", "{label}" }
                            }
                        }
                    }
                }

                button {
                    r#type: "button",
                    class: "settings__save",
                    onclick: on_save,
                    "Save"
                }

                if let Some(message) = status() {
                    p { class: "settings__status", "{message}" }
                }
            }
        }
    }
}

fn set_rule(cfg: &mut TrainerConfig, rule: RuleAttribute, on: bool) {
    if on {
        if !cfg.active_rules.contains(&rule) {
            cfg.active_rules.push(rule);
        }
    } else {
        cfg.active_rules.retain(|active| *active != rule);
    }
}

fn kind_value(kind: PerspectiveKind) -> &'static str {
    match kind {
        PerspectiveKind::Symbolic => "symbolic",
        PerspectiveKind::Spatial => "spatial",
    }
}

fn parse_kind(raw: &str) -> Option<PerspectiveKind> {
    match raw {
        "symbolic" => Some(PerspectiveKind::Symbolic),
        "spatial" => Some(PerspectiveKind::Spatial),
        _ => None,
    }
}

fn viz_value(viz: SpatialViz) -> &'static str {
    match viz {
        SpatialViz::Rotation => "rotation",
        SpatialViz::Folding => "folding",
        SpatialViz::Cutout => "cutout",
        SpatialViz::Instant => "instant",
    }
}

fn parse_viz(raw: &str) -> Option<SpatialViz> {
    match raw {
        "rotation" => Some(SpatialViz::Rotation),
        "folding" => Some(SpatialViz::Folding),
        "cutout" => Some(SpatialViz::Cutout),
        "instant" => Some(SpatialViz::Instant),
        _ => None,
    }
}

fn strategy_value(strategy: MatchStrategy) -> &'static str {
    match strategy {
        MatchStrategy::View => "view",
        MatchStrategy::Object => "object",
    }
}

fn parse_strategy(raw: &str) -> Option<MatchStrategy> {
    match raw {
        "view" => Some(MatchStrategy::View),
        "object" => Some(MatchStrategy::Object),
        _ => None,
    }
}
