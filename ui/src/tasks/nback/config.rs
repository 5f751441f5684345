//! Player-chosen trainer options, persisted independently of session state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::storage::{self, StorageError, SETTINGS_KEY};

/// A stimulus dimension eligible to be the judged attribute of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAttribute {
    Color,
    Shape,
    Size,
    Position,
}

impl RuleAttribute {
    pub const ALL: [RuleAttribute; 4] = [
        RuleAttribute::Color,
        RuleAttribute::Shape,
        RuleAttribute::Size,
        RuleAttribute::Position,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RuleAttribute::Color => "Color",
            RuleAttribute::Shape => "Shape",
            RuleAttribute::Size => "Size",
            RuleAttribute::Position => "Position",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerspectiveKind {
    Symbolic,
    Spatial,
}

/// How a spatial-perspective stimulus is animated for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialViz {
    Rotation,
    Folding,
    Cutout,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Judge what each observer actually sees.
    View,
    /// Judge the object itself, independent of viewpoint.
    Object,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainerConfig {
    /// Ordered, non-empty subset of the judgeable attributes.
    pub active_rules: Vec<RuleAttribute>,
    /// Current n-back level, carried across sessions. Always ≥ 1.
    pub nback: u32,
    pub auto_progress: bool,
    pub perspective: bool,
    pub perspective_kind: PerspectiveKind,
    pub spatial_viz: SpatialViz,
    pub match_strategy: MatchStrategy,
    pub stroop: bool,
    pub visual_noise: bool,
    pub control_swap: bool,
    pub timer: bool,
    pub session_secs: u32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            active_rules: vec![RuleAttribute::Color],
            nback: 1,
            auto_progress: true,
            perspective: false,
            perspective_kind: PerspectiveKind::Symbolic,
            spatial_viz: SpatialViz::Rotation,
            match_strategy: MatchStrategy::View,
            stroop: false,
            visual_noise: false,
            control_swap: false,
            timer: true,
            session_secs: 180,
        }
    }
}

impl TrainerConfig {
    /// Rebuilds a config from a stored JSON value, field by field. A field
    /// that is missing or fails to decode falls back to its default without
    /// discarding the rest of the record.
    pub fn from_value(value: &Value) -> Self {
        let mut cfg = Self::default();

        if let Some(rules) = field(value, "active_rules") {
            cfg.active_rules = rules;
        }
        if let Some(nback) = field(value, "nback") {
            cfg.nback = nback;
        }
        if let Some(auto) = field(value, "auto_progress") {
            cfg.auto_progress = auto;
        }
        if let Some(on) = field(value, "perspective") {
            cfg.perspective = on;
        }
        if let Some(kind) = field(value, "perspective_kind") {
            cfg.perspective_kind = kind;
        }
        if let Some(viz) = field(value, "spatial_viz") {
            cfg.spatial_viz = viz;
        }
        if let Some(strategy) = field(value, "match_strategy") {
            cfg.match_strategy = strategy;
        }
        if let Some(on) = field(value, "stroop") {
            cfg.stroop = on;
        }
        if let Some(on) = field(value, "visual_noise") {
            cfg.visual_noise = on;
        }
        if let Some(on) = field(value, "control_swap") {
            cfg.control_swap = on;
        }
        if let Some(on) = field(value, "timer") {
            cfg.timer = on;
        }
        if let Some(secs) = field(value, "session_secs") {
            cfg.session_secs = secs;
        }

        cfg.nback = cfg.nback.max(1);
        cfg
    }

    pub fn load() -> Self {
        storage::read_value(SETTINGS_KEY)
            .ok()
            .flatten()
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), StorageError> {
        storage::write_json(SETTINGS_KEY, self)
    }

    pub fn rule_active(&self, rule: RuleAttribute) -> bool {
        self.active_rules.contains(&rule)
    }

    pub fn spatial_perspective(&self) -> bool {
        self.perspective && self.perspective_kind == PerspectiveKind::Spatial
    }
}

fn field<T: DeserializeOwned>(value: &Value, key: &str) -> Option<T> {
    value
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
}
