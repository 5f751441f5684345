//! Stimulus attributes and the per-trial generator.

use rand::Rng;

use super::config::{RuleAttribute, SpatialViz, TrainerConfig};
use crate::core::timing::InstantStamp;

/// Probability that a stimulus is presented from the player's own viewpoint.
pub const OBSERVER_ME_CHANCE: f64 = 0.7;

/// Cube-net slots that must agree with the cube's own front/back colors.
const NET_FRONT: usize = 2;
const NET_BACK: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Color::Red => "#d64545",
            Color::Green => "#3f9e4d",
            Color::Blue => "#3b6fd4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cube,
    Sphere,
    Pyramid,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Cube, Shape::Sphere, Shape::Pyramid];
    pub const DEFAULT: Shape = Shape::Cube;
    /// The shapes that have a hollow rendering for the cutout visualization.
    pub const CUTOUT: [Shape; 2] = [Shape::Cube, Shape::Sphere];

    pub fn index(self) -> usize {
        match self {
            Shape::Cube => 0,
            Shape::Sphere => 1,
            Shape::Pyramid => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Sphere => "sphere",
            Shape::Pyramid => "pyramid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];
    pub const DEFAULT: Size = Size::Medium;

    pub fn index(self) -> usize {
        match self {
            Size::Small => 0,
            Size::Medium => 1,
            Size::Large => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Left,
    Center,
    Right,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Left, Position::Center, Position::Right];
    pub const DEFAULT: Position = Position::Center;

    pub fn index(self) -> usize {
        match self {
            Position::Left => 0,
            Position::Center => 1,
            Position::Right => 2,
        }
    }

    /// Left/right as seen by a viewer facing the opposite direction.
    pub fn mirrored(self) -> Position {
        match self {
            Position::Left => Position::Right,
            Position::Center => Position::Center,
            Position::Right => Position::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Center => "center",
            Position::Right => "right",
        }
    }
}

/// Whose viewpoint the stimulus must be interpreted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverPos {
    Me,
    Opposite,
}

/// A color word rendered in a possibly-different ink, shown as a distractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StroopCue {
    pub word: Color,
    pub ink: Color,
}

/// One presented trial item. The creation stamp doubles as identity and as
/// the reaction-time clock origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Stimulus {
    pub color: Color,
    /// Always differs from `color`.
    pub back_color: Color,
    /// Cube-net face colors; slots 2 and 5 mirror `color` and `back_color`.
    pub net_colors: [Color; 6],
    pub shape: Shape,
    pub size: Size,
    pub position: Position,
    pub stroop: StroopCue,
    pub observer_pos: ObserverPos,
    pub created_at: InstantStamp,
}

/// Draws a new stimulus for the next trial.
///
/// Attributes that are neither the judged rule nor covered by visual noise
/// stay at their defaults so they carry no signal. `last_word` is the Stroop
/// word of the previous trial; an immediate repeat is resampled once
/// (best-effort, not guaranteed).
pub fn generate(
    cfg: &TrainerConfig,
    last_word: Option<Color>,
    rng: &mut impl Rng,
    now: InstantStamp,
) -> Stimulus {
    let color = draw(&Color::ALL, rng);
    let mut back_color = draw(&Color::ALL, rng);
    while back_color == color {
        back_color = draw(&Color::ALL, rng);
    }

    let mut net_colors = [Color::Red; 6];
    for slot in net_colors.iter_mut() {
        *slot = draw(&Color::ALL, rng);
    }
    net_colors[NET_FRONT] = color;
    net_colors[NET_BACK] = back_color;

    // The dual-color mesh for rotation/folding only exists for the cube, so
    // spatial perspective pins the shape; the cutout visualization instead
    // picks between the two hollow-capable shapes.
    let shape = if cfg.spatial_perspective() {
        if cfg.spatial_viz == SpatialViz::Cutout {
            draw(&Shape::CUTOUT, rng)
        } else {
            Shape::DEFAULT
        }
    } else if cfg.rule_active(RuleAttribute::Shape) || cfg.visual_noise {
        draw(&Shape::ALL, rng)
    } else {
        Shape::DEFAULT
    };

    let size = if cfg.rule_active(RuleAttribute::Size) || cfg.visual_noise {
        draw(&Size::ALL, rng)
    } else {
        Size::DEFAULT
    };

    let position = if cfg.rule_active(RuleAttribute::Position) || cfg.visual_noise {
        draw(&Position::ALL, rng)
    } else {
        Position::DEFAULT
    };

    let mut word = draw(&Color::ALL, rng);
    if last_word == Some(word) {
        word = draw(&Color::ALL, rng);
    }
    let ink = draw(&Color::ALL, rng);

    let observer_pos = if rng.gen_bool(OBSERVER_ME_CHANCE) {
        ObserverPos::Me
    } else {
        ObserverPos::Opposite
    };

    Stimulus {
        color,
        back_color,
        net_colors,
        shape,
        size,
        position,
        stroop: StroopCue { word, ink },
        observer_pos,
        created_at: now,
    }
}

fn draw<T: Copy>(values: &[T], rng: &mut impl Rng) -> T {
    values[rng.gen_range(0..values.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::nback::config::{PerspectiveKind, TrainerConfig};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn back_color_and_net_invariants_hold() {
        let cfg = TrainerConfig::default();
        let mut rng = rng(7);
        for trial in 0..500 {
            let s = generate(&cfg, None, &mut rng, trial as f64);
            assert_ne!(s.back_color, s.color);
            assert_eq!(s.net_colors[2], s.color);
            assert_eq!(s.net_colors[5], s.back_color);
        }
    }

    #[test]
    fn inactive_attributes_stay_at_defaults() {
        // Only color is active and noise is off.
        let cfg = TrainerConfig::default();
        let mut rng = rng(11);
        for trial in 0..200 {
            let s = generate(&cfg, None, &mut rng, trial as f64);
            assert_eq!(s.shape, Shape::DEFAULT);
            assert_eq!(s.size, Size::DEFAULT);
            assert_eq!(s.position, Position::DEFAULT);
        }
    }

    #[test]
    fn visual_noise_varies_distractor_attributes() {
        let mut cfg = TrainerConfig::default();
        cfg.visual_noise = true;
        let mut rng = rng(13);
        let mut saw_nondefault = false;
        for trial in 0..100 {
            let s = generate(&cfg, None, &mut rng, trial as f64);
            if s.shape != Shape::DEFAULT || s.size != Size::DEFAULT || s.position != Position::DEFAULT
            {
                saw_nondefault = true;
            }
        }
        assert!(saw_nondefault);
    }

    #[test]
    fn spatial_perspective_pins_shape_to_cube() {
        let mut cfg = TrainerConfig::default();
        cfg.perspective = true;
        cfg.perspective_kind = PerspectiveKind::Spatial;
        cfg.spatial_viz = SpatialViz::Rotation;
        cfg.visual_noise = true;
        cfg.active_rules.push(RuleAttribute::Shape);

        let mut rng = rng(17);
        for trial in 0..200 {
            let s = generate(&cfg, None, &mut rng, trial as f64);
            assert_eq!(s.shape, Shape::DEFAULT);
        }
    }

    #[test]
    fn cutout_visualization_draws_from_hollow_shapes() {
        let mut cfg = TrainerConfig::default();
        cfg.perspective = true;
        cfg.perspective_kind = PerspectiveKind::Spatial;
        cfg.spatial_viz = SpatialViz::Cutout;

        let mut rng = rng(19);
        let mut seen = [false; 2];
        for trial in 0..200 {
            let s = generate(&cfg, None, &mut rng, trial as f64);
            assert!(Shape::CUTOUT.contains(&s.shape));
            seen[if s.shape == Shape::Cube { 0 } else { 1 }] = true;
        }
        assert!(seen[0] && seen[1], "both cutout shapes should occur");
    }

    #[test]
    fn observer_position_is_mostly_me() {
        let cfg = TrainerConfig::default();
        let mut rng = rng(23);
        let me = (0..1000)
            .filter(|trial| {
                generate(&cfg, None, &mut rng, *trial as f64).observer_pos == ObserverPos::Me
            })
            .count();
        assert!((600..=800).contains(&me), "me count {me} out of range");
    }
}
