//! Maps a raw stimulus attribute to the value the player must actually
//! judge, given the perspective configuration.
//!
//! Symbolic mode decodes through per-session relabeling tables; spatial mode
//! mirrors positions and selects visible faces. Applied lazily at judgment
//! time, never at generation time.

use rand::Rng;

use super::config::{MatchStrategy, PerspectiveKind, RuleAttribute, TrainerConfig};
use super::stimulus::{Color, ObserverPos, Position, Shape, Size, Stimulus};

/// Per-session decode key: for each attribute, a bijection with no fixed
/// points on its three values. Regenerated at every session start, fixed for
/// the session's duration.
#[derive(Debug, Clone, PartialEq)]
pub struct RelabelTables {
    color: [Color; 3],
    shape: [Shape; 3],
    size: [Size; 3],
    position: [Position; 3],
}

impl RelabelTables {
    pub fn generate(rng: &mut impl Rng) -> Self {
        Self {
            color: derange(Color::ALL, rng),
            shape: derange(Shape::ALL, rng),
            size: derange(Size::ALL, rng),
            position: derange(Position::ALL, rng),
        }
    }

    pub fn color(&self, value: Color) -> Color {
        self.color[value.index()]
    }

    pub fn shape(&self, value: Shape) -> Shape {
        self.shape[value.index()]
    }

    pub fn size(&self, value: Size) -> Size {
        self.size[value.index()]
    }

    pub fn position(&self, value: Position) -> Position {
        self.position[value.index()]
    }
}

/// A random non-identity rotation of a 3-element set: exactly the bijections
/// with no fixed points.
fn derange<T: Copy>(all: [T; 3], rng: &mut impl Rng) -> [T; 3] {
    let shift = rng.gen_range(1..3);
    std::array::from_fn(|i| all[(i + shift) % 3])
}

/// The value a response is judged against. Equality of two `JudgedValue`s is
/// the match decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgedValue {
    Color(Color),
    /// Unordered front/back pair, stored low-index first.
    ColorPair(Color, Color),
    Shape(Shape),
    Size(Size),
    Position(Position),
}

pub fn judged_value(
    stim: &Stimulus,
    rule: RuleAttribute,
    cfg: &TrainerConfig,
    tables: &RelabelTables,
) -> JudgedValue {
    if !cfg.perspective {
        return raw_value(stim, rule);
    }

    match cfg.perspective_kind {
        PerspectiveKind::Symbolic => match stim.observer_pos {
            ObserverPos::Me => raw_value(stim, rule),
            ObserverPos::Opposite => decoded_value(stim, rule, tables),
        },
        PerspectiveKind::Spatial => match rule {
            RuleAttribute::Position => match cfg.match_strategy {
                // Object identity is viewpoint-independent.
                MatchStrategy::Object => JudgedValue::Position(stim.position),
                MatchStrategy::View => JudgedValue::Position(match stim.observer_pos {
                    ObserverPos::Me => stim.position,
                    ObserverPos::Opposite => stim.position.mirrored(),
                }),
            },
            RuleAttribute::Color => match cfg.match_strategy {
                MatchStrategy::Object => color_pair(stim.color, stim.back_color),
                MatchStrategy::View => JudgedValue::Color(match stim.observer_pos {
                    ObserverPos::Me => stim.color,
                    ObserverPos::Opposite => stim.back_color,
                }),
            },
            // Spatial perspective leaves shape and size untouched.
            RuleAttribute::Shape | RuleAttribute::Size => raw_value(stim, rule),
        },
    }
}

fn raw_value(stim: &Stimulus, rule: RuleAttribute) -> JudgedValue {
    match rule {
        RuleAttribute::Color => JudgedValue::Color(stim.color),
        RuleAttribute::Shape => JudgedValue::Shape(stim.shape),
        RuleAttribute::Size => JudgedValue::Size(stim.size),
        RuleAttribute::Position => JudgedValue::Position(stim.position),
    }
}

fn decoded_value(stim: &Stimulus, rule: RuleAttribute, tables: &RelabelTables) -> JudgedValue {
    match rule {
        RuleAttribute::Color => JudgedValue::Color(tables.color(stim.color)),
        RuleAttribute::Shape => JudgedValue::Shape(tables.shape(stim.shape)),
        RuleAttribute::Size => JudgedValue::Size(tables.size(stim.size)),
        RuleAttribute::Position => JudgedValue::Position(tables.position(stim.position)),
    }
}

fn color_pair(a: Color, b: Color) -> JudgedValue {
    if a.index() <= b.index() {
        JudgedValue::ColorPair(a, b)
    } else {
        JudgedValue::ColorPair(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::nback::config::TrainerConfig;
    use crate::tasks::nback::stimulus::{generate, StroopCue};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn stim(color: Color, back: Color, position: Position, observer: ObserverPos) -> Stimulus {
        Stimulus {
            color,
            back_color: back,
            net_colors: [color; 6],
            shape: Shape::DEFAULT,
            size: Size::DEFAULT,
            position,
            stroop: StroopCue {
                word: Color::Red,
                ink: Color::Red,
            },
            observer_pos: observer,
            created_at: 0.0,
        }
    }

    fn spatial_cfg(strategy: MatchStrategy) -> TrainerConfig {
        let mut cfg = TrainerConfig::default();
        cfg.perspective = true;
        cfg.perspective_kind = PerspectiveKind::Spatial;
        cfg.match_strategy = strategy;
        cfg
    }

    #[test]
    fn relabel_tables_are_fixed_point_free_bijections() {
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let tables = RelabelTables::generate(&mut rng);

            let mut seen = [false; 3];
            for value in Color::ALL {
                let mapped = tables.color(value);
                assert_ne!(mapped, value);
                seen[mapped.index()] = true;
            }
            assert!(seen.iter().all(|hit| *hit));

            for value in Position::ALL {
                assert_ne!(tables.position(value), value);
            }
            for value in Shape::ALL {
                assert_ne!(tables.shape(value), value);
            }
            for value in Size::ALL {
                assert_ne!(tables.size(value), value);
            }
        }
    }

    #[test]
    fn perspective_off_returns_raw_values() {
        let cfg = TrainerConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let tables = RelabelTables::generate(&mut rng);
        let s = stim(Color::Blue, Color::Red, Position::Left, ObserverPos::Opposite);

        assert_eq!(
            judged_value(&s, RuleAttribute::Color, &cfg, &tables),
            JudgedValue::Color(Color::Blue)
        );
        assert_eq!(
            judged_value(&s, RuleAttribute::Position, &cfg, &tables),
            JudgedValue::Position(Position::Left)
        );
    }

    #[test]
    fn symbolic_me_is_identity_for_generated_stimuli() {
        let mut cfg = TrainerConfig::default();
        cfg.perspective = true;
        cfg.perspective_kind = PerspectiveKind::Symbolic;

        let mut rng = SmallRng::seed_from_u64(5);
        let tables = RelabelTables::generate(&mut rng);
        for trial in 0..100 {
            let mut s = generate(&cfg, None, &mut rng, trial as f64);
            s.observer_pos = ObserverPos::Me;
            assert_eq!(
                judged_value(&s, RuleAttribute::Color, &cfg, &tables),
                JudgedValue::Color(s.color)
            );
        }
    }

    #[test]
    fn symbolic_opposite_decodes_through_the_table() {
        let mut cfg = TrainerConfig::default();
        cfg.perspective = true;
        cfg.perspective_kind = PerspectiveKind::Symbolic;

        let mut rng = SmallRng::seed_from_u64(9);
        let tables = RelabelTables::generate(&mut rng);
        let s = stim(Color::Green, Color::Red, Position::Center, ObserverPos::Opposite);

        assert_eq!(
            judged_value(&s, RuleAttribute::Color, &cfg, &tables),
            JudgedValue::Color(tables.color(Color::Green))
        );
    }

    #[test]
    fn spatial_view_mirrors_position_for_opposite_observer() {
        let cfg = spatial_cfg(MatchStrategy::View);
        let mut rng = SmallRng::seed_from_u64(1);
        let tables = RelabelTables::generate(&mut rng);

        let left = stim(Color::Red, Color::Green, Position::Left, ObserverPos::Opposite);
        let center = stim(Color::Red, Color::Green, Position::Center, ObserverPos::Opposite);
        let mine = stim(Color::Red, Color::Green, Position::Left, ObserverPos::Me);

        assert_eq!(
            judged_value(&left, RuleAttribute::Position, &cfg, &tables),
            JudgedValue::Position(Position::Right)
        );
        assert_eq!(
            judged_value(&center, RuleAttribute::Position, &cfg, &tables),
            JudgedValue::Position(Position::Center)
        );
        assert_eq!(
            judged_value(&mine, RuleAttribute::Position, &cfg, &tables),
            JudgedValue::Position(Position::Left)
        );
    }

    #[test]
    fn spatial_object_position_ignores_viewpoint() {
        let cfg = spatial_cfg(MatchStrategy::Object);
        let mut rng = SmallRng::seed_from_u64(2);
        let tables = RelabelTables::generate(&mut rng);
        let s = stim(Color::Red, Color::Green, Position::Left, ObserverPos::Opposite);

        assert_eq!(
            judged_value(&s, RuleAttribute::Position, &cfg, &tables),
            JudgedValue::Position(Position::Left)
        );
    }

    #[test]
    fn spatial_view_color_selects_the_visible_face() {
        let cfg = spatial_cfg(MatchStrategy::View);
        let mut rng = SmallRng::seed_from_u64(4);
        let tables = RelabelTables::generate(&mut rng);

        let front = stim(Color::Blue, Color::Green, Position::Center, ObserverPos::Me);
        let behind = stim(Color::Blue, Color::Green, Position::Center, ObserverPos::Opposite);

        assert_eq!(
            judged_value(&front, RuleAttribute::Color, &cfg, &tables),
            JudgedValue::Color(Color::Blue)
        );
        assert_eq!(
            judged_value(&behind, RuleAttribute::Color, &cfg, &tables),
            JudgedValue::Color(Color::Green)
        );
    }

    #[test]
    fn spatial_object_color_is_observer_invariant() {
        let cfg = spatial_cfg(MatchStrategy::Object);
        let mut rng = SmallRng::seed_from_u64(6);
        let tables = RelabelTables::generate(&mut rng);

        let mine = stim(Color::Blue, Color::Green, Position::Center, ObserverPos::Me);
        let theirs = stim(Color::Green, Color::Blue, Position::Center, ObserverPos::Opposite);

        assert_eq!(
            judged_value(&mine, RuleAttribute::Color, &cfg, &tables),
            judged_value(&theirs, RuleAttribute::Color, &cfg, &tables),
        );
    }

    #[test]
    fn spatial_mode_leaves_shape_and_size_raw() {
        let cfg = spatial_cfg(MatchStrategy::View);
        let mut rng = SmallRng::seed_from_u64(8);
        let tables = RelabelTables::generate(&mut rng);
        let mut s = stim(Color::Red, Color::Green, Position::Center, ObserverPos::Opposite);
        s.shape = Shape::Sphere;
        s.size = Size::Large;

        assert_eq!(
            judged_value(&s, RuleAttribute::Shape, &cfg, &tables),
            JudgedValue::Shape(Shape::Sphere)
        );
        assert_eq!(
            judged_value(&s, RuleAttribute::Size, &cfg, &tables),
            JudgedValue::Size(Size::Large)
        );
    }
}
