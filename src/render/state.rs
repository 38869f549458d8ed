//! Automatic field placement.
//!
//! A field without coordinates continues from the previous field of the
//! same kind: its baseline is the previous baseline advanced by one step
//! along the previous field's rotation. The first such field of a kind
//! starts at the label home.

use std::collections::HashMap;

use super::canvas::Pen;
use crate::label::{Anchor, FieldPosition, Point, Rotation};

/// Where an element is drawn from, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Anchor offsets still to apply; `None` when the point is already a
    /// resolved baseline taken from a previous field.
    pub anchor: Option<Anchor>,
}

/// Resolved baseline of a drawn field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub x: f64,
    pub y: f64,
    pub rotation: Rotation,
    /// Distance to the next field's baseline, along the local y axis.
    pub advance: f64,
}

impl Baseline {
    fn next(&self) -> (f64, f64) {
        Pen::new((self.x, self.y), self.rotation).map(0.0, self.advance)
    }
}

/// Per-render placement state. Created fresh for every label.
#[derive(Debug)]
pub struct DrawerState {
    home: (f64, f64),
    scale: f64,
    last: HashMap<&'static str, Baseline>,
}

impl DrawerState {
    pub fn new(home: Point, scale: f64) -> Self {
        Self {
            home: (home.x as f64 * scale, home.y as f64 * scale),
            scale,
            last: HashMap::new(),
        }
    }

    /// Device position of an element of `kind`.
    pub fn resolve(&self, kind: &'static str, position: &FieldPosition) -> Placement {
        if position.automatic {
            if let Some(last) = self.last.get(kind) {
                let (x, y) = last.next();
                return Placement { x, y, anchor: None };
            }
            return Placement {
                x: self.home.0,
                y: self.home.1,
                anchor: Some(position.anchor),
            };
        }
        Placement {
            x: self.home.0 + position.x as f64 * self.scale,
            y: self.home.1 + position.y as f64 * self.scale,
            anchor: Some(position.anchor),
        }
    }

    pub fn record(&mut self, kind: &'static str, baseline: Baseline) {
        self.last.insert(kind, baseline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_position_scaled_with_home() {
        let state = DrawerState::new(Point::new(10, 20), 2.0);
        let placement = state.resolve("text", &FieldPosition::at(50, 50, Anchor::Origin));
        assert_eq!(
            placement,
            Placement {
                x: 120.0,
                y: 140.0,
                anchor: Some(Anchor::Origin),
            }
        );
    }

    #[test]
    fn test_first_automatic_field_starts_at_home() {
        let state = DrawerState::new(Point::new(10, 20), 1.0);
        let placement = state.resolve("text", &FieldPosition::automatic(Anchor::Typeset));
        assert_eq!((placement.x, placement.y), (10.0, 20.0));
        assert_eq!(placement.anchor, Some(Anchor::Typeset));
    }

    #[test]
    fn test_continuation_stacks_down() {
        let mut state = DrawerState::new(Point::default(), 1.0);
        state.record(
            "text",
            Baseline {
                x: 50.0,
                y: 72.5,
                rotation: Rotation::R0,
                advance: 30.0,
            },
        );
        let placement = state.resolve("text", &FieldPosition::automatic(Anchor::Typeset));
        assert_eq!(
            placement,
            Placement {
                x: 50.0,
                y: 102.5,
                anchor: None,
            }
        );
    }

    #[test]
    fn test_continuation_follows_rotation() {
        let mut state = DrawerState::new(Point::default(), 1.0);
        state.record(
            "text",
            Baseline {
                x: 100.0,
                y: 40.0,
                rotation: Rotation::R90,
                advance: 20.0,
            },
        );
        let placement = state.resolve("text", &FieldPosition::automatic(Anchor::Origin));
        assert_eq!((placement.x, placement.y), (80.0, 40.0));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut state = DrawerState::new(Point::default(), 1.0);
        state.record(
            "barcode",
            Baseline {
                x: 10.0,
                y: 10.0,
                rotation: Rotation::R0,
                advance: 100.0,
            },
        );
        let text = state.resolve("text", &FieldPosition::automatic(Anchor::Origin));
        assert_eq!((text.x, text.y, text.anchor), (0.0, 0.0, Some(Anchor::Origin)));
        let barcode = state.resolve("barcode", &FieldPosition::automatic(Anchor::Origin));
        assert_eq!((barcode.x, barcode.y, barcode.anchor), (10.0, 110.0, None));
    }
}
