//! Boxes, diagonal lines and circles.
//!
//! Graphics ignore field rotation. Each shape is drawn as a single
//! coverage test over its bounding box, so borders never overlap and
//! reverse ink inverts every covered pixel exactly once.

use super::canvas::{Canvas, Ink};
use super::state::{Baseline, Placement};
use crate::label::{Anchor, Diagonal, GraphicBox, GraphicCircle, GraphicLine, Rotation};

/// Device top-left corner of a shape `height` pixels tall.
pub fn top_left(placement: Placement, height: f64) -> (f64, f64) {
    match placement.anchor {
        Some(Anchor::Typeset) => (placement.x, placement.y - height),
        Some(Anchor::Origin) | None => (placement.x, placement.y),
    }
}

/// Continuation point for the next shape: directly below this one.
pub fn baseline((x, y): (f64, f64), height: f64) -> Baseline {
    Baseline {
        x,
        y,
        rotation: Rotation::R0,
        advance: height,
    }
}

fn inside_rounded(cx: f64, cy: f64, (x0, y0, x1, y1): (f64, f64, f64, f64), radius: f64) -> bool {
    if cx < x0 || cx >= x1 || cy < y0 || cy >= y1 {
        return false;
    }
    if radius <= 0.0 {
        return true;
    }
    let qx = if cx < x0 + radius {
        x0 + radius
    } else if cx > x1 - radius {
        x1 - radius
    } else {
        cx
    };
    let qy = if cy < y0 + radius {
        y0 + radius
    } else if cy > y1 - radius {
        y1 - radius
    } else {
        cy
    };
    (cx - qx).powi(2) + (cy - qy).powi(2) <= radius * radius
}

pub fn draw_box(
    canvas: &mut Canvas,
    (x, y): (f64, f64),
    graphic: &GraphicBox,
    scale: f64,
    ink: Ink,
) {
    let w = graphic.width as f64 * scale;
    let h = graphic.height as f64 * scale;
    let t = graphic.thickness as f64 * scale;
    let radius = graphic.rounding as f64 / 8.0 * w.min(h) / 2.0;

    let outer = (x, y, x + w, y + h);
    let inner = (x + t, y + t, x + w - t, y + h - t);
    let inner_radius = (radius - t).max(0.0);

    canvas.fill_where(outer, ink, |cx, cy| {
        inside_rounded(cx, cy, outer, radius) && !inside_rounded(cx, cy, inner, inner_radius)
    });
}

pub fn draw_line(
    canvas: &mut Canvas,
    (x, y): (f64, f64),
    graphic: &GraphicLine,
    scale: f64,
    ink: Ink,
) {
    let w = graphic.width as f64 * scale;
    let h = graphic.height as f64 * scale;
    let t = (graphic.thickness as f64 * scale).min(w);
    let diagonal = graphic.diagonal;

    canvas.fill_where((x, y, x + w, y + h), ink, |cx, cy| {
        if cy < y || cy >= y + h {
            return false;
        }
        let fy = (cy - y) / h;
        let left = match diagonal {
            Diagonal::RightLeaning => x + (1.0 - fy) * (w - t),
            Diagonal::LeftLeaning => x + fy * (w - t),
        };
        cx >= left && cx < left + t
    });
}

pub fn draw_circle(
    canvas: &mut Canvas,
    (x, y): (f64, f64),
    graphic: &GraphicCircle,
    scale: f64,
    ink: Ink,
) {
    let d = graphic.diameter as f64 * scale;
    let r = d / 2.0;
    let inner = r - graphic.thickness as f64 * scale;
    let (ccx, ccy) = (x + r, y + r);

    canvas.fill_where((x, y, x + d, y + d), ink, |cx, cy| {
        let dist = (cx - ccx).powi(2) + (cy - ccy).powi(2);
        dist < r * r && (inner <= 0.0 || dist >= inner * inner)
    });
}
