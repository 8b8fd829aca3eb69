//! Boundary constraints for user elements.
//!
//! Every function here takes the zone rectangle explicitly, so the same code
//! serves interactive moves, scaling, text auto-fit and boundary mode changes.
//! Locked elements are never corrected.

use stampkit_core::UnitConverter;

use crate::geometry::{Point, Rect};
use crate::model::{StampShape, StampText};

/// Angles that rotation snaps to, in degrees.
pub const SNAP_ANGLES: [f64; 5] = [0.0, 90.0, 180.0, 270.0, 360.0];

/// Keeps the bounding box inside `zone`.
///
/// The anchor-to-box offset is preserved, so this works for any origin. An
/// element at least as large as the zone on an axis is pinned to the zone's
/// minimum on that axis.
pub fn clamp_position<S: StampShape + ?Sized>(shape: &mut S, zone: Rect) {
    if shape.meta().locked {
        return;
    }
    let b = shape.bounding_rect();
    let p = shape.placement_mut();
    let dl = p.left - b.left;
    let dt = p.top - b.top;

    p.left = if b.width >= zone.width {
        zone.left + dl
    } else {
        p.left.max(zone.left + dl).min(zone.right() - b.width + dl)
    };
    p.top = if b.height >= zone.height {
        zone.top + dt
    } else {
        p.top.max(zone.top + dt).min(zone.bottom() - b.height + dt)
    };
}

/// Per-axis uniform factors that make the rotated bounding box span `zone`
/// exactly in width and in height.
///
/// Stroke width is unscaled and is held constant. Results may be non-finite
/// for degenerate shapes.
pub fn fit_ratios<S: StampShape + ?Sized>(shape: &S, zone: Rect) -> (f64, f64) {
    let (w, h) = shape.intrinsic_size();
    let p = shape.placement();
    let big_w = w * p.scale_x.abs();
    let big_h = h * p.scale_y.abs();
    let k = shape.stroke_px();
    let (sin, cos) = p.angle.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());

    let r_w = (zone.width - k * (cos + sin)) / (cos * big_w + sin * big_h);
    let r_h = (zone.height - k * (sin + cos)) / (sin * big_w + cos * big_h);
    (r_w, r_h)
}

/// Uniform scale factor that makes the rotated bounding box fit `zone`.
///
/// Returns `None` for degenerate results.
pub fn fit_ratio<S: StampShape + ?Sized>(shape: &S, zone: Rect) -> Option<f64> {
    let (r_w, r_h) = fit_ratios(shape, zone);
    let ratio = r_w.min(r_h);
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

/// Multiplies both scale axes by `ratio`.
pub fn apply_uniform_scale<S: StampShape + ?Sized>(shape: &mut S, ratio: f64) {
    let p = shape.placement_mut();
    p.scale_x *= ratio;
    p.scale_y *= ratio;
}

/// Shrinks an element being resized so it stays inside `zone`, then clamps its position.
///
/// Text is clamped per axis so deliberate stretching survives; other shapes
/// shrink uniformly. Scale is never increased.
pub fn clamp_scaling<S: StampShape + ?Sized>(shape: &mut S, zone: Rect, is_text: bool) {
    if shape.meta().locked {
        return;
    }
    let b = shape.bounding_rect();

    if is_text {
        let p = shape.placement_mut();
        if b.width > zone.width && b.width > 0.0 {
            p.scale_x *= zone.width / b.width;
        }
        if b.height > zone.height && b.height > 0.0 {
            p.scale_y *= zone.height / b.height;
        }
        // rotated text can still overflow after the per-axis correction
        let after = shape.bounding_rect();
        if after.width > zone.width + 1e-9 || after.height > zone.height + 1e-9 {
            if let Some(ratio) = fit_ratio(&*shape, zone).filter(|r| *r < 1.0) {
                apply_uniform_scale(shape, ratio);
            }
        }
    } else if b.width > zone.width || b.height > zone.height {
        if let Some(ratio) = fit_ratio(&*shape, zone).filter(|r| *r < 1.0) {
            tracing::debug!(ratio, "shrinking element to fit zone");
            apply_uniform_scale(shape, ratio);
        }
    }

    clamp_position(shape, zone);
}

/// Snaps `angle` to the nearest right angle when within `threshold` degrees.
///
/// 360 becomes 0. Angles outside every threshold are returned unchanged.
pub fn snap_rotation(angle: f64, threshold: f64) -> f64 {
    let a = angle % 360.0;
    SNAP_ANGLES
        .iter()
        .find(|sa| (a - **sa).abs() < threshold)
        .map(|sa| if *sa == 360.0 { 0.0 } else { *sa })
        .unwrap_or(angle)
}

/// Rounds an anchor to the grid, measured from the work-area origin.
pub fn snap_to_grid(anchor: Point, origin: Point, grid: f64) -> Point {
    if grid <= 0.0 {
        return anchor;
    }
    let snap = |v: f64, o: f64| ((v - o) / grid).round() * grid + o;
    Point::new(snap(anchor.x, origin.x), snap(anchor.y, origin.y))
}

/// Shrinks text that overflows `safety` after editing, then clamps it to `active`.
pub fn auto_fit_text(text: &mut StampText, safety: Rect, active: Rect) {
    let b = text.bounding_rect();
    if (b.width > safety.width || b.height > safety.height) && b.width > 0.0 && b.height > 0.0 {
        let ratio = (safety.width / b.width).min(safety.height / b.height).min(1.0);
        if ratio < 1.0 {
            tracing::debug!(name = %text.meta.name, ratio, "auto-fitting text");
            apply_uniform_scale(text, ratio);
        }
    }
    clamp_position(text, active);
}

/// Folds vertical scale into the font size, keeping the horizontal stretch.
///
/// Returns `true` when the element changed and needs a relayout.
pub fn normalize_text_scale(
    text: &mut StampText,
    units: &UnitConverter,
    min_pt: f64,
    max_pt: f64,
) -> bool {
    let sx = text.placement.scale_x;
    let sy = text.placement.scale_y;
    if sx == 1.0 && sy == 1.0 {
        return false;
    }
    if !sy.is_finite() || sy == 0.0 {
        return false;
    }
    let min_px = units.pt_to_px(min_pt);
    let max_px = units.pt_to_px(max_pt);
    text.font_size = (text.font_size * sy).clamp(min_px, max_px);
    text.placement.scale_x = sx / sy;
    text.placement.scale_y = 1.0;
    true
}
