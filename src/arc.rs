use crate::config::{
    DIRECTION_EPSILON, IJ_RELATIVE_TOLERANCE, MIN_OFFSET_ARC_STEPS, OFFSET_STEPS_PER_RADIAN,
    RADIUS_ARC_STEPS,
};
use glam::DVec3;
use std::f64::consts::TAU;
use thiserror::Error;

/// Errors from circular-interpolation geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// No circle of the programmed radius can span the chord.
    #[error("radius {radius} too small for chord {chord}")]
    ChordTooLong { radius: f64, chord: f64 },

    /// The programmed target does not lie on the circle implied by I/J.
    #[error("target ({x}, {y}) does not lie on the arc (radius {radius:.2})")]
    TargetOffCircle { x: f64, y: f64, radius: f64 },
}

/// A solved G02/G03 arc. Angles are in radians; `end_angle` may lie outside
/// `(-π, π]` after direction correction so that `end_angle - start_angle` is
/// the signed swept angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSolution {
    pub center: DVec3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
    pub steps: usize,
}

impl ArcSolution {
    /// Signed swept angle, negative for clockwise arcs.
    pub fn angular_dist(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Arc length in the XY plane.
    pub fn arc_length(&self) -> f64 {
        self.radius * self.angular_dist().abs()
    }

    /// Point on the arc at the given angle, z taken from the center.
    pub fn point_at(&self, angle: f64) -> DVec3 {
        DVec3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }
}

/// Solves an R-notation arc: the center is the one of the two candidates
/// picked by the perpendicular convention `(dy, -dx)` for clockwise and
/// `(-dy, dx)` for counterclockwise arcs.
///
/// Angles come straight from `atan2` with no wrap-around normalization, and
/// the sample count is fixed. This matches the offset-notation solver only in
/// its output shape, not in its angle conventions.
pub fn solve_by_radius(
    current: DVec3,
    target_x: f64,
    target_y: f64,
    radius: f64,
    clockwise: bool,
) -> Result<ArcSolution, GeometryError> {
    let radius = radius.abs();
    let dx = target_x - current.x;
    let dy = target_y - current.y;
    let chord = dx.hypot(dy);

    if chord > 2.0 * radius {
        return Err(GeometryError::ChordTooLong { radius, chord });
    }

    let mid_x = current.x + dx / 2.0;
    let mid_y = current.y + dy / 2.0;

    let (mut perp_x, mut perp_y) = if clockwise { (dy, -dx) } else { (-dy, dx) };
    let perp_len = perp_x.hypot(perp_y);
    if perp_len > 1e-6 {
        perp_x /= perp_len;
        perp_y /= perp_len;
    }

    // Clamp tiny negative rounding when the chord is exactly a diameter.
    let offset = (radius * radius - (chord / 2.0) * (chord / 2.0)).max(0.0).sqrt();
    let center_x = mid_x + perp_x * offset;
    let center_y = mid_y + perp_y * offset;

    let start_angle = (current.y - center_y).atan2(current.x - center_x);
    let end_angle = (target_y - center_y).atan2(target_x - center_x);

    Ok(ArcSolution {
        center: DVec3::new(center_x, center_y, current.z),
        radius,
        start_angle,
        end_angle,
        clockwise,
        steps: RADIUS_ARC_STEPS,
    })
}

/// Solves an I/J-notation arc. The target must lie on the circle around
/// `current + (i, j)` within a relative tolerance, and the raw angle
/// difference is corrected so the sweep runs in the requested rotational
/// sense even when it starts out with the wrong sign or near zero (the
/// near-full-circle case).
pub fn solve_by_offset(
    current: DVec3,
    target_x: f64,
    target_y: f64,
    i_offset: f64,
    j_offset: f64,
    clockwise: bool,
) -> Result<ArcSolution, GeometryError> {
    let center_x = current.x + i_offset;
    let center_y = current.y + j_offset;
    let radius = i_offset.hypot(j_offset);

    let target_radius = (target_x - center_x).hypot(target_y - center_y);
    if !approx_eq_rel(radius, target_radius, IJ_RELATIVE_TOLERANCE) {
        return Err(GeometryError::TargetOffCircle { x: target_x, y: target_y, radius });
    }

    let start_angle = (current.y - center_y).atan2(current.x - center_x);
    let end_angle = (target_y - center_y).atan2(target_x - center_x);

    let mut angular_dist = end_angle - start_angle;
    if clockwise && angular_dist > -DIRECTION_EPSILON {
        angular_dist -= TAU;
    } else if !clockwise && angular_dist < DIRECTION_EPSILON {
        angular_dist += TAU;
    }

    let steps = ((angular_dist.abs() * OFFSET_STEPS_PER_RADIAN) as usize).max(MIN_OFFSET_ARC_STEPS);

    Ok(ArcSolution {
        center: DVec3::new(center_x, center_y, current.z),
        radius,
        start_angle,
        end_angle: start_angle + angular_dist,
        clockwise,
        steps,
    })
}

fn approx_eq_rel(a: f64, b: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}
