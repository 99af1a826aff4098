// chatview - windowed chat transcript viewport with adaptive auto-scroll
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Cubic Bezier timing curves, anchored at (0,0) and (1,1).

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_EPSILON: f64 = 1e-7;
const BISECTION_ITERATIONS: usize = 32;

/// Timing curve given by its two inner control points.
///
/// The polynomial coefficients are expanded once at construction so sampling
/// is a pair of Horner evaluations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl CubicBezier {
    /// Ease-out curve used for every auto-scroll animation.
    pub const SCROLL: Self = Self::new(0.25, 0.46, 0.45, 0.94);

    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self { ax, bx, cx, ay, by, cy }
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_dx(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Curve parameter whose x equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample_x(t) - x;
            if err.abs() < NEWTON_EPSILON {
                return t;
            }
            let slope = self.sample_dx(t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        // Newton stalled on a flat spot; bisect instead.
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let sx = self.sample_x(t);
            if (sx - x).abs() < NEWTON_EPSILON {
                break;
            }
            if sx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for normalized time `progress`, clamped to `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn ease(&self, progress: f32) -> f32 {
        let x = f64::from(progress);
        if x.is_nan() || x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_t(x)).clamp(0.0, 1.0) as f32
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::SCROLL
    }
}

/// Interpolate from `start` to `end` along `curve`.
pub fn interpolate(curve: &CubicBezier, start: f32, end: f32, progress: f32) -> f32 {
    start + (end - start) * curve.ease(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        assert_eq!(CubicBezier::SCROLL.ease(0.0), 0.0);
        assert_eq!(CubicBezier::SCROLL.ease(1.0), 1.0);
        assert_eq!(CubicBezier::SCROLL.ease(-0.5), 0.0);
        assert_eq!(CubicBezier::SCROLL.ease(3.0), 1.0);
        assert_eq!(CubicBezier::SCROLL.ease(f32::NAN), 0.0);
    }

    #[test]
    fn scroll_curve_is_monotonic_without_overshoot() {
        let mut prev = 0.0f32;
        for step in 0..=1000u16 {
            let t = f32::from(step) / 1000.0;
            let y = CubicBezier::SCROLL.ease(t);
            assert!((0.0..=1.0).contains(&y), "overshoot at {t}: {y}");
            assert!(y + 1e-6 >= prev, "not monotonic at {t}: {prev} -> {y}");
            prev = y;
        }
    }

    #[test]
    fn scroll_curve_eases_out() {
        // Front-loaded motion: past the halfway mark before half the time.
        assert!(CubicBezier::SCROLL.ease(0.5) > 0.6);
    }

    #[test]
    fn linear_control_points_are_identity() {
        let linear = CubicBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for t in [0.1f32, 0.25, 0.5, 0.9] {
            assert!((linear.ease(t) - t).abs() < 1e-4, "{t}");
        }
    }

    #[test]
    fn interpolate_maps_between_offsets() {
        let curve = CubicBezier::SCROLL;
        assert_eq!(interpolate(&curve, 100.0, 400.0, 0.0), 100.0);
        assert_eq!(interpolate(&curve, 100.0, 400.0, 1.0), 400.0);
        let mid = interpolate(&curve, 100.0, 400.0, 0.5);
        assert!(mid > 250.0 && mid < 400.0);
    }
}
