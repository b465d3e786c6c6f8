use std::f64::consts::PI;
use std::ops::{Add, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Point {
    pub(crate) const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub(crate) fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates `self` around `pivot` by `degrees`, clockwise on a y-down canvas.
    pub(crate) fn rotate_about(self, pivot: Point, degrees: f64) -> Point {
        let (s, c) = degrees.to_radians().sin_cos();
        let d = self - pivot;
        Point {
            x: pivot.x + d.x * c - d.y * s,
            y: pivot.y + d.x * s + d.y * c,
        }
    }

    #[cfg(test)]
    pub(crate) fn distance_to(self, o: Point) -> f64 {
        let d = self - o;
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point {
        Point { x: self.x + o.x, y: self.y + o.y }
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point {
        Point { x: self.x - o.x, y: self.y - o.y }
    }
}

pub(crate) fn lerp(v0: f64, v1: f64, t: f64) -> f64 {
    v0 + t * (v1 - v0)
}

pub(crate) fn interpolate_point(x0: f64, y0: f64, x1: f64, y1: f64, t: f64) -> (f64, f64) {
    (lerp(x0, x1, t), lerp(y0, y1, t))
}

/// Radians per frame. Non-positive periods (the sun) do not orbit and get 0.
pub(crate) fn angular_velocity(period_frames: f64) -> f64 {
    if period_frames > 0.0 {
        2.0 * PI / period_frames
    } else {
        0.0
    }
}

/// Offset from the orbited body after `frame` frames of circular motion.
pub(crate) fn orbital_offset(distance: f64, period_frames: f64, frame: f64) -> Point {
    let (s, c) = (frame * angular_velocity(period_frames)).sin_cos();
    Point { x: distance * c, y: distance * s }
}

#[cfg(test)]
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}
