//! Seat placement around a stadium-shaped table.
//!
//! A stadium is a rectangle whose short sides are replaced by semicircles,
//! i.e. a rounded rectangle with corner radius equal to half its height.
//! Points are addressed by the fraction of the perimeter walked from the
//! midpoint of the straight edge at `center_y + radius`, moving toward
//! decreasing x, so equal fractions give equal arc lengths whatever the
//! aspect ratio.

use std::f64::consts::PI;

/// Decimal places kept on computed coordinates.
const PRECISION: f64 = 100.0;

#[inline]
fn round2(value: f64) -> f64 {
    (value * PRECISION).round_ties_even() / PRECISION
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stadium {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Stadium {
    /// Shapes that are taller than wide are not stadiums; check
    /// [`Stadium::is_well_formed`] before walking the edge.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow (or shrink, with negative deltas) around the same center.
    pub fn inflate(&self, dw: f64, dh: f64) -> Self {
        Self::new(
            self.x - dw / 2.0,
            self.y - dh / 2.0,
            self.width + dw,
            self.height + dh,
        )
    }

    /// Finite, non-degenerate and at least as wide as it is tall.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.height > 0.0
            && self.width >= self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn radius(&self) -> f64 {
        self.height / 2.0
    }

    pub fn straight_width(&self) -> f64 {
        self.width - self.height
    }

    /// Combined length of both end caps.
    pub fn circle_perimeter(&self) -> f64 {
        PI * self.height
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * self.straight_width() + self.circle_perimeter()
    }

    /// Boundary point at `frac` of the perimeter; `frac` wraps modulo 1.
    pub fn edge(&self, frac: f64) -> Point {
        let frac = frac.rem_euclid(1.0);
        let straight = self.straight_width();
        let half_straight = straight * 0.5;
        let half_circle = self.circle_perimeter() * 0.5;
        let radius = self.radius();
        let walked = frac * self.perimeter();

        let (dx, dy) = if walked < half_straight {
            (-walked, radius)
        } else if walked < half_straight + half_circle {
            let progress = (walked - half_straight) / half_circle;
            let angle = PI * 0.5 + PI * progress;
            (radius * angle.cos() - half_straight, radius * angle.sin())
        } else if walked < straight * 1.5 + half_circle {
            let progress = (walked - half_straight - half_circle) / straight;
            ((progress - 0.5) * straight, -radius)
        } else if walked < straight * 1.5 + half_circle * 2.0 {
            let progress = (walked - straight * 1.5 - half_circle) / half_circle;
            let angle = PI * 1.5 + PI * progress;
            (radius * angle.cos() + half_straight, radius * angle.sin())
        } else {
            let progress = if straight > 0.0 {
                (walked - straight * 1.5 - half_circle * 2.0) / straight
            } else {
                0.0
            };
            ((0.5 - progress) * straight, radius)
        };

        let center = self.center();
        Point::new(round2(center.x + dx), round2(center.y + dy))
    }
}

/// Anchor points for every seat, computed once per scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SeatLayout {
    seats: Vec<Point>,
    markers: Vec<Point>,
}

impl SeatLayout {
    pub fn new(num_players: usize, seats: &Stadium, markers: &Stadium) -> Self {
        let fracs = (0..num_players).map(|idx| idx as f64 / num_players as f64);
        Self {
            seats: fracs.clone().map(|frac| seats.edge(frac)).collect(),
            markers: fracs.map(|frac| markers.edge(frac)).collect(),
        }
    }

    pub fn num_players(&self) -> usize {
        self.seats.len()
    }

    pub fn seat(&self, idx: usize) -> Point {
        self.seats[idx]
    }

    pub fn marker(&self, idx: usize) -> Point {
        self.markers[idx]
    }

    pub fn seats(&self) -> &[Point] {
        &self.seats
    }

    pub fn markers(&self) -> &[Point] {
        &self.markers
    }
}
