use super::model::MenuError;
use super::{START_DEGREE, TOTAL_DEGREE};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Square box enclosing the outer circle of the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn around(center: Point, radius: f64) -> Self {
        Self {
            left: center.x - radius,
            top: center.y - radius,
            right: center.x + radius,
            bottom: center.y + radius,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn radius(&self) -> f64 {
        (self.right - self.left) / 2.0
    }
}

/// An arc of the ring in drawing degrees: 0 is screen right, positive is clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub start: f64,
    pub sweep: f64,
}

impl Sector {
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    pub fn mid_angle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }

    pub fn contains(&self, degrees: f64) -> bool {
        (self.start..self.end()).contains(&degrees)
    }
}

/// What a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    Center,
    Item(usize),
}

impl Activation {
    /// Listener-facing index: -1 for the center disc, otherwise the sector index.
    pub fn index(&self) -> i32 {
        match self {
            Self::Center => -1,
            Self::Item(i) => i32::try_from(*i).unwrap_or(i32::MAX),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    item_count: usize,
    inner_radius: f64,
    outer_radius: f64,
}

impl RingGeometry {
    pub fn new(item_count: i64, inner_radius: f64, outer_radius: f64) -> Result<Self, MenuError> {
        // every sector index has to fit the listener's i32
        let item_count = i32::try_from(item_count)
            .ok()
            .filter(|&n| n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(MenuError::InvalidItemCount(item_count))?;

        if !(inner_radius >= 0.0 && inner_radius < outer_radius) || !outer_radius.is_finite() {
            return Err(MenuError::InvalidRadii {
                inner: inner_radius,
                outer: outer_radius,
            });
        }

        Ok(Self {
            item_count,
            inner_radius,
            outer_radius,
        })
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn sweep(&self) -> f64 {
        TOTAL_DEGREE / self.item_count as f64
    }

    pub fn sector(&self, index: usize) -> Sector {
        let sweep = self.sweep();
        Sector {
            start: START_DEGREE + index as f64 * sweep,
            sweep,
        }
    }

    pub fn sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        (0..self.item_count).map(|i| self.sector(i))
    }

    /// Radius halfway across the ring, where icons and titles are anchored.
    pub fn mid_radius(&self) -> f64 {
        (self.outer_radius + self.inner_radius) / 2.0
    }

    /// Offset from the widget center to the angular midpoint of sector `index`.
    pub fn anchor_offset(&self, index: usize) -> Point {
        let angle = self.sector(index).mid_angle().to_radians();
        let radius = self.mid_radius();
        Point::new(radius * angle.cos(), radius * angle.sin())
    }

    pub fn bounds(&self, size: Size) -> Bounds {
        Bounds::around(size.center(), self.outer_radius)
    }

    /// Maps a press to the center disc or a sector. `None` means the press
    /// is outside the outer radius.
    pub fn locate(&self, center: Point, press: Point) -> Option<Activation> {
        let dist_sq = press.distance_squared(center);

        if dist_sq > self.outer_radius * self.outer_radius {
            return None;
        }
        if dist_sq <= self.inner_radius * self.inner_radius {
            return Some(Activation::Center);
        }

        Some(Activation::Item(
            self.index_for_angle(Self::press_angle(center, press)),
        ))
    }

    /// Angle of `press` around `center` in degrees, counter-clockwise from
    /// screen right, normalized to [0, 360).
    pub fn press_angle(center: Point, press: Point) -> f64 {
        let angle = (center.y - press.y).atan2(press.x - center.x).to_degrees();
        if angle < 0.0 { angle + TOTAL_DEGREE } else { angle }
    }

    /// Converts a counter-clockwise press angle into the clockwise, top-started
    /// numbering used when drawing. A press exactly on a boundary belongs to
    /// the sector counter-clockwise of it.
    ///
    /// With four items this is `|floor(angle / sweep) - n| mod n`.
    pub fn index_for_angle(&self, angle: f64) -> usize {
        let n = self.item_count;
        let from_top = (angle + START_DEGREE).rem_euclid(TOTAL_DEGREE);
        let raw = ((from_top / self.sweep()) as usize).min(n - 1);
        n - 1 - raw
    }
}
