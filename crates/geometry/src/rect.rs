//! An axis-aligned integer rectangle.
use num::traits::{CheckedAdd, CheckedSub, Num};

use crate::errors::*;
use crate::*;

/// A rectangle is specified by its lowest corner and a width/height vector.
///
/// Unlike a bounding box, a rectangle may be empty: a zero width or height is valid and contains no points.  The
/// rectangle contains `p` iff `position <= p < end` on both axes.  The fallible constructors also require `end` to be
/// representable in `T`.
#[derive(Debug, Copy, Clone, Default, Eq, Hash, PartialEq)]
pub struct Rect<T> {
    position: V2<T>,
    /// width-height
    size: V2<T>,
}

fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

impl<T: Num + Copy + PartialOrd + CheckedAdd + CheckedSub> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Result<Rect<T>> {
        Rect::from_position_size(V2::new(x, y), V2::new(width, height))
    }

    pub fn from_position_size(position: V2<T>, size: V2<T>) -> Result<Rect<T>> {
        if size.x < T::zero() || size.y < T::zero() {
            return Err(RectError::InvalidDims);
        }
        if position.x.checked_add(&size.x).is_none() || position.y.checked_add(&size.y).is_none() {
            return Err(RectError::InvalidDims);
        }

        Ok(Rect { position, size })
    }

    /// Build the rectangle spanning `p1` (inclusive) to `p2` (exclusive).
    pub fn from_points(p1: V2<T>, p2: V2<T>) -> Result<Rect<T>> {
        if p1.x > p2.x || p1.y > p2.y {
            return Err(RectError::InvalidDims);
        }

        match (p2.x.checked_sub(&p1.x), p2.y.checked_sub(&p1.y)) {
            (Some(width), Some(height)) => Ok(Rect {
                position: p1,
                size: V2::new(width, height),
            }),
            _ => Err(RectError::InvalidDims),
        }
    }

    /// A rectangle of size 1 holding only `point`.
    pub fn unit(point: V2<T>) -> Rect<T> {
        Rect {
            position: point,
            size: V2::splat(T::one()),
        }
    }

    /// Build a rectangle from half-open ranges per axis.  Inverted ranges produce an empty rectangle at their start.
    pub fn from_ranges(x: std::ops::Range<T>, y: std::ops::Range<T>) -> Rect<T> {
        let width = if x.end > x.start { x.end - x.start } else { T::zero() };
        let height = if y.end > y.start { y.end - y.start } else { T::zero() };
        Rect {
            position: V2::new(x.start, y.start),
            size: V2::new(width, height),
        }
    }

    /// Multiply position and size by `factor`, e.g. to go from chunk units to cell units.
    ///
    /// `factor` must not be negative.
    #[must_use = "This function doesn't modify the rectangle in place"]
    pub fn scale(&self, factor: T) -> Rect<T> {
        debug_assert!(factor >= T::zero());
        Rect {
            position: self.position.scale(factor),
            size: self.size.scale(factor),
        }
    }

    #[must_use = "This function doesn't modify the rectangle in place"]
    pub fn translate(&self, offset: V2<T>) -> Rect<T> {
        Rect {
            position: self.position + offset,
            size: self.size,
        }
    }

    pub fn position(&self) -> V2<T> {
        self.position
    }

    pub fn size(&self) -> V2<T> {
        self.size
    }

    pub fn end(&self) -> V2<T> {
        self.position + self.size
    }

    pub fn width(&self) -> T {
        self.size.x
    }

    pub fn height(&self) -> T {
        self.size.y
    }

    pub fn area(&self) -> T {
        self.size.x * self.size.y
    }

    pub fn is_empty(&self) -> bool {
        self.size.x == T::zero() || self.size.y == T::zero()
    }

    pub fn contains_point(&self, point: V2<T>) -> bool {
        let end = self.end();
        point.x >= self.position.x && point.y >= self.position.y && point.x < end.x && point.y < end.y
    }

    /// Whether every point of `other` is in this rectangle.  Empty rectangles are contained by everything.
    pub fn contains_rect(&self, other: &Rect<T>) -> bool {
        if other.is_empty() {
            return true;
        }

        let end = self.end();
        let other_end = other.end();
        other.position.x >= self.position.x
            && other.position.y >= self.position.y
            && other_end.x <= end.x
            && other_end.y <= end.y
    }

    /// The smallest rectangle containing both.  Empty rectangles don't contribute.
    #[must_use = "This function doesn't modify the rectangle in place"]
    pub fn union(&self, other: &Rect<T>) -> Rect<T> {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }

        let end = self.end();
        let other_end = other.end();
        let p1 = V2::new(
            min(self.position.x, other.position.x),
            min(self.position.y, other.position.y),
        );
        let p2 = V2::new(max(end.x, other_end.x), max(end.y, other_end.y));
        Rect {
            position: p1,
            size: p2 - p1,
        }
    }

    /// The overlapping part of both rectangles, or `None` if they don't overlap.
    pub fn intersection(&self, other: &Rect<T>) -> Option<Rect<T>> {
        let end = self.end();
        let other_end = other.end();
        let p1 = V2::new(
            max(self.position.x, other.position.x),
            max(self.position.y, other.position.y),
        );
        let p2 = V2::new(min(end.x, other_end.x), min(end.y, other_end.y));
        if p1.x >= p2.x || p1.y >= p2.y {
            return None;
        }

        Some(Rect {
            position: p1,
            size: p2 - p1,
        })
    }
}

impl<T: num::Signed + Copy + PartialOrd> Rect<T> {
    /// The rectangle from `-half_extents` to `half_extents`.  Signs of the extents are ignored.
    pub fn centered(half_extents: V2<T>) -> Rect<T> {
        let half = half_extents.map(|v| v.abs());
        Rect {
            position: V2::new(-half.x, -half.y),
            size: half + half,
        }
    }
}

impl Rect<i32> {
    /// Visit all points of this rectangle by rows, starting from the minimum y:
    ///
    /// `(1, 1), (2, 1), ... (1, 2), (2, 2),...`
    pub fn iter_points(&self) -> impl Iterator<Item = V2<i32>> {
        let p1 = self.position;
        let p2 = self.end();
        (p1.y..p2.y).flat_map(move |y| (p1.x..p2.x).map(move |x| V2::new(x, y)))
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Rect<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} size {}]", self.position, self.size)
    }
}
