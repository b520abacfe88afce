//! A 2-dimensional integer vector/point.
use num::{Integer, Num};

/// A point or an offset.  Ordering is by `x`, then `y`.
#[derive(Debug, Copy, Clone, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct V2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Num> V2<T> {
    pub const fn new(x: T, y: T) -> Self {
        V2 { x, y }
    }

    pub fn splat(v: T) -> Self
    where
        T: Copy,
    {
        V2 { x: v, y: v }
    }
}

impl<T> V2<T> {
    /// Apply `f` to both components, possibly changing the component type.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> V2<U> {
        V2 {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl<T: Num + Copy> V2<T> {
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn scale(self, factor: T) -> V2<T> {
        V2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl<T: Integer + Copy> V2<T> {
    /// Divide both components, rounding toward negative infinity.
    ///
    /// This is what maps a cell to the chunk holding it: `-1 / 32` must be `-1`, not `0`.
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn floor_div(self, divisor: T) -> V2<T> {
        V2 {
            x: self.x.div_floor(&divisor),
            y: self.y.div_floor(&divisor),
        }
    }

    /// The remainder matching [V2::floor_div].  Always in `[0, divisor)` for positive divisors.
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn floor_rem(self, divisor: T) -> V2<T> {
        V2 {
            x: self.x.mod_floor(&divisor),
            y: self.y.mod_floor(&divisor),
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for V2<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl<T: Num> std::ops::Add for V2<T> {
    type Output = V2<T>;

    fn add(self, rhs: V2<T>) -> V2<T> {
        V2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: Num + Copy> std::ops::AddAssign for V2<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.x = self.x + rhs.x;
        self.y = self.y + rhs.y;
    }
}

impl<T: std::ops::Neg> std::ops::Neg for V2<T> {
    type Output = V2<<T as std::ops::Neg>::Output>;

    fn neg(self) -> Self::Output {
        V2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl<T: Num> std::ops::Sub for V2<T> {
    type Output = V2<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        V2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T: Num + Copy> std::ops::SubAssign for V2<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.x = self.x - rhs.x;
        self.y = self.y - rhs.y;
    }
}
