use std::fmt;

/// Normalized distance reported when neither rectangle has any extent.
///
/// Degenerate boxes come from malformed detector output and must score as
/// "far apart" instead of dividing by zero.
pub const DEGENERATE_NORMALIZED_DISTANCE: f64 = f64::MAX;

/// Axis-aligned face bounding box in integer pixel coordinates.
///
/// `top <= bottom` and `left <= right` hold by construction; the
/// constructor orders each coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    top: i32,
    bottom: i32,
    left: i32,
    right: i32,
}

impl Rectangle {
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top: top.min(bottom),
            bottom: top.max(bottom),
            left: left.min(right),
            right: left.max(right),
        }
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    /// Extent in `i64`, so any pair of `i32` edges fits.
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Saturates at `i64::MAX` for boxes spanning the whole `i32` plane.
    pub fn area(&self) -> i64 {
        self.width().saturating_mul(self.height())
    }

    /// Integer pixel center, rounded toward the top-left.
    pub fn center(&self) -> (i32, i32) {
        // midpoint lies within [left, right] and [top, bottom]
        (
            (i64::from(self.left) + self.width() / 2) as i32,
            (i64::from(self.top) + self.height() / 2) as i32,
        )
    }

    fn center_f64(&self) -> (f64, f64) {
        (
            self.left as f64 + self.width() as f64 / 2.0,
            self.top as f64 + self.height() as f64 / 2.0,
        )
    }

    fn characteristic_size(&self) -> f64 {
        (self.width() as f64 + self.height() as f64) / 2.0
    }

    /// Overlap area with `other`; 0 when disjoint or merely touching.
    pub fn intersect(&self, other: &Rectangle) -> i64 {
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom.min(other.bottom);
        let right = self.right.min(other.right);

        let w = (i64::from(right) - i64::from(left)).max(0);
        let h = (i64::from(bottom) - i64::from(top)).max(0);
        w.saturating_mul(h)
    }

    /// Returns `(absolute, normalized)` distance between centers.
    ///
    /// The normalized value divides by the mean of both rectangles'
    /// characteristic sizes (`(width + height) / 2`), so 0 means concentric
    /// and 1 means the centers are one face-size apart.
    pub fn distance(&self, other: &Rectangle) -> (f64, f64) {
        let (ax, ay) = self.center_f64();
        let (bx, by) = other.center_f64();
        let absolute = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();

        let scale = (self.characteristic_size() + other.characteristic_size()) / 2.0;
        if scale <= 0.0 {
            return (absolute, DEGENERATE_NORMALIZED_DISTANCE);
        }
        (absolute, absolute / scale)
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::new(
            self.top.min(other.top),
            self.bottom.max(other.bottom),
            self.left.min(other.left),
            self.right.max(other.right),
        )
    }

    pub fn contains(&self, other: &Rectangle) -> bool {
        self.top <= other.top
            && self.left <= other.left
            && self.bottom >= other.bottom
            && self.right >= other.right
    }

    /// Clamps the rectangle to `[0, width] x [0, height]`.
    pub fn clip(&self, width: u32, height: u32) -> Rectangle {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        Rectangle::new(
            self.top.clamp(0, h),
            self.bottom.clamp(0, h),
            self.left.clamp(0, w),
            self.right.clamp(0, w),
        )
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rectangle(top={}, bottom={}, left={}, right={})",
            self.top, self.bottom, self.left, self.right
        )
    }
}
