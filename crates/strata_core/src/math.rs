//! Mathematical types shared by generation, streaming and persistence.
//!
//! World space is 2D: x grows to the right, y grows upward from the bottom
//! of the world.

use serde::{Deserialize, Serialize};

/// 3D Vector - entity position, velocity, acceleration
///
/// `z` is draw depth only; simulation never reads it beyond integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Drops the depth component.
    #[must_use]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

/// 2D Vector - position, velocity, acceleration
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// The rectangle covers `x..x + width` horizontally and `y - height..y`
/// vertically, matching how sprites hang down from their anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub top_left: Vec2,
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(top_left: Vec2, width: f32, height: f32) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Returns true if the two rectangles overlap. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        rects_intersect(self.top_left, self.width, self.height, other.top_left, other.width, other.height)
    }
}

/// Overlap test for two top-left anchored rectangles.
#[must_use]
pub fn rects_intersect(
    a: Vec2,
    a_width: f32,
    a_height: f32,
    b: Vec2,
    b_width: f32,
    b_height: f32,
) -> bool {
    let horizontal = a.x < b.x + b_width && b.x < a.x + a_width;
    let vertical = a.y - a_height < b.y && b.y - b_height < a.y;
    horizontal && vertical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let mut v = Vec2::new(1.0, 2.0) + Vec2::new(3.0, -1.0);
        assert_eq!(v, Vec2::new(4.0, 1.0));
        v *= 0.5;
        assert_eq!(v, Vec2::new(2.0, 0.5));
        assert!((Vec2::new(3.0, 4.0).length_squared() - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::new(Vec2::new(0.0, 10.0), 2.0, 2.0);
        let b = Rect::new(Vec2::new(1.0, 9.0), 2.0, 2.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_rects_touching_do_not_overlap() {
        let a = Rect::new(Vec2::new(0.0, 10.0), 2.0, 2.0);
        let right = Rect::new(Vec2::new(2.0, 10.0), 2.0, 2.0);
        let below = Rect::new(Vec2::new(0.0, 8.0), 2.0, 2.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }
}
