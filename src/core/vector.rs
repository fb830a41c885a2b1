use std::{
    fmt::Display,
    ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign},
};

use nalgebra::Vector3 as NVector3;
use serde::{Deserialize, Serialize};

use crate::{
    core::vector_n::DEFAULT_EPSILON,
    error::{SwarmError, SwarmResult},
    Float,
};

/// A vector with exactly three components.
///
/// Since the dimension is fixed, arithmetic can never fail and the usual operator traits are
/// implemented. Equality is approximate, see [`Vector3::approx_eq`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Vector3 {
    data: NVector3<Float>,
}

impl Vector3 {
    /// Create a vector from its components.
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self {
            data: NVector3::new(x, y, z),
        }
    }
    /// The first component.
    pub fn x(&self) -> Float {
        self.data.x
    }
    /// The second component.
    pub fn y(&self) -> Float {
        self.data.y
    }
    /// The third component.
    pub fn z(&self) -> Float {
        self.data.z
    }
    /// Get the component at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::IndexOutOfRange`] if `index >= 3`.
    pub fn get(&self, index: usize) -> SwarmResult<Float> {
        self.data
            .get(index)
            .copied()
            .ok_or(SwarmError::IndexOutOfRange { index, len: 3 })
    }
    /// Set the component at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::IndexOutOfRange`] if `index >= 3`.
    pub fn set(&mut self, index: usize, value: Float) -> SwarmResult<()> {
        let component = self
            .data
            .get_mut(index)
            .ok_or(SwarmError::IndexOutOfRange { index, len: 3 })?;
        *component = value;
        Ok(())
    }
    /// Dot product.
    pub fn dot(&self, other: &Self) -> Float {
        self.data.dot(&other.data)
    }
    /// Cross product `self × other`.
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            data: self.data.cross(&other.data),
        }
    }
    /// Euclidean length.
    pub fn length(&self) -> Float {
        self.data.norm()
    }
    /// Scale the vector to unit length.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DegenerateVector`] if the length is at most [`DEFAULT_EPSILON`].
    pub fn normalize(&mut self) -> SwarmResult<()> {
        let length = self.length();
        if length <= DEFAULT_EPSILON {
            return Err(SwarmError::DegenerateVector { length });
        }
        self.data.unscale_mut(length);
        Ok(())
    }
    /// A unit-length copy of the vector.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DegenerateVector`] if the length is at most [`DEFAULT_EPSILON`].
    pub fn normalized(mut self) -> SwarmResult<Self> {
        self.normalize()?;
        Ok(self)
    }
    /// Component-wise comparison with a tolerance.
    pub fn approx_eq(&self, other: &Self, epsilon: Float) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DEFAULT_EPSILON)
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            data: self.data + rhs.data,
        }
    }
}
impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        self.data += rhs.data;
    }
}
impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            data: self.data - rhs.data,
        }
    }
}
impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        self.data -= rhs.data;
    }
}
impl Mul<Float> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: Float) -> Self::Output {
        Self {
            data: self.data * rhs,
        }
    }
}
impl MulAssign<Float> for Vector3 {
    fn mul_assign(&mut self, rhs: Float) {
        self.data *= rhs;
    }
}
impl Div<Float> for Vector3 {
    type Output = Self;
    fn div(self, rhs: Float) -> Self::Output {
        Self {
            data: self.data / rhs,
        }
    }
}

impl Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x(), self.y(), self.z())
    }
}

impl From<[Float; 3]> for Vector3 {
    fn from(value: [Float; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_operators() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(a + b, Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(a - b, Vector3::new(0.0, 1.0, 2.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a / 2.0, Vector3::new(0.5, 1.0, 1.5));
        let mut c = a;
        c += b;
        c -= a;
        c *= 3.0;
        assert_eq!(c, Vector3::from([3.0, 3.0, 3.0]));
        assert_relative_eq!(a.dot(&b), 6.0);
    }

    #[test]
    fn test_cross() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_normalize() {
        let v = Vector3::new(0.0, 3.0, 4.0).normalized().unwrap();
        assert_relative_eq!(v.length(), 1.0);
        assert_relative_eq!(v.z(), 0.8);
        assert!(matches!(
            Vector3::default().normalized(),
            Err(SwarmError::DegenerateVector { .. })
        ));
    }

    #[test]
    fn test_checked_access() {
        let mut v = Vector3::default();
        v.set(2, 1.5).unwrap();
        assert_eq!(v.get(2).unwrap(), 1.5);
        assert!(matches!(
            v.get(3),
            Err(SwarmError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(v.set(7, 0.0).is_err());
    }
}
