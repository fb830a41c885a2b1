use std::{
    fmt::Display,
    ops::{Index, IndexMut, Mul, MulAssign},
};

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{
    error::{SwarmError, SwarmResult},
    Float,
};

/// Length below which a vector is considered to be zero (used by [`VectorN::normalize`] and the
/// default equality check).
pub const DEFAULT_EPSILON: Float = 1e-30;

/// A dense vector whose dimension is chosen at runtime.
///
/// All binary operations check that both operands have the same length and fail with
/// [`SwarmError::DimensionMismatch`] otherwise; nothing is ever truncated or padded. Equality
/// (`==`) is approximate: two vectors are equal if they have the same length and every pair of
/// components differs by at most [`DEFAULT_EPSILON`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VectorN {
    data: DVector<Float>,
}

impl VectorN {
    /// Create a vector of the given dimension with every component set to zero.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            data: DVector::zeros(dimension),
        }
    }
    /// Create a vector of the given dimension with every component set to `value`.
    pub fn from_element(dimension: usize, value: Float) -> Self {
        Self {
            data: DVector::from_element(dimension, value),
        }
    }
    /// The number of components.
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Returns `true` if the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Fails with [`SwarmError::DimensionMismatch`] unless `other` has the same length as `self`.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn check_dimension(&self, other: &Self) -> SwarmResult<()> {
        if self.len() != other.len() {
            return Err(SwarmError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }
    /// Get the component at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn get(&self, index: usize) -> SwarmResult<Float> {
        self.data
            .get(index)
            .copied()
            .ok_or(SwarmError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }
    /// Set the component at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn set(&mut self, index: usize, value: Float) -> SwarmResult<()> {
        let len = self.len();
        let component = self
            .data
            .get_mut(index)
            .ok_or(SwarmError::IndexOutOfRange { index, len })?;
        *component = value;
        Ok(())
    }
    /// Set every component to `value`.
    pub fn fill(&mut self, value: Float) {
        self.data.fill(value);
    }
    /// Change the dimension of the vector. New components are zero.
    pub fn resize(&mut self, dimension: usize) {
        let data = std::mem::replace(&mut self.data, DVector::zeros(0));
        self.data = data.resize_vertically(dimension, 0.0);
    }
    /// Component-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if the lengths differ.
    pub fn try_add(&self, other: &Self) -> SwarmResult<Self> {
        self.check_dimension(other)?;
        Ok((&self.data + &other.data).into())
    }
    /// Component-wise difference `self - other`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if the lengths differ.
    pub fn try_sub(&self, other: &Self) -> SwarmResult<Self> {
        self.check_dimension(other)?;
        Ok((&self.data - &other.data).into())
    }
    /// In-place component-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if the lengths differ; `self` is unchanged.
    pub fn try_add_assign(&mut self, other: &Self) -> SwarmResult<()> {
        self.check_dimension(other)?;
        self.data += &other.data;
        Ok(())
    }
    /// In-place component-wise difference.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if the lengths differ; `self` is unchanged.
    pub fn try_sub_assign(&mut self, other: &Self) -> SwarmResult<()> {
        self.check_dimension(other)?;
        self.data -= &other.data;
        Ok(())
    }
    /// Multiply every component by `factor`.
    pub fn scale(&self, factor: Float) -> Self {
        self.data.scale(factor).into()
    }
    /// Dot product.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if the lengths differ.
    pub fn dot(&self, other: &Self) -> SwarmResult<Float> {
        self.check_dimension(other)?;
        Ok(self.data.dot(&other.data))
    }
    /// Euclidean length.
    pub fn length(&self) -> Float {
        self.data.norm()
    }
    /// Euclidean distance between `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if the lengths differ.
    pub fn distance(&self, other: &Self) -> SwarmResult<Float> {
        self.check_dimension(other)?;
        Ok((&self.data - &other.data).norm())
    }
    /// Scale the vector to unit length.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DegenerateVector`] if the length is at most [`DEFAULT_EPSILON`].
    pub fn normalize(&mut self) -> SwarmResult<()> {
        self.normalize_with(DEFAULT_EPSILON)
    }
    /// Scale the vector to unit length, treating lengths up to `epsilon` as zero.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DegenerateVector`] if the length is at most `epsilon`.
    pub fn normalize_with(&mut self, epsilon: Float) -> SwarmResult<()> {
        let length = self.length();
        if length <= epsilon {
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
    pub fn normalized(&self) -> SwarmResult<Self> {
        let mut res = self.clone();
        res.normalize()?;
        Ok(res)
    }
    /// Returns `true` if the length is at most `epsilon`.
    pub fn is_zero(&self, epsilon: Float) -> bool {
        self.length() <= epsilon
    }
    /// Component-wise comparison with a tolerance.
    pub fn approx_eq(&self, other: &Self, epsilon: Float) -> bool {
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }
    /// The components as a slice.
    pub fn as_slice(&self) -> &[Float] {
        self.data.as_slice()
    }
    /// The underlying [`DVector`].
    pub const fn as_dvector(&self) -> &DVector<Float> {
        &self.data
    }
    /// Iterate over the components.
    pub fn iter(&self) -> impl Iterator<Item = &Float> {
        self.data.iter()
    }
    /// Format the vector with the given number of digits after the decimal point.
    pub fn to_string_with(&self, digits: usize) -> String {
        let parts: Vec<String> = self
            .data
            .iter()
            .map(|v| format!("{:.*}", digits, v))
            .collect();
        format!("[{}]", parts.join(", "))
    }
}

impl Default for VectorN {
    fn default() -> Self {
        Self::zeros(0)
    }
}

impl PartialEq for VectorN {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DEFAULT_EPSILON)
    }
}

impl Index<usize> for VectorN {
    type Output = Float;

    /// # Panics
    ///
    /// Panics if `index` is out of range, like slice indexing. Use [`VectorN::get`] for a
    /// checked access.
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for VectorN {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl Mul<Float> for &VectorN {
    type Output = VectorN;
    fn mul(self, rhs: Float) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<Float> for VectorN {
    type Output = Self;
    fn mul(mut self, rhs: Float) -> Self::Output {
        self.data.scale_mut(rhs);
        self
    }
}

impl MulAssign<Float> for VectorN {
    fn mul_assign(&mut self, rhs: Float) {
        self.data.scale_mut(rhs);
    }
}

impl Display for VectorN {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_with(3))
    }
}

impl From<DVector<Float>> for VectorN {
    fn from(data: DVector<Float>) -> Self {
        Self { data }
    }
}
impl From<Vec<Float>> for VectorN {
    fn from(value: Vec<Float>) -> Self {
        Self {
            data: DVector::from_vec(value),
        }
    }
}
impl From<&[Float]> for VectorN {
    fn from(value: &[Float]) -> Self {
        Self {
            data: DVector::from_column_slice(value),
        }
    }
}
impl From<VectorN> for DVector<Float> {
    fn from(value: VectorN) -> Self {
        value.data
    }
}
