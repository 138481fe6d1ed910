use crate::{Error, Result};
use depth_core::nalgebra::{self, RealField, SVector};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Polynomial in depth with `N` coefficients.
///
/// $$
/// p(d, \vec β) = β_0 + β_1 ​⋅ d + β_2 ​⋅ d^2 + ⋯ + β_{N-1} ⋅ d^{N-1}
/// $$
///
/// The coefficients are stored in ascending order of power.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Polynomial<T: RealField + Copy, const N: usize>(SVector<T, N>);

/// Expected measurement error of a depth sensor as a function of depth.
///
/// $$
/// e(d) = c_0 + c_1 ⋅ d + c_2 ⋅ d^2
/// $$
pub type DepthErrorFunction<T> = Polynomial<T, 3>;

impl<T: RealField + Copy, const N: usize> Default for Polynomial<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: RealField + Copy, const N: usize> Polynomial<T, N> {
    pub fn new(coefficients: SVector<T, N>) -> Self {
        Self(coefficients)
    }

    pub fn from_coefficients(coefficients: [T; N]) -> Self {
        Self(SVector::from(coefficients))
    }

    /// The polynomial that evaluates to zero everywhere.
    pub fn zero() -> Self {
        Self(SVector::zeros())
    }

    /// The polynomial $p(d) = d$.
    ///
    /// A polynomial with a single coefficient cannot express this and is the zero polynomial instead.
    pub fn identity() -> Self {
        let mut coefficients = SVector::zeros();
        if N > 1 {
            coefficients[1] = nalgebra::one();
        }
        Self(coefficients)
    }

    /// Coefficients in ascending order of power.
    pub fn coefficients(&self) -> &SVector<T, N> {
        &self.0
    }

    /// Evaluates the polynomial with Horner's scheme.
    ///
    /// Horner order is the reference form: the result is $((β_{N-1} d + β_{N-2}) d + ⋯) d + β_0$
    /// rounded step by step, which is exact whenever every intermediate value is representable.
    pub fn evaluate(&self, value: T) -> T {
        // Basic horner evaluation.
        let mut result: T = nalgebra::zero();
        for i in (0..N).rev() {
            result = result * value + self.0[i];
        }
        result
    }

    pub fn derivative(&self, value: T) -> T {
        self.with_derivative(value).1
    }

    /// Simultaneously compute value and first derivative.
    pub fn with_derivative(&self, value: T) -> (T, T) {
        let mut result: T = nalgebra::zero();
        let mut derivative: T = nalgebra::zero();
        for i in (0..N).rev() {
            derivative = derivative * value + result;
            result = result * value + self.0[i];
        }
        (result, derivative)
    }

    /// Gradient with respect to the coefficients, $[1, d, d^2, …]$.
    pub fn gradient(&self, value: T) -> SVector<T, N> {
        let mut factor: T = nalgebra::one();
        SVector::from_fn(|_, _| {
            let coefficient = factor;
            factor *= value;
            coefficient
        })
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Fails with [`Error::InvalidPolynomial`] on the first coefficient that is not finite.
    pub fn validate(&self) -> Result<()> {
        match self.0.iter().position(|c| !c.is_finite()) {
            Some(index) => Err(Error::InvalidPolynomial { index }),
            None => Ok(()),
        }
    }
}
