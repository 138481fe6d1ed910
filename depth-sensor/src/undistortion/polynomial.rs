use super::{correct_along_ray, UndistortionModel};
use crate::{Polynomial, Result};
use depth_core::nalgebra::RealField;
use depth_core::DepthRepresentation;

/// Corrects every sample with the same polynomial of its depth.
///
/// $$
/// d' = p(d)
/// $$
///
/// This captures the depth-dependent bias of a sensor, but not how that bias changes across the
/// image. See [`LocalPolynomialUndistortion`](super::LocalPolynomialUndistortion) and
/// [`InterpolatedUndistortion`](super::InterpolatedUndistortion) for that.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialUndistortion<T: RealField + Copy, const N: usize> {
    polynomial: Polynomial<T, N>,
}

impl<T: RealField + Copy, const N: usize> PolynomialUndistortion<T, N> {
    pub fn new(polynomial: Polynomial<T, N>) -> Result<Self> {
        polynomial.validate()?;
        Ok(Self { polynomial })
    }

    pub fn polynomial(&self) -> &Polynomial<T, N> {
        &self.polynomial
    }
}

impl<R, const N: usize> UndistortionModel<R> for PolynomialUndistortion<R::Scalar, N>
where
    R: DepthRepresentation,
{
    fn correct(&self, point: &R::Point) -> R::Point {
        correct_along_ray::<R, _>(point, |_, depth| Some(self.polynomial.evaluate(depth)))
    }
}
