use crate::{
    AnyUndistortionModel, DepthErrorFunction, DepthSensor, Error, ImageDomain,
    InterpolatedUndistortion, LocalPolynomialUndistortion, NoUndistortion, Polynomial,
    PolynomialGrid, PolynomialUndistortion, Result, SharedUndistortionModel,
};
use depth_core::nalgebra::{self, Point2, RealField, SVector};
use depth_core::DepthRepresentation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serialized form of an undistortion model.
///
/// Coefficients are stored as plain `f64` lists in ascending order of power, so the same
/// configuration can be built for any scalar type and any polynomial degree. The length of each
/// list is checked when the model is built.
///
/// ```json
/// { "model": "polynomial", "coefficients": [0.01, 1.02, 0.0] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum UndistortionConfig {
    None,
    Polynomial {
        coefficients: Vec<f64>,
    },
    LocalPolynomial {
        domain: DomainConfig,
        cols: usize,
        rows: usize,
        /// One coefficient list per cell, row by row.
        coefficients: Vec<Vec<f64>>,
    },
    Interpolated {
        domain: DomainConfig,
        cols: usize,
        rows: usize,
        /// One coefficient list per node, row by row.
        coefficients: Vec<Vec<f64>>,
    },
}

/// Bounds of an [`ImageDomain`] on the virtual image plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Default for UndistortionConfig {
    fn default() -> Self {
        Self::None
    }
}

impl UndistortionConfig {
    /// Build the model for representation `R` with polynomials of `N` coefficients.
    pub fn build<R, const N: usize>(&self) -> Result<SharedUndistortionModel<R>>
    where
        R: DepthRepresentation,
    {
        let model: SharedUndistortionModel<R> = match self {
            Self::None => NoUndistortion::shared(),
            Self::Polynomial { coefficients } => {
                let polynomial = polynomial::<R::Scalar, N>(coefficients)?;
                Arc::new(PolynomialUndistortion::new(polynomial)?)
            }
            Self::LocalPolynomial {
                domain,
                cols,
                rows,
                coefficients,
            } => Arc::new(LocalPolynomialUndistortion::new(
                domain.build()?,
                grid::<R::Scalar, N>(*cols, *rows, coefficients)?,
            )),
            Self::Interpolated {
                domain,
                cols,
                rows,
                coefficients,
            } => Arc::new(InterpolatedUndistortion::new(
                domain.build()?,
                grid::<R::Scalar, N>(*cols, *rows, coefficients)?,
            )?),
        };
        Ok(model)
    }

    /// Build the model for representation `R`, erasing the representation.
    pub fn build_any<R, const N: usize>(&self) -> Result<AnyUndistortionModel>
    where
        R: DepthRepresentation,
    {
        self.build::<R, N>().map(AnyUndistortionModel::new)
    }
}

impl DomainConfig {
    pub fn build<T: RealField + Copy>(&self) -> Result<ImageDomain<T>> {
        ImageDomain::new(
            Point2::new(nalgebra::convert(self.min[0]), nalgebra::convert(self.min[1])),
            Point2::new(nalgebra::convert(self.max[0]), nalgebra::convert(self.max[1])),
        )
    }
}

/// Serialized form of a [`DepthErrorFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DepthErrorConfig {
    pub coefficients: [f64; 3],
}

impl DepthErrorConfig {
    pub fn build<T: RealField + Copy>(&self) -> Result<DepthErrorFunction<T>> {
        polynomial(&self.coefficients)
    }
}

/// Serialized form of a [`DepthSensor`].
///
/// Both fields may be omitted, giving a sensor without undistortion and with a zero error
/// function.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthSensorConfig {
    pub undistortion: UndistortionConfig,
    pub depth_error: DepthErrorConfig,
}

impl DepthSensorConfig {
    pub fn build<R, const N: usize>(&self) -> Result<DepthSensor<R>>
    where
        R: DepthRepresentation,
    {
        let mut sensor =
            DepthSensor::new().with_undistortion_model(self.undistortion.build::<R, N>()?);
        sensor.set_depth_error_function(self.depth_error.build()?)?;
        Ok(sensor)
    }
}

fn polynomial<T, const N: usize>(coefficients: &[f64]) -> Result<Polynomial<T, N>>
where
    T: RealField + Copy,
{
    if coefficients.len() != N {
        return Err(Error::CoefficientCount {
            expected: N,
            found: coefficients.len(),
        });
    }
    let polynomial = Polynomial::new(SVector::from_iterator(
        coefficients.iter().map(|&c| nalgebra::convert::<f64, T>(c)),
    ));
    polynomial.validate()?;
    Ok(polynomial)
}

fn grid<T: RealField + Copy, const N: usize>(
    cols: usize,
    rows: usize,
    coefficients: &[Vec<f64>],
) -> Result<PolynomialGrid<T, N>> {
    let polynomials = coefficients
        .iter()
        .map(|c| polynomial(c))
        .collect::<Result<Vec<_>>>()?;
    PolynomialGrid::new(cols, rows, polynomials)
}
