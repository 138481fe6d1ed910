//! This crate plugs into `depth-core` and provides the depth sensor model used by calibration pipelines.
//! A [`DepthSensor`] carries an [`UndistortionModel`] that corrects raw depth samples before they are
//! used to compute residuals, and a [`DepthErrorFunction`] that gives the expected measurement error at
//! a given depth so that those residuals can be weighted.
//!
//! Undistortion models are written once for every [`DepthRepresentation`](depth_core::DepthRepresentation),
//! so the same calibration corrects dense fields and point clouds. The shipped models are:
//!
//! * [`NoUndistortion`], the identity, which is what every new sensor starts with,
//! * [`PolynomialUndistortion`], a single polynomial of depth,
//! * [`LocalPolynomialUndistortion`], one polynomial per cell of a grid over the image,
//! * [`InterpolatedUndistortion`], a bilinear blend of polynomials placed on grid nodes.
//!
//! A model is attached to a sensor through a [`SharedUndistortionModel`], so several sensors can share
//! one model, also across threads.
//!
//! ```
//! use depth_sensor::{DenseDepthSensor, DepthErrorFunction, Polynomial, PolynomialUndistortion};
//! use depth_sensor::depth_core::nalgebra::Point3;
//! use std::sync::Arc;
//!
//! let mut sensor = DenseDepthSensor::<f64>::new();
//! let point = Point3::new(0.5, -0.25, 2.0);
//! assert_eq!(sensor.correct(&point), point);
//!
//! let model = PolynomialUndistortion::new(Polynomial::from_coefficients([0.0, 1.5])).unwrap();
//! sensor.set_undistortion_model(Arc::new(model));
//! assert_eq!(sensor.correct(&point), Point3::new(0.75, -0.375, 3.0));
//!
//! sensor
//!     .set_depth_error_function(DepthErrorFunction::from_coefficients([1.0, 2.0, 0.5]))
//!     .unwrap();
//! assert_eq!(sensor.depth_error(2.0), 7.0);
//! ```

#[cfg(feature = "serde-serialize")]
mod config;
mod error;
mod polynomial;
mod sensor;
mod undistortion;

#[cfg(feature = "serde-serialize")]
pub use config::*;
pub use depth_core;
pub use error::*;
pub use polynomial::*;
pub use sensor::*;
pub use undistortion::*;
