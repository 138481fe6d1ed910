//! # Depth Core
//!
//! This library provides the depth representations shared by the depth sensor calibration crates.
//! A depth sensor (an RGB-D camera, a time-of-flight camera, a structured light sensor) produces
//! samples that carry a depth reading and the 3d position it unprojects to. Depending on the
//! surrounding code those samples are stored either as a dense matrix field or as a point cloud
//! of (possibly richer) point records. This crate abstracts over both with the
//! [`DepthRepresentation`] trait so that algorithms which only need a depth and a position
//! can be written once.
//!
//! ## Backends
//!
//! * [`DenseDepth`] stores samples as `nalgebra` points, and fields of samples as a
//!   [`DenseCloud`], a `3 x (width * height)` matrix.
//! * [`PointCloudDepth`] stores samples as point records implementing [`CloudPoint`] (for instance
//!   [`PointXYZ`] or [`PointXYZRGB`]), and fields of samples as a [`PointCloud`].
//!
//! ## Coordinates
//!
//! Positions use the usual camera frame: positive X is right, positive Y is down, and positive Z
//! points forwards from the optical center. The depth of a sample is its Z component. Dividing the
//! X and Y components by the depth gives the [`NormalizedPoint`] of the sample on the virtual
//! image plane, which is how correction models locate a sample independently of its backend.
//!
//! ```
//! use depth_core::{DenseCloud, DenseDepth, DepthIntrinsics, DepthRepresentation};
//! use depth_core::nalgebra::{DMatrix, Point2, Vector2};
//!
//! let intrinsics = DepthIntrinsics::identity()
//!     .focals(Vector2::new(525.0, 525.0))
//!     .principal_point(Point2::new(1.5, 1.0));
//! let image = DMatrix::from_element(2, 3, 1.25);
//! let cloud = DenseCloud::from_depth_image(&image, &intrinsics);
//! assert_eq!(DenseDepth::<f64>::cloud_dimensions(&cloud), (3, 2));
//! assert_eq!(cloud.depth_image(), image);
//! ```

mod dense;
mod intrinsics;
mod point_cloud;
mod representation;

pub use dense::*;
pub use intrinsics::*;
pub use nalgebra;
pub use point_cloud::*;
pub use representation::*;
