use depth_core::RepresentationKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(
        "representation mismatch: expected an undistortion model for {expected} ({expected_kind}), \
         got one for {found} ({found_kind})"
    )]
    RepresentationMismatch {
        expected: &'static str,
        expected_kind: RepresentationKind,
        found: &'static str,
        found_kind: RepresentationKind,
    },
    #[error("invalid polynomial: coefficient {index} is not finite")]
    InvalidPolynomial { index: usize },
    #[error("invalid polynomial grid of {cols}x{rows}: {reason}")]
    InvalidGrid {
        cols: usize,
        rows: usize,
        reason: &'static str,
    },
    #[error("invalid image domain: bounds must be finite and min must be below max on both axes")]
    InvalidDomain,
    #[error("expected {expected} polynomial coefficients, got {found}")]
    CoefficientCount { expected: usize, found: usize },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
