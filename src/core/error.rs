//! Input-validation errors.
//!
//! Programmer errors (out-of-range domains, composites without a base,
//! unimplemented moments) panic; only user-facing configuration goes through
//! `Result`.

use crate::Scalar;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LbError {
    #[error("lattice extents must be positive, got {0}")]
    BadExtent(String),

    #[error("viscosity must be greater than 0, got {0}")]
    BadViscosity(Scalar),

    #[error("relaxation parameter omega must lie in (0, 2) for stability, got {0}")]
    BadOmega(Scalar),

    #[error("number of time steps must be greater than 0")]
    NoTimeSteps,
}

/// BGK relaxation parameter for a kinematic viscosity, `omega = 1/(nu/cs2 + 1/2)`.
pub fn relaxation_from_viscosity(nu: Scalar, cs2: Scalar) -> Result<Scalar, LbError> {
    if nu <= 0.0 {
        return Err(LbError::BadViscosity(nu));
    }
    Ok(1.0 / (nu / cs2 + 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viscosity_maps_to_omega() {
        // nu = 1/6 at cs2 = 1/3 gives omega = 1.
        let omega = relaxation_from_viscosity(1.0 / 6.0, 1.0 / 3.0).unwrap();
        assert!((omega - 1.0).abs() < 1e-14);
    }

    #[test]
    fn non_positive_viscosity_is_rejected() {
        assert_eq!(
            relaxation_from_viscosity(0.0, 1.0 / 3.0),
            Err(LbError::BadViscosity(0.0))
        );
    }
}
