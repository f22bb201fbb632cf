//! Late-bound multiply-add operations, resolved by name at runtime.

use crate::error::{Error, Result};
use crate::fma::Float;

/// A multiply-add operation invoked through dynamic dispatch.
pub trait MulAddOp<T: Float>: Send + Sync {
    /// Registry name of this operation.
    fn name(&self) -> &'static str;

    /// Computes `x * y + z`.
    fn mul_add(&self, x: T, y: T, z: T) -> T;
}

/// Single-rounding multiply-add.
#[derive(Debug, Clone, Copy, Default)]
pub struct FusedOp;

impl<T: Float> MulAddOp<T> for FusedOp {
    fn name(&self) -> &'static str {
        "fma"
    }

    #[inline]
    fn mul_add(&self, x: T, y: T, z: T) -> T {
        x.fused_mul_add(y, z)
    }
}

/// Multiply then add, two roundings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparateOp;

impl<T: Float> MulAddOp<T> for SeparateOp {
    fn name(&self) -> &'static str {
        "mul_then_add"
    }

    #[inline]
    fn mul_add(&self, x: T, y: T, z: T) -> T {
        x * y + z
    }
}

/// Names accepted by [`lookup_op`].
pub const OPERATION_NAMES: &[&str] = &["fma", "mul_then_add"];

/// Resolves a multiply-add operation by name.
///
/// # Example
///
/// ```
/// use fmabench_core::reduction::lookup_op;
///
/// let op = lookup_op::<f64>("fma").unwrap();
/// assert_eq!(op.mul_add(2.0, 3.0, 1.0), 7.0);
/// assert!(lookup_op::<f64>("fms").is_err());
/// ```
pub fn lookup_op<T: Float>(name: &str) -> Result<&'static dyn MulAddOp<T>> {
    match name {
        "fma" => Ok(&FusedOp),
        "mul_then_add" => Ok(&SeparateOp),
        other => Err(Error::UnknownOperation(other.to_string())),
    }
}
