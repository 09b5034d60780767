/// Defines the possible data types for Tensor elements.
///
/// Only floating-point types are supported: every element type has to be
/// differentiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}
