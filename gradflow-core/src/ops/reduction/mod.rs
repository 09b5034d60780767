// Reduction operations
pub mod sum;
pub mod sum_to;

pub use sum::sum_op;
pub use sum_to::sum_to_op;

#[cfg(test)]
#[path = "reduction_test.rs"]
mod tests;
