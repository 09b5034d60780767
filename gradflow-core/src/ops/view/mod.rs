// Shape-manipulating operations
pub mod broadcast_to;
pub mod reshape;
pub mod transpose;

pub use broadcast_to::broadcast_to_op;
pub use reshape::reshape_op;
pub use transpose::transpose_op;

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
