// gradflow-core/src/variable/operators.rs

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::ops;
use crate::variable::Variable;

// Operators go through the same recorded operations as the `ops` functions.
// `std::ops` cannot return a `Result`, so shape or dtype errors panic here;
// use the `_op` functions to handle them.
macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $op_fn:path, $scalar_fn:path, $rscalar_fn:path) => {
        impl $trait<&Variable> for &Variable {
            type Output = Variable;

            fn $method(self, rhs: &Variable) -> Variable {
                $op_fn(self, rhs).unwrap_or_else(|e| {
                    panic!("Variable {} failed: {}", stringify!($method), e)
                })
            }
        }

        impl $trait<Variable> for Variable {
            type Output = Variable;

            fn $method(self, rhs: Variable) -> Variable {
                $trait::$method(&self, &rhs)
            }
        }

        impl $trait<&Variable> for Variable {
            type Output = Variable;

            fn $method(self, rhs: &Variable) -> Variable {
                $trait::$method(&self, rhs)
            }
        }

        impl $trait<Variable> for &Variable {
            type Output = Variable;

            fn $method(self, rhs: Variable) -> Variable {
                $trait::$method(self, &rhs)
            }
        }

        impl $trait<f64> for &Variable {
            type Output = Variable;

            fn $method(self, rhs: f64) -> Variable {
                $scalar_fn(self, rhs).unwrap_or_else(|e| {
                    panic!("Variable {} failed: {}", stringify!($method), e)
                })
            }
        }

        impl $trait<f64> for Variable {
            type Output = Variable;

            fn $method(self, rhs: f64) -> Variable {
                $trait::$method(&self, rhs)
            }
        }

        impl $trait<&Variable> for f64 {
            type Output = Variable;

            fn $method(self, rhs: &Variable) -> Variable {
                $rscalar_fn(rhs, self).unwrap_or_else(|e| {
                    panic!("Variable {} failed: {}", stringify!($method), e)
                })
            }
        }

        impl $trait<Variable> for f64 {
            type Output = Variable;

            fn $method(self, rhs: Variable) -> Variable {
                $trait::$method(self, &rhs)
            }
        }
    };
}

impl_binary_operator!(Add, add, ops::add_op, ops::add_scalar, ops::add_scalar);
impl_binary_operator!(Sub, sub, ops::sub_op, ops::sub_scalar, ops::rsub_scalar);
impl_binary_operator!(Mul, mul, ops::mul_op, ops::mul_scalar, ops::mul_scalar);
impl_binary_operator!(Div, div, ops::div_op, ops::div_scalar, ops::rdiv_scalar);

impl Neg for &Variable {
    type Output = Variable;

    fn neg(self) -> Variable {
        ops::neg_op(self).unwrap_or_else(|e| panic!("Variable neg failed: {}", e))
    }
}

impl Neg for Variable {
    type Output = Variable;

    fn neg(self) -> Variable {
        -&self
    }
}
