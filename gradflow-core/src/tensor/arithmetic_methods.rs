// gradflow-core/src/tensor/arithmetic_methods.rs

use crate::error::GradflowError;
use crate::tensor::kernels::{
    AddKernel, CosKernel, DivKernel, ExpKernel, LnKernel, MulKernel, NegKernel, PowfKernel,
    SinKernel, SubKernel, TanhKernel,
};
use crate::tensor::Tensor;

impl Tensor {
    /// Element-wise addition with broadcasting.
    pub fn add(&self, other: &Tensor) -> Result<Tensor, GradflowError> {
        self.zip_broadcast(other, AddKernel, "add")
    }

    /// Element-wise subtraction with broadcasting.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, GradflowError> {
        self.zip_broadcast(other, SubKernel, "sub")
    }

    /// Element-wise multiplication with broadcasting.
    pub fn mul(&self, other: &Tensor) -> Result<Tensor, GradflowError> {
        self.zip_broadcast(other, MulKernel, "mul")
    }

    /// Element-wise division with broadcasting. Division by zero follows IEEE 754.
    pub fn div(&self, other: &Tensor) -> Result<Tensor, GradflowError> {
        self.zip_broadcast(other, DivKernel, "div")
    }

    pub fn neg(&self) -> Tensor {
        self.map_unary(NegKernel)
    }

    /// Raises every element to the constant power `exponent`.
    pub fn powf(&self, exponent: f64) -> Tensor {
        self.map_unary(PowfKernel(exponent))
    }

    pub fn sin(&self) -> Tensor {
        self.map_unary(SinKernel)
    }

    pub fn cos(&self) -> Tensor {
        self.map_unary(CosKernel)
    }

    pub fn tanh(&self) -> Tensor {
        self.map_unary(TanhKernel)
    }

    pub fn exp(&self) -> Tensor {
        self.map_unary(ExpKernel)
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Tensor {
        self.map_unary(LnKernel)
    }
}
