//! Core types shared by the UDA data pipeline: the error type and the
//! conversions between images and `ndarray` tensors.

pub mod error;
pub mod tensor;

pub use error::UdaError;
pub use tensor::{BatchTensor, ImageTensor, Label, LabelTensor};

// Re-export the array and image crates so downstream code and tests agree on versions.
pub use image;
pub use ndarray;
