pub mod augment;
pub mod compose;
pub mod policy;
pub mod tensor;
pub mod traits;

pub use augment::{RandomCrop, RandomHorizontalFlip};
pub use compose::Compose;
pub use policy::{Cifar10Policy, PolicyOp, SubPolicy};
pub use tensor::{Normalize, ToTensor};
pub use traits::{Identity, Then, Transform};

#[cfg(test)]
#[path = "tensor_test.rs"]
mod tensor_tests;
