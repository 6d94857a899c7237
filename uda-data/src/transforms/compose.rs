use uda_core::UdaError;

use super::traits::Transform;

/// An ordered list of same-typed transforms, applied first to last.
pub struct Compose<T> {
    transforms: Vec<Box<dyn Transform<T, Output = T>>>,
}

impl<T> Compose<T> {
    pub fn new(transforms: Vec<Box<dyn Transform<T, Output = T>>>) -> Self {
        Self { transforms }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl<T> Transform<T> for Compose<T> {
    type Output = T;

    fn apply(&self, mut input: T) -> Result<T, UdaError> {
        for t in &self.transforms {
            input = t.apply(input)?;
        }
        Ok(input)
    }
}
