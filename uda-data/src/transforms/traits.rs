// uda-data/src/transforms/traits.rs

use uda_core::UdaError;

/// A transformation applied to a sample's input before it is returned by a dataset.
///
/// Transforms may change the input type, e.g. [`ToTensor`](super::ToTensor) turns an
/// `RgbImage` into an `ImageTensor`. Pipelines are built by chaining with
/// [`Transform::then`].
pub trait Transform<I>: Send + Sync {
    /// The type produced by this transform.
    type Output;

    /// Applies the transform.
    ///
    /// # Errors
    ///
    /// Returns a `UdaError` if the input does not have the expected shape.
    fn apply(&self, input: I) -> Result<Self::Output, UdaError>;

    /// Chains `next` after `self`.
    fn then<U>(self, next: U) -> Then<Self, U>
    where
        Self: Sized,
        U: Transform<Self::Output>,
    {
        Then {
            first: self,
            second: next,
        }
    }
}

/// Two transforms applied one after the other. Built by [`Transform::then`].
#[derive(Debug, Clone)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

impl<I, A, B> Transform<I> for Then<A, B>
where
    A: Transform<I>,
    B: Transform<A::Output>,
{
    type Output = B::Output;

    fn apply(&self, input: I) -> Result<Self::Output, UdaError> {
        self.second.apply(self.first.apply(input)?)
    }
}

/// Returns its input unchanged. Stands in for "no transform".
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<I> Transform<I> for Identity {
    type Output = I;

    fn apply(&self, input: I) -> Result<I, UdaError> {
        Ok(input)
    }
}
