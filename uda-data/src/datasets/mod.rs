pub mod array_image_dataset;
pub mod cifar;
pub mod cifar10_1;
pub mod paired_view;
pub mod traits;
pub mod vec_dataset;

pub use array_image_dataset::ArrayImageDataset;
pub use cifar::{CifarDataset, CifarKind};
pub use cifar10_1::load_cifar10_1;
pub use paired_view::{PairedViewDataset, ViewSample};
pub use traits::{BoxedDataset, Dataset};
pub use vec_dataset::VecDataset;
