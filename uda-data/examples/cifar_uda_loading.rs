//! Builds the UDA loaders for CIFAR-10 and walks a few batches.
//!
//! Usage: `cargo run --example cifar_uda_loading -- [DATA_DIR] [CLASS_COUNT]`
//!
//! The archive is downloaded into `DATA_DIR` (default `./data`) on first use.

use std::env;

use uda_core::UdaError;
use uda_data::{get_uda, AssemblyConfig, ViewBatch};

fn main() -> Result<(), UdaError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let data_dir = args.next().unwrap_or_else(|| "./data".to_string());
    let class_count = match args.next() {
        Some(n) => n
            .parse()
            .map_err(|e| UdaError::InvalidArgument(format!("class count {:?}: {}", n, e)))?,
        None => 10,
    };

    let config = AssemblyConfig::default();
    let (train_loader, test_loader) = get_uda(class_count, &data_dir, 64, &config)?;
    println!(
        "train: {} images in {} batches, test: {} images in {} batches",
        train_loader.len(),
        train_loader.num_batches(),
        test_loader.len(),
        test_loader.num_batches()
    );

    println!("\n--- UDA train batches ---");
    for (i, batch) in train_loader.iter().take(3).enumerate() {
        match batch? {
            ViewBatch::Paired {
                clean,
                augmented,
                labels,
            } => println!(
                "Batch {i}: clean {:?}, augmented {:?}, labels {:?}",
                clean.shape(),
                augmented.shape(),
                labels.shape()
            ),
            ViewBatch::Single(batch) => println!("Batch {i}: images {:?}", batch.images.shape()),
        }
    }

    println!("\n--- Test batches ---");
    for (i, batch) in test_loader.iter().take(2).enumerate() {
        let batch = batch?;
        println!(
            "Batch {i}: images {:?}, first labels {:?}",
            batch.images.shape(),
            batch.labels.iter().take(8).collect::<Vec<_>>()
        );
    }
    Ok(())
}
