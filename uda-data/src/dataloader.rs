// uda-data/src/dataloader.rs
//! # DataLoader
//!
//! Groups dataset items into batches, in sampler order, and collates each
//! batch. With `num_workers > 0` batches are prepared ahead of the consumer on
//! background threads.
//!
//! ## Example
//!
//! ```rust
//! use uda_data::dataloader::{DataLoader, DataLoaderConfig};
//! use uda_data::datasets::VecDataset;
//!
//! let dataset = VecDataset::new(vec![1, 2, 3, 4, 5, 6]);
//! let config = DataLoaderConfig::default().batch_size(4).num_workers(2);
//! let loader = DataLoader::new(dataset, config).unwrap();
//! for batch in &loader {
//!     let batch = batch.unwrap();
//!     println!("Batch: {:?}", batch);
//! }
//! ```
//!
//! ## Workers
//!
//! Each call to [`DataLoader::iter`] starts one epoch:
//! 1. The sampler draws a fresh index order, cut into batch jobs.
//! 2. The iterator hands out `prefetch_factor * num_workers` jobs up front and
//!    one more each time it yields a batch, so at most that many batches are
//!    held ahead of the consumer.
//! 3. Workers fetch and collate the items of each job and send the result
//!    back; the iterator puts batches back in job order.
//!
//! Workers are joined when the iterator is dropped.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use uda_core::UdaError;

use crate::datasets::Dataset;
use crate::samplers::{RandomSampler, Sampler, SequentialSampler};

/// Collation function: turns the items of one batch into a batch value.
pub type CollateFn<T, B> = Arc<dyn Fn(Vec<T>) -> Result<B, UdaError> + Send + Sync>;

type FetchFn<B> = Arc<dyn Fn(&[usize]) -> Result<B, UdaError> + Send + Sync>;

/// Loader settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLoaderConfig {
    /// Number of items per batch.
    pub batch_size: usize,
    /// Draw a new random order every epoch instead of visiting items in order.
    pub shuffle: bool,
    /// Skip the last batch when it is smaller than `batch_size`.
    pub drop_last: bool,
    /// Number of background threads. 0 loads on the calling thread.
    pub num_workers: usize,
    /// Hint that batches will be copied to an accelerator. Batches here are
    /// plain host arrays, so the flag only shows up in the logs.
    pub pin_memory: bool,
    /// Batches buffered per worker.
    pub prefetch_factor: usize,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            shuffle: false,
            drop_last: false,
            num_workers: 0,
            pin_memory: false,
            prefetch_factor: 2,
        }
    }
}

impl DataLoaderConfig {
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }
    pub fn pin_memory(mut self, pin_memory: bool) -> Self {
        self.pin_memory = pin_memory;
        self
    }
    pub fn prefetch_factor(mut self, prefetch_factor: usize) -> Self {
        self.prefetch_factor = prefetch_factor;
        self
    }
}

/// Batched, optionally parallel, access to a [`Dataset`].
///
/// # Type Parameters
/// - `D`: The dataset. It is shared with worker threads through an `Arc`.
/// - `B`: The batch type produced by the collate function. Defaults to the
///   plain list of items.
pub struct DataLoader<D: Dataset, B = Vec<<D as Dataset>::Item>> {
    dataset: Arc<D>,
    config: DataLoaderConfig,
    sampler: Arc<dyn Sampler>,
    collate_fn: CollateFn<D::Item, B>,
}

impl<D: Dataset + 'static> DataLoader<D> {
    /// Creates a loader whose batches are `Vec`s of items.
    ///
    /// # Errors
    ///
    /// `UdaError::InvalidArgument` if `config.batch_size` is 0.
    pub fn new(dataset: D, config: DataLoaderConfig) -> Result<Self, UdaError> {
        Self::with_collate(dataset, config, |items| Ok(items))
    }
}

impl<D: Dataset + 'static, B: Send + 'static> DataLoader<D, B> {
    /// Creates a loader that collates each batch with `collate_fn`.
    ///
    /// The sampler follows `config.shuffle`: [`RandomSampler`] when set,
    /// [`SequentialSampler`] otherwise.
    ///
    /// # Errors
    ///
    /// `UdaError::InvalidArgument` if `config.batch_size` is 0.
    pub fn with_collate<F>(dataset: D, config: DataLoaderConfig, collate_fn: F) -> Result<Self, UdaError>
    where
        F: Fn(Vec<D::Item>) -> Result<B, UdaError> + Send + Sync + 'static,
    {
        if config.batch_size == 0 {
            return Err(UdaError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if config.pin_memory {
            debug!("pin_memory requested; batches stay in host memory");
        }
        let sampler: Arc<dyn Sampler> = if config.shuffle {
            Arc::new(RandomSampler::default())
        } else {
            Arc::new(SequentialSampler::new())
        };
        Ok(Self {
            dataset: Arc::new(dataset),
            config,
            sampler,
            collate_fn: Arc::new(collate_fn),
        })
    }

    /// Replaces the sampler picked from `config.shuffle`.
    pub fn with_sampler<S: Sampler + 'static>(mut self, sampler: S) -> Self {
        self.sampler = Arc::new(sampler);
        self
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    /// Number of items in the underlying dataset.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Number of batches one epoch yields.
    pub fn num_batches(&self) -> usize {
        let samples = self.sampler.len(self.dataset.len());
        if self.config.drop_last {
            samples / self.config.batch_size
        } else {
            samples.div_ceil(self.config.batch_size)
        }
    }

    /// Starts a new epoch.
    pub fn iter(&self) -> Batches<B> {
        let indices: Vec<usize> = self.sampler.iter(self.dataset.len()).collect();
        let batch_size = self.config.batch_size;
        let jobs: Vec<Vec<usize>> = indices
            .chunks(batch_size)
            .filter(|chunk| !self.config.drop_last || chunk.len() == batch_size)
            .map(<[usize]>::to_vec)
            .collect();

        let fetch = self.fetcher();
        let total = jobs.len();
        if self.config.num_workers == 0 {
            return Batches {
                state: BatchesState::Inline {
                    fetch,
                    jobs: jobs.into_iter(),
                },
                remaining: total,
            };
        }

        debug!(
            "Starting epoch: {} batches on {} workers",
            total, self.config.num_workers
        );
        let prefetcher = Prefetcher::spawn(
            fetch,
            jobs,
            self.config.num_workers,
            self.config.prefetch_factor * self.config.num_workers,
        );
        Batches {
            state: BatchesState::Workers(prefetcher),
            remaining: total,
        }
    }

    fn fetcher(&self) -> FetchFn<B> {
        let dataset = Arc::clone(&self.dataset);
        let collate_fn = Arc::clone(&self.collate_fn);
        Arc::new(move |indices: &[usize]| {
            let items = indices
                .iter()
                .map(|&index| dataset.get(index))
                .collect::<Result<Vec<_>, _>>()?;
            collate_fn(items)
        })
    }
}

impl<'a, D: Dataset + 'static, B: Send + 'static> IntoIterator for &'a DataLoader<D, B> {
    type Item = Result<B, UdaError>;
    type IntoIter = Batches<B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One epoch of batches, in sampler order.
pub struct Batches<B> {
    state: BatchesState<B>,
    remaining: usize,
}

enum BatchesState<B> {
    Inline {
        fetch: FetchFn<B>,
        jobs: std::vec::IntoIter<Vec<usize>>,
    },
    Workers(Prefetcher<B>),
}

impl<B> Iterator for Batches<B> {
    type Item = Result<B, UdaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let batch = match &mut self.state {
            BatchesState::Inline { fetch, jobs } => jobs.next().map(|job| fetch(&job)),
            BatchesState::Workers(prefetcher) => prefetcher.next(),
        };
        match batch {
            Some(Err(UdaError::WorkerFailed(message))) => {
                self.remaining = 0;
                Some(Err(UdaError::WorkerFailed(message)))
            }
            Some(batch) => {
                self.remaining -= 1;
                Some(batch)
            }
            None => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

type Job = (usize, Vec<usize>);
type Message<B> = (usize, Result<B, UdaError>);

// Jobs are handed out by the consumer, one per yielded batch, so at most
// `capacity` batches past `next` are ever queued, in flight or pending.
struct Prefetcher<B> {
    jobs: std::iter::Enumerate<std::vec::IntoIter<Vec<usize>>>,
    job_tx: Option<Sender<Job>>,
    rx: Option<Receiver<Message<B>>>,
    handles: Vec<JoinHandle<()>>,
    // Batches that arrived ahead of their turn.
    pending: HashMap<usize, Result<B, UdaError>>,
    next: usize,
}

impl<B: Send + 'static> Prefetcher<B> {
    fn spawn(fetch: FetchFn<B>, jobs: Vec<Vec<usize>>, workers: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (tx, rx) = mpsc::sync_channel::<Message<B>>(capacity);

        let handles = (0..workers)
            .map(|_| {
                let job_rx = Arc::clone(&job_rx);
                let tx = tx.clone();
                let fetch = Arc::clone(&fetch);
                thread::spawn(move || loop {
                    let job = match job_rx.lock() {
                        Ok(job_rx) => job_rx.recv().ok(),
                        Err(_) => None,
                    };
                    let Some((position, indices)) = job else {
                        break;
                    };
                    let (batch, panicked) =
                        match panic::catch_unwind(AssertUnwindSafe(|| fetch(&indices))) {
                            Ok(batch) => (batch, false),
                            Err(_) => (
                                Err(UdaError::WorkerFailed(format!(
                                    "worker panicked while loading batch {}",
                                    position
                                ))),
                                true,
                            ),
                        };
                    // The receiver is gone once the consumer drops the iterator.
                    if tx.send((position, batch)).is_err() || panicked {
                        break;
                    }
                })
            })
            .collect();
        drop(tx);

        let mut prefetcher = Self {
            jobs: jobs.into_iter().enumerate(),
            job_tx: Some(job_tx),
            rx: Some(rx),
            handles,
            pending: HashMap::new(),
            next: 0,
        };
        for _ in 0..capacity {
            prefetcher.dispatch();
        }
        prefetcher
    }
}

impl<B> Prefetcher<B> {
    // Hands the next job to the workers. Closing the job channel once every
    // job is out lets idle workers exit.
    fn dispatch(&mut self) {
        if let Some(job) = self.jobs.next() {
            if let Some(job_tx) = &self.job_tx {
                if job_tx.send(job).is_ok() {
                    return;
                }
            }
        }
        self.job_tx = None;
    }

    fn next(&mut self) -> Option<Result<B, UdaError>> {
        loop {
            if let Some(batch) = self.pending.remove(&self.next) {
                self.next += 1;
                self.dispatch();
                return Some(batch);
            }
            let rx = self.rx.as_ref()?;
            match rx.recv() {
                Ok((position, batch)) => {
                    self.pending.insert(position, batch);
                }
                Err(_) => {
                    self.rx = None;
                    return Some(Err(UdaError::WorkerFailed(format!(
                        "workers exited before producing batch {}",
                        self.next
                    ))));
                }
            }
        }
    }
}

impl<B> Drop for Prefetcher<B> {
    fn drop(&mut self) {
        // Unblocks workers waiting for a job or on a full channel.
        self.job_tx.take();
        self.rx.take();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("A data loader worker panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
