//! Execution Context
//!
//! Every parallel scan receives its worker pool as an explicit parameter
//! instead of discovering thread counts from ambient global state. The
//! context owns a rayon pool sized from a `WorkerConfig`.

use crate::errors::{AttributeError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Configuration for worker allocation.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Percentage of cores to use (0-100)
    pub core_percentage: usize,
    /// Minimum workers to allocate
    pub min_workers: usize,
    /// Maximum workers to allocate
    pub max_workers: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            core_percentage: 70,
            min_workers: 2,
            max_workers: 16,
        }
    }
}

impl WorkerConfig {
    /// Conservative config for background scanning
    pub fn conservative() -> Self {
        Self {
            core_percentage: 50,
            min_workers: 1,
            max_workers: 8,
        }
    }

    /// Aggressive config for dedicated batch analysis
    pub fn aggressive() -> Self {
        Self {
            core_percentage: 90,
            min_workers: 4,
            max_workers: 32,
        }
    }
}

/// Calculate the worker count for a configuration on this system.
pub fn optimal_workers(config: &WorkerConfig) -> usize {
    let cpu_count = num_cpus::get();
    let calculated = (cpu_count * config.core_percentage / 100).max(1);
    calculated.clamp(config.min_workers, config.max_workers)
}

/// Owns the worker pool the row scans run on.
pub struct ExecutionContext {
    workers: usize,
    pool: ThreadPool,
}

impl ExecutionContext {
    /// Build a context with an exact worker count.
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| AttributeError::ResourceExhaustion(e.to_string()))?;
        Ok(ExecutionContext { workers, pool })
    }

    /// Build a context sized by a worker configuration.
    pub fn with_config(config: &WorkerConfig) -> Result<Self> {
        ExecutionContext::new(optimal_workers(config))
    }

    /// Build a context with the default configuration.
    pub fn with_default_workers() -> Result<Self> {
        ExecutionContext::with_config(&WorkerConfig::default())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run an operation inside this context's pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}
