//! Dedicated thread pool for cascade fan-out.

use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Parallel execution runtime using Rayon.
///
/// Property Set merges use rayon parallel iterators. Run them inside
/// [`ParallelRuntime::install`] to keep them off the global pool.
#[derive(Debug)]
pub struct ParallelRuntime {
    pool: ThreadPool,
}

impl ParallelRuntime {
    /// Create a runtime with the given number of threads, or one per CPU core
    /// when `num_threads` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread pool cannot be created.
    pub fn new(num_threads: Option<usize>) -> anyhow::Result<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|index| format!("style-{index}"));

        if let Some(num) = num_threads {
            builder = builder.num_threads(num);
        }

        let pool = builder.build()?;
        debug!(target: "style_engine", "style runtime started with {} threads", pool.current_num_threads());

        Ok(Self { pool })
    }

    /// Run `operation` inside the pool; parallel iterators it spawns stay there.
    pub fn install<R, F>(&self, operation: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(operation)
    }

    #[inline]
    pub fn current_num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn work_runs_on_the_dedicated_pool() -> anyhow::Result<()> {
        let runtime = ParallelRuntime::new(Some(2))?;
        assert_eq!(runtime.current_num_threads(), 2);
        let total: u32 = runtime.install(|| (1..=4_u32).into_par_iter().sum());
        assert_eq!(total, 10);
        Ok(())
    }
}
