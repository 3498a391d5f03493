use rayon::{
    ThreadBuilder, ThreadPoolBuilder,
    iter::{IntoParallelIterator, ParallelIterator},
};

use crate::error::VerifyError;

/// Bound on concurrent tasks. Each batch gets its own scoped thread pool, whose workers are
/// joined before the batch returns.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    max_workers: usize,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Result<Self, VerifyError> {
        if max_workers == 0 {
            return Err(VerifyError::InvalidWorkerCount);
        }

        Ok(Self { max_workers })
    }

    /// Runs `task` once per job and returns the results in job order, whatever order the
    /// tasks finish in. Blocks until every task has completed and every worker has exited.
    pub fn run_batch<T, U, F>(&self, jobs: Vec<T>, task: F) -> Result<Vec<U>, VerifyError>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Sync + Send,
    {
        self.run_batch_with(|thread| thread.run(), jobs, task)
    }

    /// `worker` wraps each worker thread's main loop and must call [`ThreadBuilder::run`].
    fn run_batch_with<W, T, U, F>(
        &self,
        worker: W,
        jobs: Vec<T>,
        task: F,
    ) -> Result<Vec<U>, VerifyError>
    where
        W: Fn(ThreadBuilder) + Sync,
        T: Send,
        U: Send,
        F: Fn(T) -> U + Sync + Send,
    {
        let results = ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|index| format!("gridcheck-worker-{index}"))
            .build_scoped(worker, |pool| {
                pool.install(|| jobs.into_par_iter().map(&task).collect())
            })?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    use super::*;

    #[test]
    fn results_follow_submission_order() {
        let jobs = (0..64).collect::<Vec<usize>>();

        let results = WorkerPool::new(8)
            .unwrap()
            .run_batch(jobs, |job| {
                // Later jobs finish first.
                thread::sleep(Duration::from_micros((64 - job as u64) * 50));
                job * 2
            })
            .unwrap();

        assert_eq!(results, (0..64).map(|job| job * 2).collect::<Vec<_>>());
    }

    #[test]
    fn concurrency_is_bounded() {
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let pool = WorkerPool::new(3).unwrap();
        pool.run_batch((0..24).collect::<Vec<_>>(), |_| {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            active.fetch_sub(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn workers_have_exited_when_the_batch_returns() {
        let exited = AtomicUsize::new(0);
        let pool = WorkerPool::new(4).unwrap();

        let results = pool
            .run_batch_with(
                |thread| {
                    thread.run();
                    exited.fetch_add(1, Ordering::SeqCst);
                },
                (0..32).collect::<Vec<_>>(),
                |job| {
                    thread::sleep(Duration::from_millis(1));
                    job
                },
            )
            .unwrap();

        assert_eq!(results.len(), 32);
        assert_eq!(exited.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn empty_batches_are_fine() {
        let results = WorkerPool::new(4)
            .unwrap()
            .run_batch(Vec::<u8>::new(), |job| job)
            .unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(VerifyError::InvalidWorkerCount)
        ));
    }
}
