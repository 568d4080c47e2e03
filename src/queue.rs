use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

struct Inner<T> {
    queue: Mutex<VecDeque<T>>,
    available: Condvar,
    run: AtomicBool,
}

/// Single-consumer queue: producers push from any thread, one worker
/// thread drains items into the supplied callable in push order. Dropping
/// the queue flushes whatever is still pending before joining the worker.
pub struct AsyncQueue<T> {
    inner: Arc<Inner<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> AsyncQueue<T> {
    pub fn new<F>(callable: F) -> Self
    where
        F: Fn(T) + Send + 'static,
    {
        let inner = Arc::new(Inner {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            run: AtomicBool::new(true),
        });

        let worker_inner = Arc::clone(&inner);
        let worker = std::thread::spawn(move || {
            let mut queue = worker_inner.queue.lock();
            loop {
                if let Some(item) = queue.pop_front() {
                    drop(queue);
                    callable(item);
                    queue = worker_inner.queue.lock();
                    continue;
                }
                if !worker_inner.run.load(Ordering::Acquire) {
                    break;
                }
                worker_inner.available.wait(&mut queue);
            }
        });

        Self {
            inner,
            worker: Some(worker),
        }
    }

    pub fn push(&self, item: T) {
        let mut queue = self.inner.queue.lock();
        queue.push_back(item);
        drop(queue);
        self.inner.available.notify_one();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().is_empty()
    }
}

impl<T> Drop for AsyncQueue<T> {
    fn drop(&mut self) {
        self.inner.run.store(false, Ordering::Release);
        self.inner.available.notify_one();
        if let Some(worker) = self.worker.take() {
            // Worker drains remaining items before exiting.
            let _ = worker.join();
        }
    }
}
