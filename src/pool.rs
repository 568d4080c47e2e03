use parking_lot::Mutex;

struct State {
    counter: usize,
    done: bool,
}

fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Runs `callable` once for every index in `[0, iterations)` across a
/// pool of worker threads. Workers claim fixed-size chunks from a shared
/// counter under a lock and process them outside it, so each index runs
/// exactly once with no per-index synchronization.
pub fn run<F>(callable: F, iterations: usize, chunk_size: usize, threads: usize)
where
    F: Fn(usize) + Sync,
{
    run_with_callback(callable, || {}, iterations, chunk_size, threads);
}

/// Like [`run`], plus a callback thread that invokes `callback` in a
/// loop until every chunk has been claimed. The callback is expected to
/// pace itself (sleeping between progress snapshots, say).
pub fn run_with_callback<F, C>(
    callable: F,
    callback: C,
    iterations: usize,
    chunk_size: usize,
    threads: usize,
) where
    F: Fn(usize) + Sync,
    C: FnMut() + Send,
{
    assert!(chunk_size > 0, "chunk size must be non-zero");
    let threads = if threads == 0 { worker_count() } else { threads };

    let state = Mutex::new(State {
        counter: 0,
        done: iterations == 0,
    });

    let mut callback = callback;
    std::thread::scope(|scope| {
        scope.spawn(|| {
            while !state.lock().done {
                callback();
            }
        });

        for _ in 0..threads {
            scope.spawn(|| loop {
                let (start, end) = {
                    let mut state = state.lock();
                    if state.done {
                        break;
                    }
                    let start = state.counter;
                    let end = (start + chunk_size).min(iterations);
                    state.counter = end;
                    if end == iterations {
                        state.done = true;
                    }
                    (start, end)
                };

                for i in start..end {
                    callable(i);
                }
                if end == iterations {
                    break;
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

    #[test]
    fn every_index_runs_exactly_once() {
        let total = 100_000;
        let counts: Vec<AtomicU8> = (0..total).map(|_| AtomicU8::new(0)).collect();

        run(
            |i| {
                counts[i].fetch_add(1, Ordering::Relaxed);
            },
            total,
            37,
            8,
        );

        assert!(counts.iter().all(|c| c.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn uneven_tail_chunks_are_covered() {
        for (total, chunk, threads) in [(1, 10, 4), (99, 10, 3), (1000, 7, 1), (64, 64, 16)] {
            let ran = AtomicUsize::new(0);
            run(
                |_| {
                    ran.fetch_add(1, Ordering::Relaxed);
                },
                total,
                chunk,
                threads,
            );
            assert_eq!(ran.load(Ordering::Relaxed), total);
        }
    }

    #[test]
    fn zero_iterations_return_immediately() {
        run(|_| panic!("no work expected"), 0, 10, 4);
    }

    #[test]
    fn callback_thread_observes_progress() {
        let calls = AtomicUsize::new(0);
        run_with_callback(
            |_| std::thread::sleep(std::time::Duration::from_micros(50)),
            || {
                calls.fetch_add(1, Ordering::Relaxed);
                std::thread::sleep(std::time::Duration::from_micros(200));
            },
            500,
            10,
            4,
        );
        assert!(calls.load(Ordering::Relaxed) > 0);
    }
}
