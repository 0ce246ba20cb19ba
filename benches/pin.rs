use std::mem;
use std::sync::atomic::Ordering::Acquire;

use criterion::{criterion_group, criterion_main, Criterion};
use crossbeam_utils::thread::scope;

use ebr::{acquire_guard, AtomicMarkedPtr, Config, MarkedPtr, CONFIG};

fn pinned_slot() -> AtomicMarkedPtr<u64, 0> {
    AtomicMarkedPtr::new(MarkedPtr::new(Box::into_raw(Box::new(0u64))))
}

fn only_pin(c: &mut Criterion) {
    CONFIG.init_once(Config::with_update_threshold(128));
    let slot = pinned_slot();

    c.bench_function("only_pin", |b| {
        b.iter(|| {
            let guard = acquire_guard(&slot, Acquire);
            mem::forget(guard);
        })
    });
}

fn single_pin(c: &mut Criterion) {
    CONFIG.init_once(Config::with_update_threshold(128));
    let slot = pinned_slot();

    c.bench_function("single_pin", |b| b.iter(|| acquire_guard(&slot, Acquire)));
}

fn multi_pin(c: &mut Criterion) {
    CONFIG.init_once(Config::with_update_threshold(128));

    const THREADS: usize = 16;
    const STEPS: usize = 100_000;

    let slot = pinned_slot();

    c.bench_function("multi_pin", |b| {
        b.iter(|| {
            scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|_| {
                        for _ in 0..STEPS {
                            let _guard = acquire_guard(&slot, Acquire);
                        }
                    });
                }
            })
            .unwrap();
        })
    });
}

criterion_group!(benches, only_pin, single_pin, multi_pin);
criterion_main!(benches);
