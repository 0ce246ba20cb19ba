use std::sync::atomic::Ordering::Relaxed;

use criterion::{criterion_group, criterion_main, Criterion};

use ebr::{
    AtomicMarkedPtr, BoxDeleter, Config, DefaultAccess, Guard, Header, MarkedPtr, Retirable,
    CONFIG,
};

struct Node {
    header: Header<Node>,
}

unsafe impl Retirable for Node {
    type Deleter = BoxDeleter;

    fn header(&self) -> &Header<Node> {
        &self.header
    }
}

fn node() -> MarkedPtr<Node, 0> {
    MarkedPtr::new(Box::into_raw(Box::new(Node { header: Header::new() })))
}

fn retire(c: &mut Criterion) {
    CONFIG.init_once(Config::with_update_threshold(128));

    let slot = AtomicMarkedPtr::new(node());

    c.bench_function("retire", |b| {
        b.iter(|| {
            let unlinked = slot.swap(node(), Relaxed);
            let mut guard = Guard::protecting(unlinked, DefaultAccess);
            unsafe { guard.reclaim() };
        })
    });
}

criterion_group!(benches, retire);
criterion_main!(benches);
