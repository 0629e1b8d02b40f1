use sheetbind::{ColumnMeta, IndexBinding, RecordType, Resolver};
use std::sync::{Arc, Barrier};
use std::thread;

struct Invoice {
    number: String,
    total: f64,
}

fn invoice_type() -> Arc<RecordType> {
    RecordType::builder::<Invoice>("Invoice")
        .column("number", ColumnMeta::new().index(0).title("No."), |i: &Invoice| &i.number)
        .column("total", ColumnMeta::new().index(1).title("Total"), |i: &Invoice| &i.total)
        .build()
        .unwrap()
}

#[test]
fn racing_threads_converge_on_one_binding() {
    const THREADS: usize = 8;
    let resolver = Arc::new(Resolver::new());
    let invoice = invoice_type();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let invoice = Arc::clone(&invoice);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                resolver.index_binding(&invoice).unwrap()
            })
        })
        .collect();

    let bindings: Vec<Arc<IndexBinding>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    for binding in &bindings {
        assert_eq!(binding.indices().collect::<Vec<_>>(), [0, 1]);
        assert_eq!(binding.get(1).unwrap().name(), "total");
    }

    let settled = resolver.index_binding(&invoice).unwrap();
    assert_eq!(resolver.cache().index().len(), 1);
    assert!(bindings.iter().any(|b| Arc::ptr_eq(b, &settled)));
}

#[test]
fn short_lived_types_do_not_accumulate() {
    let resolver = Resolver::new();
    for _ in 0..64 {
        let invoice = invoice_type();
        resolver.index_binding(&invoice).unwrap();
        resolver.title_binding(&invoice).unwrap();
    }
    // Each insert purges the entries of types dropped before it.
    assert!(resolver.cache().index().len() <= 1);
    assert!(resolver.cache().titles().len() <= 1);
    resolver.cache().purge();
    assert!(resolver.cache().index().is_empty());
    assert!(resolver.cache().titles().is_empty());
}
