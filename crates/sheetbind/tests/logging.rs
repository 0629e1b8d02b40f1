use sheetbind::{ColumnMeta, ConfigError, RecordType, Resolver};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

struct Clash {
    a: i32,
    b: i32,
}

#[test]
fn resolution_logs_without_changing_results() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sheetbind=trace")
        .with_test_writer()
        .try_init();

    let clash = RecordType::builder::<Clash>("Clash")
        .column("a", ColumnMeta::new().index(3).title("A"), |c: &Clash| &c.a)
        .column("b", ColumnMeta::new().index(3).title("B"), |c: &Clash| &c.b)
        .build()
        .unwrap();

    let resolver = Resolver::new();
    assert!(matches!(
        resolver.index_binding(&clash),
        Err(ConfigError::DuplicateIndex { index: 3, .. })
    ));
    assert_eq!(resolver.title_binding(&clash).unwrap().len(), 2);
    assert_eq!(resolver.title_binding(&clash).unwrap().len(), 2);

    drop(clash);
    assert_eq!(resolver.cache().purge(), 1);
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

struct Labeled {
    a: i32,
    b: i32,
}

fn labeled() -> Arc<RecordType> {
    RecordType::builder::<Labeled>("Labeled")
        .column("a", ColumnMeta::new().index(0).title("A"), |l: &Labeled| &l.a)
        .column("b", ColumnMeta::new().index(1), |l: &Labeled| &l.b)
        .build()
        .unwrap()
}

#[test]
fn skips_and_insert_purges_are_logged() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("sheetbind=trace")
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let resolver = Resolver::new();
        let first = labeled();
        assert_eq!(resolver.title_binding(&first).unwrap().len(), 1);
        drop(first);

        // Resolving a second type purges the first type's entry on insert.
        let second = labeled();
        resolver.title_binding(&second).unwrap();
        assert_eq!(resolver.cache().titles().len(), 1);
    });

    let log = captured.text();
    assert!(log.contains("empty title; not bound"), "{log}");
    assert!(log.contains("purged stale binding cache entries"), "{log}");
    assert!(log.contains("removed=1"), "{log}");
}
