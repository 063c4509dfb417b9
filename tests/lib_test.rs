//! Library integration tests.

use dephandler::deps::{MockImporter, Namespace};
use dephandler::pip::PackageManager;
use dephandler::printer::RecordingPrinter;
use dephandler::shell::MockRunner;
use dephandler::{init, Context, DephandError, Worker};
use std::sync::{Arc, Mutex};

#[test]
fn error_types_are_public() {
    let err = DephandError::UnknownDependency {
        name: "test".into(),
    };
    assert!(err.to_string().contains("test"));
    assert!(!err.is_fatal());
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> dephandler::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn init_fills_the_host_namespace() {
    let importer = MockImporter::new();
    importer.install("numpy", "1.26.4");
    let namespace = Namespace::new();
    let mut ctx = Context::new(
        PackageManager::new("python3"),
        Box::new(importer),
        Box::new(MockRunner::new()),
    );

    let all = init(
        &mut ctx,
        ["numpy"],
        Some(namespace.clone()),
        vec![Box::new(RecordingPrinter::new("recording"))],
        false,
    )
    .unwrap();

    assert!(all);
    assert_eq!(namespace.names(), vec!["numpy"]);
    assert_eq!(namespace.get("numpy").unwrap().version.as_deref(), Some("1.26.4"));
}

#[test]
fn flags_are_shared_with_other_threads() {
    let ctx = Context::new(
        PackageManager::new("python3"),
        Box::new(MockImporter::new()),
        Box::new(MockRunner::new()),
    );
    let flags = ctx.flags();
    let ctx = Arc::new(Mutex::new(ctx));
    ctx.lock().unwrap().declare("alpha").unwrap();

    assert!(!flags.dependencies_imported());
    assert!(!flags.restart_needed());
    assert!(!Worker::new().doing_something());
}
