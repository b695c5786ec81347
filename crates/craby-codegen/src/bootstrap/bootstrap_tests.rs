use craby_core::PlatformFamily;

use super::{
    DiscoveryEvent, DiscoveryHook, DiscoveryRegistry, Step, pipeline, prepare_module_name,
    prepared_module,
};

const MODULES: [&str; 2] = ["Calculator", "Storage"];
const FILES_DIR: &str = "/data/user/0/com.example/files";

#[derive(Debug, Clone, Copy)]
enum Op {
    Resolve(&'static str),
    RawLookup(&'static str),
    Prepare(&'static str),
}

fn all_ops() -> Vec<Op> {
    MODULES
        .iter()
        .flat_map(|&m| [Op::Resolve(m), Op::RawLookup(m), Op::Prepare(m)])
        .collect()
}

/// Every sequence of `len` operations.
fn sequences(len: usize) -> Vec<Vec<Op>> {
    let ops = all_ops();
    let mut out = vec![Vec::new()];
    for _ in 0..len {
        out = out
            .into_iter()
            .flat_map(|seq| {
                ops.iter().map(move |op| {
                    let mut next = seq.clone();
                    next.push(*op);
                    next
                })
            })
            .collect();
    }
    out
}

fn run(registry: &mut DiscoveryRegistry, op: Op) {
    match op {
        Op::Resolve(m) => {
            let handle = registry.resolve(m).expect("resolve always succeeds");
            assert_eq!(handle.name, m);
            assert_eq!(handle.data_path, FILES_DIR);
        }
        Op::RawLookup(m) => {
            registry.lookup(m);
        }
        Op::Prepare(m) => {
            assert!(registry.lookup(&prepare_module_name(m)).is_none());
        }
    }
}

/// The first successful resolve of a module follows exactly one capturing prepare.
fn assert_prepared_before_first_resolve(events: &[DiscoveryEvent], module: &str) {
    let first_ok = events.iter().position(|e| {
        matches!(e, DiscoveryEvent::Resolve { module: m, ok: true } if m == module)
    });
    let captures: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            matches!(e, DiscoveryEvent::Prepare { module: m, captured: true } if m == module)
        })
        .map(|(i, _)| i)
        .collect();

    assert!(captures.len() <= 1, "{module} captured twice: {events:?}");
    if let Some(first_ok) = first_ok {
        assert_eq!(captures.len(), 1, "{module} resolved unprepared: {events:?}");
        assert!(captures[0] < first_ok, "{module} prepared too late: {events:?}");
    }
}

#[test]
fn prepare_names() {
    assert_eq!(
        prepare_module_name("Calculator"),
        "__crabyCalculator_JNI_prepare__"
    );
    assert_eq!(
        prepared_module("__crabyCalculator_JNI_prepare__"),
        Some("Calculator")
    );
    assert_eq!(prepared_module("Calculator"), None);
    assert_eq!(prepared_module("__craby_JNI_prepare__"), None);
}

#[test]
fn first_resolve_runs_the_handshake() {
    let mut registry = DiscoveryRegistry::new(PlatformFamily::Android, &MODULES, FILES_DIR);

    let handle = registry.resolve("Calculator").unwrap();

    assert_eq!(handle.data_path, FILES_DIR);
    assert_eq!(
        registry.events(),
        [
            DiscoveryEvent::Prepare {
                module: "Calculator".into(),
                captured: true
            },
            DiscoveryEvent::Resolve {
                module: "Calculator".into(),
                ok: true
            },
        ]
    );
}

#[test]
fn raw_lookup_before_prepare_fails() {
    let mut registry = DiscoveryRegistry::new(PlatformFamily::Android, &MODULES, FILES_DIR);

    assert!(registry.lookup("Storage").is_none());
    assert!(registry.lookup(&prepare_module_name("Storage")).is_none());
    assert!(registry.lookup("Storage").is_some());
}

#[test]
fn repeated_prepare_is_idempotent() {
    let mut registry = DiscoveryRegistry::new(PlatformFamily::Android, &MODULES, FILES_DIR);
    let name = prepare_module_name("Storage");

    registry.lookup(&name);
    registry.lookup(&name);
    registry.resolve("Storage").unwrap();

    let captured: Vec<bool> = registry
        .events()
        .iter()
        .filter_map(|e| match e {
            DiscoveryEvent::Prepare { captured, .. } => Some(*captured),
            _ => None,
        })
        .collect();
    assert_eq!(captured, [true, false]);
    assert!(registry.is_prepared("Storage"));
    assert!(!registry.is_prepared("Calculator"));
}

#[test]
fn unknown_prepare_name_is_not_captured() {
    let mut registry = DiscoveryRegistry::new(PlatformFamily::Android, &MODULES, FILES_DIR);

    assert!(registry.lookup(&prepare_module_name("Missing")).is_none());
    assert!(registry.events().is_empty());
    assert!(registry.resolve("Missing").is_none());
}

#[test]
fn ios_needs_no_handshake() {
    let mut registry = DiscoveryRegistry::new(PlatformFamily::Ios, &MODULES, FILES_DIR);

    assert!(registry.lookup("Calculator").is_some());
    assert!(registry.resolve("Storage").is_some());
    assert!(
        registry
            .events()
            .iter()
            .all(|e| matches!(e, DiscoveryEvent::Resolve { ok: true, .. }))
    );
}

#[test]
fn pipelines_are_cached_per_key() {
    let android = pipeline(PlatformFamily::Android, DiscoveryHook::PackageGetModule);
    let again = pipeline(PlatformFamily::Android, DiscoveryHook::PackageGetModule);
    let ios = pipeline(PlatformFamily::Ios, DiscoveryHook::GlobalModuleMap);

    assert!(std::sync::Arc::ptr_eq(&android, &again));
    assert_eq!(
        android.steps,
        [Step::CaptureEnvironment, Step::ResolveModule]
    );
    assert_eq!(ios.steps, [Step::ResolveModule]);
    assert_eq!(
        DiscoveryHook::for_family(PlatformFamily::Android),
        DiscoveryHook::PackageGetModule
    );
}

#[test]
fn handshake_precedes_first_resolve_in_any_order() {
    for seq in sequences(4) {
        let mut registry = DiscoveryRegistry::new(PlatformFamily::Android, &MODULES, FILES_DIR);
        for op in &seq {
            run(&mut registry, *op);
        }
        for module in MODULES {
            assert_prepared_before_first_resolve(registry.events(), module);
        }
    }
}
