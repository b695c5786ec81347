use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use craby_core::{PlatformFamily, ProjectLayout};

use crate::error::{BuildError, CompilationError};
use crate::orchestrator::{BuildPlan, compile_family};
use crate::targets::Target;
use crate::toolchain::{CANCELLED, Toolchain};

/// Writes a fake library per triple, or fails the triples it is told to.
struct FakeToolchain {
    out: PathBuf,
    failing: Vec<&'static str>,
    /// Successful triples block until the cancel flag is raised.
    wait_for_cancel: bool,
    /// Report a library path without writing it.
    skip_output: bool,
    cancelled: AtomicUsize,
}

impl FakeToolchain {
    fn new(out: PathBuf) -> Self {
        Self {
            out,
            failing: Vec::new(),
            wait_for_cancel: false,
            skip_output: false,
            cancelled: AtomicUsize::new(0),
        }
    }

    fn failing(mut self, triple: &'static str) -> Self {
        self.failing.push(triple);
        self
    }
}

impl Toolchain for FakeToolchain {
    fn compile(&self, target: &Target, cancel: &AtomicBool) -> Result<PathBuf, CompilationError> {
        if self.failing.contains(&target.triple) {
            return Err(CompilationError {
                triple: target.triple.to_string(),
                output: "error[E0425]: cannot find value `x` in this scope".to_string(),
            });
        }

        if self.wait_for_cancel {
            let deadline = Instant::now() + Duration::from_secs(10);
            while Instant::now() < deadline {
                if cancel.load(Ordering::SeqCst) {
                    self.cancelled.fetch_add(1, Ordering::SeqCst);
                    return Err(CompilationError {
                        triple: target.triple.to_string(),
                        output: CANCELLED.to_string(),
                    });
                }
                thread::sleep(Duration::from_millis(5));
            }
        }

        let path = self.out.join(target.triple).join("libmy_module.a");
        if !self.skip_output {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, target.triple).unwrap();
        }
        Ok(path)
    }
}

/// Lay out what cxx and the developer crate leave behind for `triple`.
fn write_bridge(layout: &ProjectLayout, triple: &str) {
    let cxx = layout.cxx_bridge_dir(triple);
    let generated = cxx.join("my_module/src/generated");
    fs::create_dir_all(&generated).unwrap();
    fs::create_dir_all(cxx.join("rust")).unwrap();
    fs::write(generated.join("calculator_bridge.rs.cc"), triple).unwrap();
    fs::write(generated.join("calculator_bridge.rs.h"), triple).unwrap();
    fs::write(generated.join("calculator_bridge.rs"), "").unwrap();
    fs::write(cxx.join("rust/cxx.h"), "").unwrap();

    let include = layout.crate_include_dir();
    fs::create_dir_all(&include).unwrap();
    fs::write(include.join("CrabySignals.h"), "").unwrap();
    fs::write(include.join("stray.cc"), "").unwrap();
}

fn setup() -> (tempfile::TempDir, ProjectLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(dir.path().join("app"));
    (dir, layout)
}

#[test]
fn compiles_every_triple_in_order() {
    let (dir, _layout) = setup();
    let toolchain = FakeToolchain::new(dir.path().join("out"));

    let artifacts = compile_family(&toolchain, PlatformFamily::Android).unwrap();
    let triples: Vec<_> = artifacts.iter().map(|a| a.target.triple).collect();

    assert_eq!(
        triples,
        [
            "aarch64-linux-android",
            "armv7-linux-androideabi",
            "x86_64-linux-android",
            "i686-linux-android",
        ]
    );
}

#[test]
fn first_failure_cancels_the_rest() {
    let (dir, _layout) = setup();
    let mut toolchain = FakeToolchain::new(dir.path().join("out")).failing("x86_64-linux-android");
    toolchain.wait_for_cancel = true;

    let err = compile_family(&toolchain, PlatformFamily::Android).unwrap_err();

    assert_eq!(err.triple, "x86_64-linux-android");
    assert!(err.output.contains("E0425"));
    assert_eq!(toolchain.cancelled.load(Ordering::SeqCst), 3);
}

#[test]
fn builds_both_families() {
    let (dir, layout) = setup();
    let toolchain = FakeToolchain::new(dir.path().join("out"));
    let plan = BuildPlan::new(
        layout.clone(),
        "my-module",
        &[PlatformFamily::Ios, PlatformFamily::Android, PlatformFamily::Ios],
    );

    assert_eq!(plan.families(), [PlatformFamily::Android, PlatformFamily::Ios]);
    let outcomes = plan.run(&toolchain);

    let android = outcomes[0].result.as_ref().unwrap();
    assert_eq!(android.path, layout.android_libs_dir());
    assert!(layout.android_libs_dir().join("x86/libmy_module-prebuilt.a").is_file());
    assert!(layout.android_libs_dir().join("manifest.json").is_file());

    let ios = outcomes[1].result.as_ref().unwrap();
    assert_eq!(ios.path, layout.xcframework_dir("my_module"));
    assert_eq!(ios.slots, ["ios-arm64", "ios-arm64-simulator"]);
    assert!(ios.path.join("ios-arm64-simulator/libmy_module.a").is_file());
    assert!(ios.manifest.ends_with("Info.plist"));
}

#[test]
fn failed_family_produces_no_bundle() {
    let (dir, layout) = setup();
    let toolchain = FakeToolchain::new(dir.path().join("out")).failing("armv7-linux-androideabi");
    let plan = BuildPlan::new(layout.clone(), "my-module", &PlatformFamily::ALL);

    let outcomes = plan.run(&toolchain);

    match &outcomes[0].result {
        Err(BuildError::Compilation(err)) => assert_eq!(err.triple, "armv7-linux-androideabi"),
        other => panic!("expected a compilation error, got {other:?}"),
    }
    assert!(!layout.android_libs_dir().exists());
    assert!(outcomes[1].result.is_ok());
}

#[test]
fn failed_build_keeps_the_previous_bundle() {
    let (dir, layout) = setup();
    let ok = FakeToolchain::new(dir.path().join("out"));
    let plan = BuildPlan::new(layout.clone(), "my-module", &[PlatformFamily::Android]);
    assert!(plan.run(&ok)[0].result.is_ok());

    let failing = FakeToolchain::new(dir.path().join("out")).failing("i686-linux-android");
    assert!(plan.run(&failing)[0].result.is_err());

    assert!(layout.android_libs_dir().join("manifest.json").is_file());
}

#[test]
fn missing_output_is_a_packaging_error() {
    let (dir, layout) = setup();
    let mut toolchain = FakeToolchain::new(dir.path().join("out"));
    toolchain.skip_output = true;
    let plan = BuildPlan::new(layout.clone(), "my-module", &[PlatformFamily::Ios]);

    let outcomes = plan.run(&toolchain);

    assert!(matches!(outcomes[0].result, Err(BuildError::Packaging(_))));
    assert!(!layout.ios_framework_dir().exists());
}

#[test]
fn stages_cxx_bridge_files() {
    let (dir, layout) = setup();
    for triple in ["aarch64-linux-android", "aarch64-apple-ios", "aarch64-apple-ios-sim"] {
        write_bridge(&layout, triple);
    }
    let toolchain = FakeToolchain::new(dir.path().join("out"));
    let plan = BuildPlan::new(layout.clone(), "my-module", &PlatformFamily::ALL);

    let outcomes = plan.run(&toolchain);
    assert!(outcomes.iter().all(|o| o.result.is_ok()));

    let src = layout.android_bridge_src_dir();
    assert_eq!(
        fs::read_to_string(src.join("calculator_bridge.rs.cc")).unwrap(),
        "aarch64-linux-android"
    );
    assert_eq!(fs::read_dir(&src).unwrap().count(), 1);
    let include = layout.android_include_dir();
    for header in ["calculator_bridge.rs.h", "cxx.h", "CrabySignals.h"] {
        assert!(include.join(header).is_file(), "missing {header}");
    }
    assert_eq!(fs::read_dir(&include).unwrap().count(), 3);
    assert!(!layout.tmp_dir().join("staging/android-bridge").exists());

    let xcframework = layout.xcframework_dir("my_module");
    let headers = xcframework.join("ios-arm64-simulator/Headers");
    assert_eq!(
        fs::read_to_string(headers.join("calculator_bridge.rs.h")).unwrap(),
        "aarch64-apple-ios-sim"
    );
    assert!(headers.join("cxx.h").is_file());
    assert!(!headers.join("calculator_bridge.rs.cc").exists());
    assert!(xcframework.join("ios-arm64/Headers/CrabySignals.h").is_file());
}

#[test]
fn rebuild_replaces_stale_bridge_files() {
    let (dir, layout) = setup();
    write_bridge(&layout, "aarch64-linux-android");
    let toolchain = FakeToolchain::new(dir.path().join("out"));
    let plan = BuildPlan::new(layout.clone(), "my-module", &[PlatformFamily::Android]);
    assert!(plan.run(&toolchain)[0].result.is_ok());

    let cxx = layout.cxx_bridge_dir("aarch64-linux-android");
    fs::remove_file(cxx.join("my_module/src/generated/calculator_bridge.rs.cc")).unwrap();
    assert!(plan.run(&toolchain)[0].result.is_ok());

    assert!(!layout.android_bridge_src_dir().join("calculator_bridge.rs.cc").exists());
    assert!(layout.android_include_dir().join("cxx.h").is_file());
}
