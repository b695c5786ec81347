use std::fs;

use craby_core::ProjectLayout;

use super::{GeneratedFile, WriteOutcome, WritePolicy, write_files};

fn setup() -> (tempfile::TempDir, ProjectLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(dir.path());
    (dir, layout)
}

#[test]
fn writes_missing_files_with_parents() {
    let (_dir, layout) = setup();
    let path = layout.generated_dir().join("calculator_spec.rs");
    let files = [GeneratedFile::generated(path.clone(), "trait\n".to_string())];

    let report = write_files(&layout, &files, WritePolicy::Overwrite).unwrap();

    assert_eq!(report.entries, [(path.clone(), WriteOutcome::Written)]);
    assert_eq!(fs::read_to_string(path).unwrap(), "trait\n");
}

#[test]
fn identical_content_is_unchanged() {
    let (_dir, layout) = setup();
    let path = layout.cpp_dir().join("CrabyUtils.hpp");
    let files = [GeneratedFile::generated(path, "// utils\n".to_string())];

    write_files(&layout, &files, WritePolicy::Overwrite).unwrap();
    let report = write_files(&layout, &files, WritePolicy::NoOverwrite).unwrap();

    assert_eq!(report.unchanged(), 1);
    assert_eq!(report.written(), 0);
}

#[test]
fn overwrite_replaces_generated_files() {
    let (_dir, layout) = setup();
    let path = layout.cpp_dir().join("CxxCalculatorModule.cpp");
    fs::create_dir_all(layout.cpp_dir()).unwrap();
    fs::write(&path, "old").unwrap();

    let files = [GeneratedFile::generated(path.clone(), "new".to_string())];
    let report = write_files(&layout, &files, WritePolicy::Overwrite).unwrap();

    assert_eq!(report.written(), 1);
    assert_eq!(fs::read_to_string(path).unwrap(), "new");
}

#[test]
fn no_overwrite_stashes_new_content() {
    let (dir, layout) = setup();
    let path = layout.cpp_dir().join("CxxCalculatorModule.cpp");
    fs::create_dir_all(layout.cpp_dir()).unwrap();
    fs::write(&path, "edited").unwrap();

    let files = [GeneratedFile::generated(path.clone(), "new".to_string())];
    let report = write_files(&layout, &files, WritePolicy::NoOverwrite).unwrap();

    let stash = dir.path().join(".craby/stash/cpp/CxxCalculatorModule.cpp");
    assert_eq!(report.entries, [(path.clone(), WriteOutcome::Stashed(stash.clone()))]);
    assert_eq!(report.kept(), 1);
    assert_eq!(fs::read_to_string(path).unwrap(), "edited");
    assert_eq!(fs::read_to_string(stash).unwrap(), "new");
}

#[test]
fn developer_files_are_never_replaced() {
    let (_dir, layout) = setup();
    let path = layout.rust_src_dir().join("calculator_impl.rs");
    let stub = GeneratedFile::developer_owned(path.clone(), "stub".to_string());

    write_files(&layout, std::slice::from_ref(&stub), WritePolicy::Overwrite).unwrap();
    fs::write(&path, "fn add() {}").unwrap();
    let report = write_files(&layout, &[stub], WritePolicy::Overwrite).unwrap();

    assert_eq!(report.entries, [(path.clone(), WriteOutcome::Kept)]);
    assert_eq!(fs::read_to_string(path).unwrap(), "fn add() {}");
}
