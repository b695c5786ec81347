use indoc::indoc;

use super::{FileOwnership, GENERATED_MARKER, GeneratedFile, RustEmitter, generate};
use crate::test_utils::{CALCULATOR, STORAGE, context};

fn find<'a>(files: &'a [GeneratedFile], suffix: &str) -> &'a GeneratedFile {
    files
        .iter()
        .find(|f| f.path.ends_with(suffix))
        .unwrap_or_else(|| panic!("no file ending in {suffix}"))
}

/// Content below the two header lines and the blank line after them.
fn body(file: &GeneratedFile) -> &str {
    file.content.splitn(4, '\n').nth(3).unwrap()
}

#[test]
fn spec_trait_signatures() {
    let files = RustEmitter::new(&context("/app", &[CALCULATOR])).emit();
    let spec = find(&files, "generated/calculator_spec.rs");

    insta::assert_snapshot!(body(spec), @r"
    use crate::types::*;

    pub trait CalculatorSpec {
        fn new(ctx: Context) -> Self;
        fn id(&self) -> usize;

        fn add(&self, a: Number, b: Number) -> Number;
        fn get_user_name(&self, user_id: Number) -> String;
        fn calculate_prime(&self, n: Number) -> Promise<Number>;
    }
    ");
}

#[test]
fn generated_files_carry_the_header() {
    let files = RustEmitter::new(&context("/app", &[CALCULATOR])).emit();
    let spec = find(&files, "generated/calculator_spec.rs");

    assert!(spec.content.starts_with(&format!("// {GENERATED_MARKER}\n// Hash: ")));
    assert_eq!(spec.ownership, FileOwnership::Generated);
}

#[test]
fn impl_stub_is_developer_owned() {
    let files = RustEmitter::new(&context("/app", &[CALCULATOR])).emit();
    let stub = find(&files, "crates/lib/src/calculator_impl.rs");

    assert_eq!(stub.ownership, FileOwnership::DeveloperOwned);
    insta::assert_snapshot!(stub.content, @r"
    use crate::generated::*;
    use crate::types::*;

    pub struct Calculator {
        ctx: Context,
    }

    impl CalculatorSpec for Calculator {
        fn new(ctx: Context) -> Self {
            Calculator { ctx }
        }

        fn id(&self) -> usize {
            self.ctx.id
        }

        fn add(&self, a: Number, b: Number) -> Number {
            unimplemented!();
        }

        fn get_user_name(&self, user_id: Number) -> String {
            unimplemented!();
        }

        fn calculate_prime(&self, n: Number) -> Promise<Number> {
            unimplemented!();
        }
    }
    ");
}

#[test]
fn signal_enum_and_emit() {
    let files = RustEmitter::new(&context("/app", &[STORAGE])).emit();
    let spec = body(find(&files, "generated/storage_spec.rs"));

    assert!(spec.starts_with("use crate::generated::storage_types::*;\nuse crate::types::*;\n"));
    assert!(spec.contains(indoc! {"
        pub enum StorageSignal {
            OnChange,
        }
    "}));
    assert!(spec.contains("StorageSignal::OnChange => \"onChange\","));
    assert!(spec.contains("crate::generated::storage_bridge::emit_signal(self.id(), name);"));
    assert!(spec.contains("fn get(&self, key: String) -> Nullable<Entry>;"));
    assert!(spec.contains("fn list(&self, prefix: Nullable<String>) -> Promise<Array<Entry>>;"));
    assert!(spec.contains("fn clear(&self) -> Promise<()>;"));
    assert!(!spec.contains("fn on_change"));
}

#[test]
fn records_and_enums() {
    let files = RustEmitter::new(&context("/app", &[STORAGE])).emit();
    let types = body(find(&files, "generated/storage_types.rs"));

    assert!(types.contains(indoc! {"
        #[derive(Debug, Clone, PartialEq)]
        pub struct Entry {
            pub key: String,
            pub size: Number,
            pub tags: Array<String>,
            pub meta: Nullable<Meta>,
        }
    "}));
    assert!(types.contains("pub fn value(self) -> &'static str {"));
    assert!(types.contains("Mode::Write => \"write\","));
    assert!(types.contains("pub fn value(self) -> i64 {"));
    assert!(types.contains("Priority::High => 10,"));

    let calculator = RustEmitter::new(&context("/app", &[CALCULATOR])).emit();
    let types = body(find(&calculator, "generated/calculator_types.rs"));
    assert_eq!(types, "// `Calculator` declares no records or enums.\n");
}

#[test]
fn crate_entry_points() {
    let files = RustEmitter::new(&context("/app", &[CALCULATOR, STORAGE])).emit();

    insta::assert_snapshot!(body(find(&files, "generated/mod.rs")), @r"
    pub mod calculator_bridge;
    pub mod calculator_spec;
    pub mod calculator_types;
    pub mod storage_bridge;
    pub mod storage_spec;
    pub mod storage_types;

    pub use calculator_spec::*;
    pub use storage_spec::*;
    pub use storage_types::*;
    ");
    insta::assert_snapshot!(body(find(&files, "crates/lib/src/lib.rs")), @r"
    #[rustfmt::skip]
    pub(crate) mod generated;
    pub(crate) mod types;

    pub(crate) mod calculator_impl;
    pub(crate) mod storage_impl;
    ");
    assert!(body(find(&files, "crates/lib/src/types.rs")).contains("pub type Promise<T>"));
}

#[test]
fn output_is_deterministic() {
    let first = generate(&context("/app", &[CALCULATOR, STORAGE]));
    let second = generate(&context("/app", &[CALCULATOR, STORAGE]));

    assert_eq!(first, second);
}

#[test]
fn hash_follows_the_module() {
    let calculator = context("/app", &[CALCULATOR]);
    let storage = context("/app", &[STORAGE]);

    assert_eq!(calculator.units[0].hash(), context("/a", &[CALCULATOR]).units[0].hash());
    assert_ne!(calculator.units[0].hash(), storage.units[0].hash());
    assert!(calculator.header("#", 0xab).starts_with("# @generated"));
    assert!(calculator.header("#", 0xab).ends_with("# Hash: 000000ab\n"));
}
