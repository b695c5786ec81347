use rowan::{TextRange, TextSize};

use super::check_record_cycles;
use crate::diagnostics::Diagnostics;
use crate::ir::{FieldDecl, Primitive, RecordType, TypeRef};

fn record(name: &str, at: u32, fields: &[(&str, TypeRef)]) -> RecordType {
    RecordType {
        name: name.to_string(),
        fields: fields
            .iter()
            .map(|(n, ty)| FieldDecl {
                name: n.to_string(),
                ty: ty.clone(),
                span: TextRange::empty(TextSize::from(at)),
            })
            .collect(),
        span: TextRange::at(TextSize::from(at), TextSize::from(1)),
    }
}

fn named(name: &str) -> TypeRef {
    TypeRef::Record(name.to_string())
}

fn run(records: &[RecordType]) -> Diagnostics {
    let mut diag = Diagnostics::new();
    check_record_cycles(records, &mut diag);
    diag
}

#[test]
fn acyclic_graph() {
    let records = [
        record("A", 0, &[("b", named("B")), ("c", named("C"))]),
        record("B", 10, &[("c", named("C"))]),
        record("C", 20, &[("n", TypeRef::Primitive(Primitive::Number))]),
    ];
    assert!(run(&records).is_empty());
}

#[test]
fn self_reference_through_array() {
    let records = [record(
        "Tree",
        0,
        &[("children", TypeRef::Array(Box::new(named("Tree"))))],
    )];
    insta::assert_snapshot!(run(&records), @"error at 0..1: record types form a cycle: `Tree` -> `Tree` (hint: records are passed by value and cannot contain themselves)");
}

#[test]
fn each_cycle_reported_once() {
    let records = [
        record("A", 0, &[("b", named("B"))]),
        record("B", 10, &[("a", TypeRef::Nullable(Box::new(named("A"))))]),
        record("C", 20, &[("a", named("A"))]),
    ];
    insta::assert_snapshot!(run(&records), @"error at 0..1: record types form a cycle: `A` -> `B` -> `A` (hint: records are passed by value and cannot contain themselves)");
}

#[test]
fn enum_references_end_the_walk() {
    let records = [record("A", 0, &[("e", TypeRef::Enum("Color".into()))])];
    assert!(run(&records).is_empty());
}
