use indoc::indoc;

use super::{MethodKind, Position, TargetType, TypeMapper};
use crate::ir::{Primitive, TypeRef};
use crate::test_utils::{CALCULATOR, STORAGE, mapped, spec, unsupported};

fn boxed(ty: TargetType) -> Box<TargetType> {
    Box::new(ty)
}

#[test]
fn calculator_methods() {
    let module = mapped(CALCULATOR);

    let rets: Vec<_> = module.methods.iter().map(|m| m.ret.clone()).collect();
    assert_eq!(
        rets,
        [
            TargetType::Number,
            TargetType::String,
            TargetType::Promise(boxed(TargetType::Number)),
        ]
    );
    assert!(module.methods[2].is_async);
    assert_eq!(module.methods[1].params[0].ty, TargetType::Number);
}

#[test]
fn storage_types() {
    let module = mapped(STORAGE);

    let entry = module.record("Entry").unwrap();
    let fields: Vec<_> = entry.fields.iter().map(|f| f.ty.clone()).collect();
    assert_eq!(
        fields,
        [
            TargetType::String,
            TargetType::Number,
            TargetType::Array(boxed(TargetType::String)),
            TargetType::Nullable(boxed(TargetType::Record("Meta".into()))),
        ]
    );

    let list = &module.methods[1];
    assert_eq!(
        list.params[0].ty,
        TargetType::Nullable(boxed(TargetType::String))
    );
    assert_eq!(
        list.ret,
        TargetType::Promise(boxed(TargetType::Array(boxed(TargetType::Record(
            "Entry".into()
        )))))
    );

    let clear = &module.methods[2];
    assert_eq!(clear.ret, TargetType::Promise(boxed(TargetType::Void)));

    let kinds: Vec<_> = module.methods.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        [
            MethodKind::Call,
            MethodKind::Call,
            MethodKind::Call,
            MethodKind::Call,
            MethodKind::Signal,
        ]
    );
    assert_eq!(module.signal_methods().count(), 1);
    assert_eq!(module.enums.len(), 2);
}

#[test]
fn mapping_is_stable() {
    let spec = spec(STORAGE);
    let mapper = TypeMapper::new(&spec);
    let ty = &spec.methods[1].ret;
    assert_eq!(
        mapper.map(ty, Position::Return),
        mapper.map(ty, Position::Return)
    );
}

#[test]
fn position_rules() {
    let spec = spec(CALCULATOR);
    let mapper = TypeMapper::new(&spec);
    let void = TypeRef::Primitive(Primitive::Void);
    let deferred = TypeRef::Deferred(Box::new(TypeRef::Primitive(Primitive::Number)));

    assert_eq!(mapper.map(&void, Position::Return), Ok(TargetType::Void));
    assert!(mapper.map(&void, Position::Param).is_err());
    assert!(mapper.map(&deferred, Position::Field).is_err());
    assert!(mapper.map(&TypeRef::Reactive, Position::Return).is_err());
    assert_eq!(
        mapper.map(&TypeRef::Reactive, Position::Param),
        Ok(TargetType::Signal)
    );

    let nested = TypeRef::Array(Box::new(deferred));
    let rejection = mapper.map(&nested, Position::Return).unwrap_err();
    assert_eq!(rejection.origin, "Promise<number>");
}

#[test]
fn union_field_is_unsupported() {
    let err = unsupported(indoc! {"
        interface Item { value: string | number; }
        interface Spec { get(): Item; }
        export default TurboModuleRegistry.get<Spec>('Items');
    "});

    insta::assert_snapshot!(err, @"unsupported type `string | number` in field `value` of `Item`: union types are not supported, only `T | null`");
}

#[test]
fn promise_parameter_is_unsupported() {
    let err = unsupported(indoc! {"
        interface Spec { wait(p: Promise<number>): void; }
        export default TurboModuleRegistry.get<Spec>('Waiter');
    "});

    insta::assert_snapshot!(err, @"unsupported type `Promise<number>` in parameter `p` of `wait`: `Promise` is only valid as a method return type");
}

#[test]
fn tuple_and_function_are_unsupported() {
    let err = unsupported(indoc! {"
        interface Spec { pair(): [number, string]; }
        export default TurboModuleRegistry.get<Spec>('Pairs');
    "});
    assert_eq!(err.origin, "[number, string]");
    assert_eq!(err.context, "return type of `pair`");

    let err = unsupported(indoc! {"
        interface Spec { run(cb: (x: number) => void): void; }
        export default TurboModuleRegistry.get<Spec>('Runner');
    "});
    assert_eq!(err.reason, "function types are not supported, use `Signal` for callbacks");
}

#[test]
fn other_generics_are_unsupported() {
    let err = unsupported(indoc! {"
        interface Spec { map(): Map<string, number>; }
        export default TurboModuleRegistry.get<Spec>('Maps');
    "});
    assert_eq!(
        err.reason,
        "generic type `Map` is not supported, only `Promise<T>` and `Array<T>`"
    );
}

#[test]
fn signal_method_rules() {
    let err = unsupported(indoc! {"
        interface Spec { subscribe(s: Signal): number; }
        export default TurboModuleRegistry.get<Spec>('Events');
    "});
    assert_eq!(err.reason, "a method taking a `Signal` must return `void`");

    let err = unsupported(indoc! {"
        interface Spec { subscribe(s: Signal, id: number): void; }
        export default TurboModuleRegistry.get<Spec>('Events');
    "});
    assert_eq!(
        err.reason,
        "a `Signal` must be the only parameter, found `id` as well"
    );
}

#[test]
fn void_element_is_unsupported() {
    let err = unsupported(indoc! {"
        interface Spec { nothing(): void[]; }
        export default TurboModuleRegistry.get<Spec>('Nothing');
    "});
    assert_eq!(err.origin, "void");
    assert_eq!(err.reason, "`void` is only valid as a return type");
}

#[test]
fn error_renders_as_diagnostic() {
    let source = "interface Spec { f(x: any): void; }\nexport default TurboModuleRegistry.get<Spec>('F');";
    let err = unsupported(source);
    let rendered = err.to_diagnostics().to_string();
    insta::assert_snapshot!(rendered, @"error at 22..25: unsupported type: `any` in parameter `x` of `f` (hint: type has no fixed native representation)");
}
