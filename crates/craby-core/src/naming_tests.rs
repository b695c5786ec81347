use crate::naming::*;

#[test]
fn split_camel_case() {
    assert_eq!(split_words("getUserName"), ["get", "user", "name"]);
    assert_eq!(split_words("add"), ["add"]);
    assert_eq!(split_words("x"), ["x"]);
}

#[test]
fn split_on_digits() {
    assert_eq!(split_words("utf8Encode"), ["utf", "8", "encode"]);
    assert_eq!(split_words("vec3"), ["vec", "3"]);
    assert_eq!(split_words("from2d"), ["from", "2", "d"]);
    assert_eq!(split_words("get10Items"), ["get", "10", "items"]);
}

#[test]
fn split_acronyms() {
    assert_eq!(split_words("getHTTPResponse"), ["get", "http", "response"]);
    assert_eq!(split_words("parseURL"), ["parse", "url"]);
    assert_eq!(split_words("QRow"), ["q", "row"]);
}

#[test]
fn split_separators() {
    assert_eq!(split_words("my-module"), ["my", "module"]);
    assert_eq!(split_words("__private_name"), ["private", "name"]);
    assert_eq!(split_words("com.example.app"), ["com", "example", "app"]);
    assert!(split_words("").is_empty());
}

#[test]
fn snake_case() {
    assert_eq!(to_snake_case("getUserName"), "get_user_name");
    assert_eq!(to_snake_case("userId"), "user_id");
    assert_eq!(to_snake_case("calculatePrime"), "calculate_prime");
    assert_eq!(to_snake_case("already_snake"), "already_snake");
    assert_eq!(to_snake_case("FooBar"), "foo_bar");
}

#[test]
fn pascal_case() {
    assert_eq!(to_pascal_case("calculator"), "Calculator");
    assert_eq!(to_pascal_case("my-module"), "MyModule");
    assert_eq!(to_pascal_case("foo_bar"), "FooBar");
    assert_eq!(to_pascal_case("HTTPClient"), "HttpClient");
    assert_eq!(to_pascal_case("Vec3"), "Vec3");
}

#[test]
fn pascal_case_idempotent() {
    for input in ["FooBar", "HttpClient", "Vec3", "QRow", "Calculator"] {
        let once = to_pascal_case(input);
        assert_eq!(to_pascal_case(&once), once);
    }
}

#[test]
fn camel_and_flat_case() {
    assert_eq!(to_camel_case("my-module"), "myModule");
    assert_eq!(to_camel_case("get_user_name"), "getUserName");
    assert_eq!(to_flat_case("MyModule"), "mymodule");
    assert_eq!(to_flat_case("react-native-calc"), "reactnativecalc");
    assert_eq!(to_kebab_case("MyModule"), "my-module");
    assert_eq!(to_kebab_case("my_module"), "my-module");
}

#[test]
fn snake_case_recovers_segmentation() {
    let inputs = [
        "getUserName",
        "calculatePrime",
        "utf8Encode",
        "a1b2c3",
        "getHTTPResponse",
        "x",
        "isOK",
        "version2Beta",
        "toJSON5",
    ];

    for input in inputs {
        let snake = to_snake_case(input);
        let resplit: Vec<String> = snake.split('_').map(str::to_string).collect();
        assert_eq!(resplit, split_words(input), "segmentation of {input}");
    }
}

#[test]
fn distinct_words_never_collapse() {
    assert_ne!(to_snake_case("getItem"), to_snake_case("getItems"));
    assert_ne!(to_snake_case("a1b"), to_snake_case("ab1"));
}

#[test]
fn rust_identifiers() {
    assert_eq!(rust_ident("type"), "r#type");
    assert_eq!(rust_ident("match"), "r#match");
    assert_eq!(rust_ident("self"), "self_");
    assert_eq!(rust_ident("value"), "value");
    assert!(is_rust_keyword("fn"));
    assert!(!is_rust_keyword("name"));
}
