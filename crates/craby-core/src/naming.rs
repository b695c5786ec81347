//! Identifier case conversion.
//!
//! Every conversion goes through [`split_words`], so `to_snake_case`, `to_pascal_case`
//! and friends agree on where one word ends and the next begins.

/// Split an identifier into lowercase words.
///
/// Words break on `_`, `-`, `.` and whitespace, on a lowercase-to-uppercase
/// transition, between letters and digits, and before the last capital of an
/// acronym run (`HTTPResponse` is `http` + `response`).
///
/// # Examples
/// ```
/// use craby_core::naming::split_words;
/// assert_eq!(split_words("getUserName"), ["get", "user", "name"]);
/// assert_eq!(split_words("utf8Encode"), ["utf", "8", "encode"]);
/// ```
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            flush(&mut current, &mut words);
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p))
            && !is_separator(prev)
            && is_boundary(prev, c, chars.get(i + 1).copied())
        {
            flush(&mut current, &mut words);
        }

        current.push(c.to_ascii_lowercase());
    }

    flush(&mut current, &mut words);
    words
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.') || c.is_whitespace()
}

fn is_boundary(prev: char, c: char, next: Option<char>) -> bool {
    if prev.is_ascii_digit() != c.is_ascii_digit() {
        return true;
    }
    if prev.is_ascii_lowercase() && c.is_ascii_uppercase() {
        return true;
    }
    // Acronym followed by a capitalized word: `HTTPResponse` splits before `R`.
    prev.is_ascii_uppercase() && c.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase())
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert to snake_case.
///
/// # Examples
/// ```
/// use craby_core::naming::to_snake_case;
/// assert_eq!(to_snake_case("getUserName"), "get_user_name");
/// assert_eq!(to_snake_case("FooBar"), "foo_bar");
/// ```
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert to PascalCase. Acronyms collapse to a single capital (`HTTPClient` is `HttpClient`).
///
/// # Examples
/// ```
/// use craby_core::naming::to_pascal_case;
/// assert_eq!(to_pascal_case("my-module"), "MyModule");
/// assert_eq!(to_pascal_case("FooBar"), "FooBar");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert to camelCase.
pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut iter = words.iter();
    let mut out = iter.next().cloned().unwrap_or_default();
    for word in iter {
        out.push_str(&capitalize(word));
    }
    out
}

/// Convert to kebab-case, used for CMake target names.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Lowercase words joined without separators, used for C++ namespaces.
pub fn to_flat_case(s: &str) -> String {
    split_words(s).concat()
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type",
    "unsafe", "use", "where", "while", "yield",
];

/// Identifiers that can't be used even as raw identifiers.
const RUST_RESERVED: &[&str] = &["crate", "self", "Self", "super"];

pub fn is_rust_keyword(s: &str) -> bool {
    RUST_KEYWORDS.contains(&s) || RUST_RESERVED.contains(&s)
}

/// Render `s` as a usable Rust identifier.
///
/// Keywords become raw identifiers; `crate`, `self`, `Self` and `super` get a trailing underscore.
pub fn rust_ident(s: &str) -> String {
    if RUST_RESERVED.contains(&s) {
        format!("{s}_")
    } else if RUST_KEYWORDS.contains(&s) {
        format!("r#{s}")
    } else {
        s.to_string()
    }
}
