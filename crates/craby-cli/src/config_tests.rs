use indoc::indoc;

use craby_core::PlatformFamily;

use crate::config::{ConfigError, ProjectConfig};

#[test]
fn minimal_config() {
    let config = ProjectConfig::parse(indoc! {r#"
        [project]
        name = "my-module"

        [android]
        package_name = "com.mymodule"
    "#})
    .unwrap();

    insta::assert_debug_snapshot!(config, @r#"
    ProjectConfig {
        name: "my-module",
        source_dir: "src",
        android_package: "com.mymodule",
        families: [
            Android,
            Ios,
        ],
    }
    "#);
}

#[test]
fn explicit_families_and_source_dir() {
    let config = ProjectConfig::parse(indoc! {r#"
        [project]
        name = "my-module"
        source_dir = "js/specs"

        [android]
        package_name = "dev.craby.my_module"

        [build]
        families = ["ios"]
    "#})
    .unwrap();

    assert_eq!(config.source_dir.to_str(), Some("js/specs"));
    assert_eq!(config.families, [PlatformFamily::Ios]);
}

#[test]
fn errors_name_the_key() {
    let cases = [
        (
            "[project]\nname = \"  \"\n[android]\npackage_name = \"a.b\"\n",
            "invalid craby.toml: `project.name` must not be empty",
        ),
        (
            "[project]\nname = \"m\"\n",
            "invalid craby.toml: `android.package_name` is required",
        ),
        (
            "[project]\nname = \"m\"\n[android]\npackage_name = \"com..m\"\n",
            "invalid craby.toml: `android.package_name` `com..m` is not a dotted Java package name",
        ),
        (
            "[project]\nname = \"m\"\n[android]\npackage_name = \"a.b\"\n[build]\nfamilies = [\"web\"]\n",
            "invalid craby.toml: `build.families` unknown platform family `web` (expected `android` or `ios`)",
        ),
        (
            "[project]\nname = \"m\"\n[android]\npackage_name = \"a.b\"\n[build]\nfamilies = []\n",
            "invalid craby.toml: `build.families` must name at least one family",
        ),
    ];

    for (text, expected) in cases {
        let err = ProjectConfig::parse(text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{text}");
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn missing_project_table_is_a_parse_error() {
    let err = ProjectConfig::parse("[android]\npackage_name = \"a.b\"\n").unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let layout = craby_core::ProjectLayout::new(dir.path());

    assert!(matches!(
        ProjectConfig::load(&layout),
        Err(ConfigError::NotFound(_))
    ));
}
