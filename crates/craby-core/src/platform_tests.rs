use crate::platform::PlatformFamily;

#[test]
fn display_and_parse() {
    insta::assert_snapshot!(PlatformFamily::Android, @"android");
    insta::assert_snapshot!(PlatformFamily::Ios, @"ios");
    assert_eq!("iOS".parse::<PlatformFamily>(), Ok(PlatformFamily::Ios));
}

#[test]
fn parse_unknown() {
    let err = "windows".parse::<PlatformFamily>().unwrap_err();
    insta::assert_snapshot!(err, @"unknown platform family `windows` (expected `android` or `ios`)");
}

#[test]
fn only_android_needs_bootstrap() {
    assert!(PlatformFamily::Android.requires_bootstrap());
    assert!(!PlatformFamily::Ios.requires_bootstrap());
}
