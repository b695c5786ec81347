use craby_core::PlatformFamily;

/// Bumped whenever a triple is added, removed or renamed.
pub const TARGET_SET_VERSION: u32 = 1;

/// A cross-compilation target and where its binary goes inside the family bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub triple: &'static str,
    pub family: PlatformFamily,
    /// Bundle slot: the Android ABI or the xcframework library identifier.
    pub slot: &'static str,
    /// Architecture name recorded in the bundle manifest.
    pub arch: &'static str,
    /// iOS platform variant, if any.
    pub variant: Option<&'static str>,
}

pub const TARGETS: &[Target] = &[
    Target {
        triple: "aarch64-linux-android",
        family: PlatformFamily::Android,
        slot: "arm64-v8a",
        arch: "arm64",
        variant: None,
    },
    Target {
        triple: "armv7-linux-androideabi",
        family: PlatformFamily::Android,
        slot: "armeabi-v7a",
        arch: "armv7",
        variant: None,
    },
    Target {
        triple: "x86_64-linux-android",
        family: PlatformFamily::Android,
        slot: "x86_64",
        arch: "x86_64",
        variant: None,
    },
    Target {
        triple: "i686-linux-android",
        family: PlatformFamily::Android,
        slot: "x86",
        arch: "i686",
        variant: None,
    },
    Target {
        triple: "aarch64-apple-ios",
        family: PlatformFamily::Ios,
        slot: "ios-arm64",
        arch: "arm64",
        variant: None,
    },
    Target {
        triple: "aarch64-apple-ios-sim",
        family: PlatformFamily::Ios,
        slot: "ios-arm64-simulator",
        arch: "arm64",
        variant: Some("simulator"),
    },
];

pub fn targets_for(family: PlatformFamily) -> Vec<Target> {
    TARGETS.iter().copied().filter(|t| t.family == family).collect()
}

pub fn find(triple: &str) -> Option<&'static Target> {
    TARGETS.iter().find(|t| t.triple == triple)
}
