//! Family bundles. Each is assembled under `.craby/staging/` and moved into place
//! only once every slot and the manifest are written.
//!
//! The C++ that cxx generates travels with the libraries: Android gets the bridge
//! sources and headers next to `libs/` for CMake to compile, each iOS slot gets the
//! headers under `Headers/`.

use std::fs;
use std::path::{Path, PathBuf};

use craby_core::layout::lib_name;
use craby_core::{PlatformFamily, ProjectLayout};
use indoc::formatdoc;
use serde::Serialize;

use crate::error::PackagingError;
use crate::orchestrator::Artifact;
use crate::targets::TARGET_SET_VERSION;

/// A packaged family bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub family: PlatformFamily,
    pub path: PathBuf,
    pub manifest: PathBuf,
    /// Slot directories in target order.
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AndroidManifest<'a> {
    version: u32,
    library: String,
    abis: Vec<AbiEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct AbiEntry<'a> {
    abi: &'a str,
    triple: &'a str,
}

pub fn bundle_dir(layout: &ProjectLayout, project_name: &str, family: PlatformFamily) -> PathBuf {
    match family {
        PlatformFamily::Android => layout.android_libs_dir(),
        PlatformFamily::Ios => layout.xcframework_dir(&lib_name(project_name)),
    }
}

fn staging_dir(layout: &ProjectLayout, family: PlatformFamily) -> PathBuf {
    layout.tmp_dir().join("staging").join(family.name())
}

const HEADERS_DIR: &str = "Headers";
const CXX_SOURCE_EXTS: &[&str] = &["c", "cc"];
const CXX_HEADER_EXTS: &[&str] = &["h", "hh"];

/// C++ bridge files for one triple: cxx output plus the crate's own headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeFiles {
    pub sources: Vec<PathBuf>,
    pub headers: Vec<PathBuf>,
}

impl BridgeFiles {
    /// Missing directories contribute nothing.
    pub fn collect(layout: &ProjectLayout, triple: &str) -> std::io::Result<Self> {
        let mut files = Self::default();
        let cxx_dir = layout.cxx_bridge_dir(triple);
        if cxx_dir.is_dir() {
            files.walk(&cxx_dir, true)?;
        }
        let include_dir = layout.crate_include_dir();
        if include_dir.is_dir() {
            files.walk(&include_dir, false)?;
        }
        files.sources.sort();
        files.headers.sort();
        log::debug!(
            "{triple}: {} bridge sources, {} headers",
            files.sources.len(),
            files.headers.len()
        );
        Ok(files)
    }

    fn walk(&mut self, dir: &Path, with_sources: bool) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.walk(&path, with_sources)?;
                continue;
            }
            // cxx links `crate/<name>` back to the crate root; only linked files count.
            if !path.is_file() {
                continue;
            }
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if with_sources && CXX_SOURCE_EXTS.contains(&ext) {
                self.sources.push(path);
            } else if CXX_HEADER_EXTS.contains(&ext) {
                self.headers.push(path);
            }
        }
        Ok(())
    }
}

/// Copy `files` into `dest` by file name.
fn copy_flat(files: &[PathBuf], dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for file in files {
        if let Some(name) = file.file_name() {
            fs::copy(file, dest.join(name))?;
        }
    }
    Ok(())
}

fn library_file(project_name: &str, family: PlatformFamily) -> String {
    match family {
        PlatformFamily::Android => format!("lib{}-prebuilt.a", lib_name(project_name)),
        PlatformFamily::Ios => format!("lib{}.a", lib_name(project_name)),
    }
}

/// Copy each artifact into its slot, write the manifest, then replace the bundle.
pub fn package(
    layout: &ProjectLayout,
    project_name: &str,
    family: PlatformFamily,
    artifacts: &[Artifact],
) -> Result<Bundle, PackagingError> {
    for artifact in artifacts {
        if !artifact.path.is_file() {
            return Err(PackagingError::MissingArtifact {
                triple: artifact.target.triple.to_string(),
                path: artifact.path.clone(),
            });
        }
    }

    let staging = staging_dir(layout, family);
    let assemble = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PackagingError::Assemble {
            family,
            path,
            source,
        }
    };

    remove_if_exists(&staging).map_err(assemble(&staging))?;
    let library = library_file(project_name, family);
    let mut slots = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let slot = staging.join(artifact.target.slot);
        fs::create_dir_all(&slot).map_err(assemble(&slot))?;
        let dest = slot.join(&library);
        fs::copy(&artifact.path, &dest).map_err(assemble(&dest))?;
        if family == PlatformFamily::Ios {
            let bridge = BridgeFiles::collect(layout, artifact.target.triple)
                .map_err(assemble(&layout.cxx_bridge_dir(artifact.target.triple)))?;
            let headers = slot.join(HEADERS_DIR);
            copy_flat(&bridge.headers, &headers).map_err(assemble(&headers))?;
        }
        slots.push(artifact.target.slot.to_string());
    }

    // cxx emits the same C++ for every ABI, so CMake builds it from one copy.
    let bridge_staging = layout.tmp_dir().join("staging").join("android-bridge");
    if family == PlatformFamily::Android {
        remove_if_exists(&bridge_staging).map_err(assemble(&bridge_staging))?;
        let bridge = match artifacts.first() {
            Some(first) => BridgeFiles::collect(layout, first.target.triple)
                .map_err(assemble(&layout.cxx_bridge_dir(first.target.triple)))?,
            None => BridgeFiles::default(),
        };
        let src = bridge_staging.join("src");
        copy_flat(&bridge.sources, &src).map_err(assemble(&src))?;
        let include = bridge_staging.join("include");
        copy_flat(&bridge.headers, &include).map_err(assemble(&include))?;
    }

    let (manifest_name, manifest) = match family {
        PlatformFamily::Android => ("manifest.json", android_manifest(&library, artifacts)),
        PlatformFamily::Ios => ("Info.plist", ios_info_plist(&library, artifacts)),
    };
    fs::create_dir_all(&staging).map_err(assemble(&staging))?;
    let staged_manifest = staging.join(manifest_name);
    fs::write(&staged_manifest, manifest).map_err(assemble(&staged_manifest))?;

    let dest = bundle_dir(layout, project_name, family);
    remove_if_exists(&dest).map_err(assemble(&dest))?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(assemble(parent))?;
    }
    fs::rename(&staging, &dest).map_err(assemble(&dest))?;
    if family == PlatformFamily::Android {
        for (staged, target) in [
            (bridge_staging.join("src"), layout.android_bridge_src_dir()),
            (bridge_staging.join("include"), layout.android_include_dir()),
        ] {
            remove_if_exists(&target).map_err(assemble(&target))?;
            fs::rename(&staged, &target).map_err(assemble(&target))?;
        }
        remove_if_exists(&bridge_staging).map_err(assemble(&bridge_staging))?;
    }
    log::info!("{family} bundle written to {}", dest.display());

    Ok(Bundle {
        family,
        manifest: dest.join(manifest_name),
        path: dest,
        slots,
    })
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

pub(crate) fn android_manifest(library: &str, artifacts: &[Artifact]) -> String {
    let manifest = AndroidManifest {
        version: TARGET_SET_VERSION,
        library: library.to_string(),
        abis: artifacts
            .iter()
            .map(|a| AbiEntry {
                abi: a.target.slot,
                triple: a.target.triple,
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&manifest).expect("manifest serializes to JSON");
    json.push('\n');
    json
}

pub(crate) fn ios_info_plist(library: &str, artifacts: &[Artifact]) -> String {
    let libraries = artifacts
        .iter()
        .map(|a| {
            let variant = a
                .target
                .variant
                .map(|v| {
                    format!("\n\t\t\t<key>SupportedPlatformVariant</key>\n\t\t\t<string>{v}</string>")
                })
                .unwrap_or_default();
            format!(
                "\t\t<dict>\n\
                 \t\t\t<key>LibraryIdentifier</key>\n\
                 \t\t\t<string>{slot}</string>\n\
                 \t\t\t<key>LibraryPath</key>\n\
                 \t\t\t<string>{library}</string>\n\
                 \t\t\t<key>HeadersPath</key>\n\
                 \t\t\t<string>{HEADERS_DIR}</string>\n\
                 \t\t\t<key>SupportedArchitectures</key>\n\
                 \t\t\t<array>\n\
                 \t\t\t\t<string>{arch}</string>\n\
                 \t\t\t</array>\n\
                 \t\t\t<key>SupportedPlatform</key>\n\
                 \t\t\t<string>ios</string>{variant}\n\
                 \t\t</dict>",
                slot = a.target.slot,
                arch = a.target.arch,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
        <plist version="1.0">
        <dict>
        	<key>AvailableLibraries</key>
        	<array>
        {libraries}
        	</array>
        	<key>CFBundlePackageType</key>
        	<string>XFWK</string>
        	<key>XCFrameworkFormatVersion</key>
        	<string>1.0</string>
        </dict>
        </plist>
        "#,
        libraries = libraries,
    }
}
