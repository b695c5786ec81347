//! Two-phase module discovery.
//!
//! On Android the binding layer comes up before the app's files directory is known.
//! The package therefore answers a lookup for a synthetic module,
//! `__craby<Module>_JNI_prepare__`, by handing the directory to the binding layer and
//! reporting "no module". Resolving the real module runs that lookup first.
//!
//! [`DiscoveryRegistry`] models the host registry so the ordering can be checked
//! without a device.

#[cfg(test)]
mod bootstrap_tests;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock};

use craby_core::PlatformFamily;

/// Name of the synthetic module whose lookup delivers the environment.
pub fn prepare_module_name(module: &str) -> String {
    format!("__craby{module}_JNI_prepare__")
}

/// Real module name behind a synthetic prepare name.
pub fn prepared_module(name: &str) -> Option<&str> {
    name.strip_prefix("__craby")?
        .strip_suffix("_JNI_prepare__")
        .filter(|m| !m.is_empty())
}

/// Host function through which a family discovers modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryHook {
    /// C++ modules registered into the global module map at load time.
    GlobalModuleMap,
    /// The React package's `getModule`, consulted before the global map.
    PackageGetModule,
}

impl DiscoveryHook {
    pub fn for_family(family: PlatformFamily) -> Self {
        if family.requires_bootstrap() {
            DiscoveryHook::PackageGetModule
        } else {
            DiscoveryHook::GlobalModuleMap
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Look up the prepare name so the hook captures the environment.
    CaptureEnvironment,
    /// Look up the real module.
    ResolveModule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub steps: Vec<Step>,
}

impl Pipeline {
    fn build(family: PlatformFamily, hook: DiscoveryHook) -> Self {
        let steps = match (family.requires_bootstrap(), hook) {
            (true, DiscoveryHook::PackageGetModule) => {
                vec![Step::CaptureEnvironment, Step::ResolveModule]
            }
            _ => vec![Step::ResolveModule],
        };
        Self { steps }
    }
}

type PipelineCache = Mutex<HashMap<(PlatformFamily, DiscoveryHook), Arc<Pipeline>>>;

static PIPELINES: OnceLock<PipelineCache> = OnceLock::new();

/// Resolution pipeline for a key, built on first use and shared afterwards.
pub fn pipeline(family: PlatformFamily, hook: DiscoveryHook) -> Arc<Pipeline> {
    let cache = PIPELINES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache
        .entry((family, hook))
        .or_insert_with(|| {
            log::debug!("built discovery pipeline for {family} ({hook:?})");
            Arc::new(Pipeline::build(family, hook))
        })
        .clone()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// Lookup of a prepare name. `captured` is set when it delivered the environment.
    Prepare { module: String, captured: bool },
    /// Lookup of a real module name.
    Resolve { module: String, ok: bool },
}

/// A resolved module instance, as the host would receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHandle {
    pub name: String,
    pub data_path: String,
}

/// In-process model of the host registry and the binding layer behind it.
#[derive(Debug)]
pub struct DiscoveryRegistry {
    family: PlatformFamily,
    modules: Vec<String>,
    /// Environment the host would hand over (the app's files directory).
    environment: String,
    /// What the binding layer has received so far.
    data_path: Option<String>,
    prepared: HashSet<String>,
    events: Vec<DiscoveryEvent>,
}

impl DiscoveryRegistry {
    pub fn new(family: PlatformFamily, modules: &[&str], environment: &str) -> Self {
        // Without the handshake, the provider sets the path while registering modules.
        let data_path = (!family.requires_bootstrap()).then(|| environment.to_string());
        Self {
            family,
            modules: modules.iter().map(|m| m.to_string()).collect(),
            environment: environment.to_string(),
            data_path,
            prepared: HashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[DiscoveryEvent] {
        &self.events
    }

    pub fn is_prepared(&self, module: &str) -> bool {
        self.prepared.contains(module)
    }

    /// One raw lookup, as the host registry issues it.
    pub fn lookup(&mut self, name: &str) -> Option<ModuleHandle> {
        if let Some(module) = prepared_module(name)
            && self.family.requires_bootstrap()
            && self.modules.iter().any(|m| m == module)
        {
            let captured = self.prepared.insert(module.to_string());
            if captured {
                // One-way setter into the binding layer.
                self.data_path = Some(self.environment.clone());
            }
            self.events.push(DiscoveryEvent::Prepare {
                module: module.to_string(),
                captured,
            });
            return None;
        }

        let known = self.modules.iter().any(|m| m == name);
        let ready = !self.family.requires_bootstrap() || self.is_prepared(name);
        let handle = match &self.data_path {
            Some(path) if known && ready => Some(ModuleHandle {
                name: name.to_string(),
                data_path: path.clone(),
            }),
            _ => None,
        };
        if known {
            self.events.push(DiscoveryEvent::Resolve {
                module: name.to_string(),
                ok: handle.is_some(),
            });
        }
        handle
    }

    /// Resolve a module through its family's pipeline.
    pub fn resolve(&mut self, name: &str) -> Option<ModuleHandle> {
        let pipeline = pipeline(self.family, DiscoveryHook::for_family(self.family));
        let mut handle = None;
        for step in &pipeline.steps {
            match step {
                Step::CaptureEnvironment => {
                    if !self.is_prepared(name) {
                        self.lookup(&prepare_module_name(name));
                    }
                }
                Step::ResolveModule => handle = self.lookup(name),
            }
        }
        handle
    }
}
