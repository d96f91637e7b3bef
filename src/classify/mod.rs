//! Origin classification.
//!
//! Three passes run in a fixed order: project-local, system, third-party.
//! Each one only assigns an origin to components whose origin is still
//! unknown, so an earlier decision is never overridden and re-running the
//! chain after further normalization only fills gaps.

mod filter;

pub use filter::{FilterOptions, FilterStats, filter_components};

use crate::model::{Component, ComponentOrigin, Precedence, ProjectGraph};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const WINDOWS_SYSTEM_LIBRARIES: &[&str] = &[
    "kernel32", "user32", "gdi32", "advapi32", "shell32", "ole32", "oleaut32", "uuid",
    "winspool", "comdlg32", "ws2_32", "bcrypt", "crypt32",
];
const LINUX_SYSTEM_LIBRARIES: &[&str] = &["c", "m", "dl", "pthread", "rt", "gcc_s", "stdc++"];
const MACOS_SYSTEM_LIBRARIES: &[&str] = &["System", "objc", "c++"];

/// Evidence systems that mark a component as externally provided.
pub const DEFAULT_THIRD_PARTY_SYSTEMS: &[&str] =
    &["vcpkg", "conan", "fetchcontent", "cpm", "package-manager"];

/// Target platform, which selects the built-in system library list
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    #[value(name = "macos")]
    MacOs,
    Other,
}

impl Platform {
    /// Platform this binary was compiled for
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Classification settings as they appear in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Platform whose system libraries apply (defaults to the host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Additional names treated as system libraries
    pub extra_system_libraries: Vec<String>,
    /// Evidence systems that mark a component as third-party
    pub third_party_systems: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            platform: None,
            extra_system_libraries: Vec::new(),
            third_party_systems: DEFAULT_THIRD_PARTY_SYSTEMS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Names of operating-system and runtime libraries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemLibraries {
    names: BTreeSet<String>,
}

impl SystemLibraries {
    /// Built-in list for a platform
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        let names: &[&str] = match platform {
            Platform::Windows => WINDOWS_SYSTEM_LIBRARIES,
            Platform::Linux => LINUX_SYSTEM_LIBRARIES,
            Platform::MacOs => MACOS_SYSTEM_LIBRARIES,
            Platform::Other => &[],
        };
        Self {
            names: names.iter().map(|n| (*n).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(extra.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Signals that mark a component as third-party
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyRules {
    provenance_systems: BTreeSet<String>,
}

impl Default for ThirdPartyRules {
    fn default() -> Self {
        Self::new(DEFAULT_THIRD_PARTY_SYSTEMS.iter().copied())
    }
}

impl ThirdPartyRules {
    pub fn new<I, S>(systems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provenance_systems: systems.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_external_system(&self, system: &str) -> bool {
        self.provenance_systems.contains(system)
    }
}

/// The full classifier chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifier {
    pub system: SystemLibraries,
    pub third_party: ThirdPartyRules,
}

impl Classifier {
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            system: SystemLibraries::for_platform(platform),
            third_party: ThirdPartyRules::default(),
        }
    }

    /// Build the chain from file configuration
    #[must_use]
    pub fn from_config(config: &ClassifyConfig) -> Self {
        let platform = config.platform.unwrap_or_else(Platform::host);
        Self {
            system: SystemLibraries::for_platform(platform)
                .with_extra(config.extra_system_libraries.iter().cloned()),
            third_party: ThirdPartyRules::new(config.third_party_systems.iter().cloned()),
        }
    }
}

/// Number of components each pass classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyStats {
    pub project_local: usize,
    pub system: usize,
    pub third_party: usize,
}

impl ClassifyStats {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.project_local + self.system + self.third_party
    }
}

/// Mark components named like a target of the build as project-local.
pub fn classify_project_local_components(graph: &mut ProjectGraph) -> usize {
    let target_names: BTreeSet<String> = graph
        .target_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    assign_where(graph, ComponentOrigin::ProjectLocal, |c| {
        target_names.contains(&c.name)
    })
}

/// Mark components named like an operating-system library as system.
pub fn classify_system_components(graph: &mut ProjectGraph, libraries: &SystemLibraries) -> usize {
    assign_where(graph, ComponentOrigin::System, |c| libraries.contains(&c.name))
}

/// Mark imported targets and package-manager provided components as third-party.
pub fn classify_third_party_components(graph: &mut ProjectGraph, rules: &ThirdPartyRules) -> usize {
    assign_where(graph, ComponentOrigin::ThirdParty, |c| {
        c.name.contains("::") || c.sources.iter().any(|s| rules.is_external_system(&s.system))
    })
}

/// Run the three passes in order.
pub fn classify_components(graph: &mut ProjectGraph, classifier: &Classifier) -> ClassifyStats {
    let stats = ClassifyStats {
        project_local: classify_project_local_components(graph),
        system: classify_system_components(graph, &classifier.system),
        third_party: classify_third_party_components(graph, &classifier.third_party),
    };
    tracing::info!(
        "Classified {} components ({} project-local, {} system, {} third-party)",
        stats.total(),
        stats.project_local,
        stats.system,
        stats.third_party
    );
    stats
}

fn assign_where<F>(graph: &mut ProjectGraph, origin: ComponentOrigin, predicate: F) -> usize
where
    F: Fn(&Component) -> bool,
{
    let mut assigned = 0;
    for component in graph.components.values_mut() {
        if component.origin.is_unset() && predicate(component) {
            component.origin.refine_from(&origin);
            assigned += 1;
        }
    }
    assigned
}
