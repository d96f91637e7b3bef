//! Link token normalization.
//!
//! Turns one raw token from a linker command line into a candidate
//! [`Component`]. The rules are applied in order and the first one that
//! matches decides the name:
//!
//! 1. empty token: no name, type unknown
//! 2. `-lNAME`: library `NAME`
//! 3. anything with a path separator: library named after the file
//! 4. CMake imported target (`Ns::Name`): the token itself, type unknown
//! 5. everything else: a bare library file name

use crate::model::{Component, ComponentType, SourceRef};
use crate::utils::{ends_with_ignore_ascii_case, normalize_field, normalize_slashes};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Evidence system recorded on every token-derived component.
pub const LINK_TOKEN_SYSTEM: &str = "link-token";
/// Evidence system recorded on CMake imported targets.
pub const IMPORTED_TARGET_SYSTEM: &str = "cmake-imported-target";
/// Property holding the full imported target name.
pub const IMPORTED_TARGET_PROPERTY: &str = "linksbom:imported-target";

const LIBRARY_EXTENSIONS: [&str; 4] = [".a", ".so", ".dylib", ".lib"];

/// Token normalization switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Lower-case library names (Windows file names are case-insensitive)
    pub case_fold_windows_libs: bool,
    /// Strip a leading `lib` from file names
    pub strip_unix_lib_prefix: bool,
    /// Strip `.a`, `.so`, `.dylib` and `.lib`
    pub strip_library_extensions: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            case_fold_windows_libs: true,
            strip_unix_lib_prefix: true,
            strip_library_extensions: true,
        }
    }
}

/// Backslashes to slashes, repeated slashes collapsed.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    normalize_slashes(path)
}

/// Trim and collapse whitespace in a raw token.
#[must_use]
pub fn normalize_token(token: &str) -> String {
    normalize_field(token)
}

/// Whether an ingested link fragment names a dependency at all.
///
/// Linker switches and generator expressions are not dependencies. Absolute
/// Unix paths are: `/usr/lib/libz.so` is a library artifact, while a
/// single-segment `/NODEFAULTLIB:msvcrt` is an MSVC switch.
#[must_use]
pub fn is_dependency_token(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() || token.contains("$<") {
        return false;
    }
    if let Some(rest) = token.strip_prefix('-') {
        return rest.len() > 1 && rest.starts_with('l');
    }
    if let Some(rest) = token.strip_prefix('/') {
        return rest.contains('/');
    }
    true
}

/// Derive a candidate component from one raw link token.
///
/// The returned component's id is already its canonical id.
#[must_use]
pub fn component_from_link_token(raw: &str, options: &NormalizeOptions) -> Component {
    let token = normalize_token(raw);

    let mut component = Component {
        component_type: ComponentType::Library,
        ..Component::default()
    };
    component
        .sources
        .push(SourceRef::new(LINK_TOKEN_SYSTEM, token.clone()));

    if token.is_empty() {
        component.component_type = ComponentType::Unknown;
    } else if let Some(name) = token.strip_prefix("-l").filter(|n| !n.is_empty()) {
        component.name = name.to_string();
    } else if token.contains(['/', '\\']) {
        component.name = library_name_from_path(&normalize_path(&token), options);
    } else if token.contains("::") {
        component.name.clone_from(&token);
        component.component_type = ComponentType::Unknown;
        component
            .properties
            .insert(IMPORTED_TARGET_PROPERTY.to_string(), token.clone());
        component
            .sources
            .push(SourceRef::new(IMPORTED_TARGET_SYSTEM, token.clone()));
    } else {
        let mut name = strip_extension(&token, options).to_string();
        if options.case_fold_windows_libs {
            name.make_ascii_lowercase();
        }
        component.name = strip_lib_prefix(&name, options).to_string();
    }

    component.refresh_id();
    component
}

fn library_name_from_path(path: &str, options: &NormalizeOptions) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    let base = strip_extension(base, options);
    let mut name = strip_lib_prefix(base, options).to_string();
    if options.case_fold_windows_libs {
        name.make_ascii_lowercase();
    }
    name
}

fn strip_extension<'a>(name: &'a str, options: &NormalizeOptions) -> &'a str {
    if !options.strip_library_extensions {
        return name;
    }
    LIBRARY_EXTENSIONS
        .iter()
        .find(|ext| ends_with_ignore_ascii_case(name, ext))
        .map_or(name, |ext| &name[..name.len() - ext.len()])
}

fn strip_lib_prefix<'a>(name: &'a str, options: &NormalizeOptions) -> &'a str {
    if !options.strip_unix_lib_prefix {
        return name;
    }
    name.strip_prefix("lib").filter(|rest| !rest.is_empty()).unwrap_or(name)
}
