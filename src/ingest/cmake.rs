//! CMake File API reader.
//!
//! Reads the `codemodel` (version 2) reply that CMake writes under
//! `<build>/.cmake/api/v1/reply/` once a client query exists. Only the
//! fields needed for the dependency graph are deserialized.

use super::{BuildIngestor, IngestOptions};
use crate::error::{ErrorContext, IngestErrorKind, LinkSbomError, Result};
use crate::model::{
    Artifact, BuildTarget, Checksum, DependencyEdge, ProjectGraph, ResolutionContext, SourceRef,
    TargetId, TargetKind, make_target_id,
};
use crate::normalize::is_dependency_token;
use crate::utils::normalize_slashes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

const BUILD_SYSTEM: &str = "cmake";
const LIBRARIES_ROLE: &str = "libraries";

/// Ingestor for CMake builds configured with a File API query
#[derive(Debug, Clone, Copy, Default)]
pub struct CMakeFileApiIngestor;

impl CMakeFileApiIngestor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn reply_dir(build_dir: &Path) -> PathBuf {
        build_dir.join(".cmake").join("api").join("v1").join("reply")
    }
}

impl BuildIngestor for CMakeFileApiIngestor {
    fn name(&self) -> &'static str {
        "cmake-file-api"
    }

    fn can_ingest(&self, build_dir: &Path) -> bool {
        Self::reply_dir(build_dir).is_dir()
    }

    fn ingest(&self, build_dir: &Path, options: &IngestOptions) -> Result<ProjectGraph> {
        let reply_dir = Self::reply_dir(build_dir);
        if !reply_dir.is_dir() {
            return Err(LinkSbomError::ingest(
                format!("at {}", build_dir.display()),
                IngestErrorKind::MissingReplyDir(reply_dir.display().to_string()),
            ));
        }

        let index_path = find_index(&reply_dir)?;
        let index: ReplyIndex = read_json(&index_path)?;
        let codemodel_ref = index
            .objects
            .iter()
            .find(|o| o.kind == "codemodel" && o.version.major == 2)
            .ok_or_else(|| {
                LinkSbomError::ingest(
                    format!("in {}", index_path.display()),
                    IngestErrorKind::MissingCodemodel,
                )
            })?;
        let codemodel: Codemodel = read_json(&reply_dir.join(&codemodel_ref.json_file))?;
        let toolchains = load_toolchains(&reply_dir, &index)?;

        let index_name = index_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut graph = ProjectGraph::new(ResolutionContext {
            run_id: index_name.trim_end_matches(".json").to_string(),
            root_directory: codemodel.paths.source.clone(),
            build_directory: if codemodel.paths.build.is_empty() {
                build_dir.display().to_string()
            } else {
                codemodel.paths.build.clone()
            },
            generator: index.cmake.generator.name.clone(),
            cmake_version: index.cmake.version.string.clone(),
            environment: BTreeMap::new(),
            sources: vec![SourceRef::new(BUILD_SYSTEM, index_name)],
        });

        let reader = TargetReader {
            build_dir,
            reply_dir: &reply_dir,
            options,
            toolchains: &toolchains,
            platform: index.cmake.generator.platform.as_deref(),
        };
        let mut filtered = 0;
        for configuration in &codemodel.configurations {
            filtered += reader.read_configuration(configuration, &mut graph)?;
        }

        tracing::info!(
            "Ingested {} targets and {} edges ({} link fragments were not dependencies)",
            graph.targets.len(),
            graph.edges.len(),
            filtered
        );
        Ok(graph)
    }
}

struct TargetReader<'a> {
    build_dir: &'a Path,
    reply_dir: &'a Path,
    options: &'a IngestOptions,
    toolchains: &'a HashMap<String, String>,
    platform: Option<&'a str>,
}

impl TargetReader<'_> {
    /// Add one configuration's targets and edges, returning the number of
    /// link fragments that were rejected as non-dependencies.
    fn read_configuration(
        &self,
        configuration: &Configuration,
        graph: &mut ProjectGraph,
    ) -> Result<usize> {
        let mut loaded = Vec::with_capacity(configuration.targets.len());
        for target_ref in &configuration.targets {
            let project = configuration
                .projects
                .get(target_ref.project_index)
                .ok_or_else(|| {
                    LinkSbomError::missing_field(
                        format!("projects[{}]", target_ref.project_index),
                        format!("configuration '{}'", configuration.name),
                    )
                })?;
            let file: TargetFile = read_json(&self.reply_dir.join(&target_ref.json_file))?;
            let kind = TargetKind::from_cmake_type(&file.target_type);
            if kind == TargetKind::Utility && !self.options.include_utility_targets {
                tracing::debug!("skipping utility target '{}'", file.name);
                continue;
            }
            let id = make_target_id(BUILD_SYSTEM, &project.name, &file.name, &configuration.name);
            loaded.push((target_ref, file, kind, id));
        }

        let ids: HashMap<&str, TargetId> = loaded
            .iter()
            .map(|(_, file, _, id)| (file.id.as_str(), id.clone()))
            .collect();

        let mut filtered = 0;
        for (target_ref, file, kind, id) in &loaded {
            let evidence = SourceRef::new(BUILD_SYSTEM, target_ref.json_file.clone());

            for dependency in &file.dependencies {
                match ids.get(dependency.id.as_str()) {
                    Some(to) => {
                        let mut edge = DependencyEdge::to_target(id.clone(), to.clone());
                        edge.sources.push(evidence.clone());
                        graph.add_edge(edge);
                    }
                    None => tracing::debug!(
                        "'{}' depends on skipped target {}",
                        file.name,
                        dependency.id
                    ),
                }
            }

            for fragment in file.link_fragments() {
                if !is_dependency_token(fragment) {
                    tracing::debug!("ignoring link fragment '{fragment}' of '{}'", file.name);
                    filtered += 1;
                    continue;
                }
                let mut edge = DependencyEdge::raw(id.clone(), fragment.trim());
                edge.sources.push(evidence.clone());
                graph.add_edge(edge);
            }

            graph.add_target(self.build_target(file, *kind, id.clone(), &configuration.name, evidence));
        }

        Ok(filtered)
    }

    fn build_target(
        &self,
        file: &TargetFile,
        kind: TargetKind,
        id: TargetId,
        configuration: &str,
        evidence: SourceRef,
    ) -> BuildTarget {
        let mut target = BuildTarget::new(id, file.name.clone(), kind);
        target.configuration = Some(configuration.to_string()).filter(|c| !c.is_empty());
        target.platform = self.platform.map(str::to_string);
        target.toolchain = file
            .language()
            .and_then(|language| self.toolchains.get(language))
            .cloned();

        for group in &file.compile_groups {
            for include in &group.includes {
                push_unique(&mut target.include_dirs, normalize_slashes(&include.path));
            }
            for define in &group.defines {
                push_unique(&mut target.compile_definitions, define.define.clone());
            }
            for fragment in &group.compile_command_fragments {
                push_unique(&mut target.compile_options, fragment.fragment.trim().to_string());
            }
        }

        target.outputs = file
            .artifacts
            .iter()
            .map(|a| self.artifact(&a.path, &evidence))
            .collect();
        target.sources.push(evidence);
        target
    }

    fn artifact(&self, path: &str, evidence: &SourceRef) -> Artifact {
        let checksum = if self.options.hash_artifacts {
            let on_disk = self.build_dir.join(path);
            match std::fs::read(&on_disk) {
                Ok(bytes) => Some(Checksum::new("SHA-256", format!("{:x}", Sha256::digest(&bytes)))),
                Err(e) => {
                    tracing::debug!("not hashing {}: {e}", on_disk.display());
                    None
                }
            }
        } else {
            None
        };

        Artifact {
            path: normalize_slashes(path),
            checksum,
            sources: vec![evidence.clone()],
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !value.is_empty() && !values.contains(&value) {
        values.push(value);
    }
}

/// Lexicographically last `index-*.json`, which is the newest reply.
fn find_index(reply_dir: &Path) -> Result<PathBuf> {
    let entries =
        std::fs::read_dir(reply_dir).map_err(|e| LinkSbomError::io(reply_dir, e))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("index-") && n.ends_with(".json"))
        })
        .collect();
    candidates.sort();

    candidates.pop().ok_or_else(|| {
        LinkSbomError::ingest(
            "looking for the reply index",
            IngestErrorKind::MissingIndex(reply_dir.display().to_string()),
        )
    })
}

fn load_toolchains(reply_dir: &Path, index: &ReplyIndex) -> Result<HashMap<String, String>> {
    let Some(object) = index.objects.iter().find(|o| o.kind == "toolchains") else {
        return Ok(HashMap::new());
    };
    let file: ToolchainsFile = read_json(&reply_dir.join(&object.json_file))?;

    Ok(file
        .toolchains
        .into_iter()
        .filter_map(|t| {
            let id = t.compiler.id?;
            let label = match t.compiler.version {
                Some(version) => format!("{id}-{version}"),
                None => id,
            };
            Some((t.language, label))
        })
        .collect())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| LinkSbomError::io(path, e))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

// ============================================================================
// File API JSON structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyIndex {
    #[serde(default)]
    cmake: CMakeInfo,
    objects: Vec<ObjectRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CMakeInfo {
    version: CMakeVersion,
    generator: Generator,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CMakeVersion {
    string: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Generator {
    name: Option<String>,
    platform: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectRef {
    kind: String,
    version: ObjectVersion,
    json_file: String,
}

#[derive(Debug, Deserialize)]
struct ObjectVersion {
    major: u32,
}

#[derive(Debug, Deserialize)]
struct Codemodel {
    #[serde(default)]
    paths: CodemodelPaths,
    configurations: Vec<Configuration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CodemodelPaths {
    source: String,
    build: String,
}

#[derive(Debug, Deserialize)]
struct Configuration {
    name: String,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    targets: Vec<TargetRef>,
}

#[derive(Debug, Deserialize)]
struct Project {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetRef {
    #[serde(default)]
    project_index: usize,
    json_file: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetFile {
    name: String,
    id: String,
    #[serde(rename = "type")]
    target_type: String,
    #[serde(default)]
    artifacts: Vec<PathEntry>,
    #[serde(default)]
    compile_groups: Vec<CompileGroup>,
    #[serde(default)]
    dependencies: Vec<TargetDependency>,
    link: Option<LinkInfo>,
}

impl TargetFile {
    /// Link fragments in the `libraries` role, then any legacy `libraries` list.
    fn link_fragments(&self) -> impl Iterator<Item = &str> {
        self.link.iter().flat_map(|link| {
            link.command_fragments
                .iter()
                .filter(|f| f.role.as_deref() == Some(LIBRARIES_ROLE))
                .map(|f| f.fragment.as_str())
                .chain(link.libraries.iter().map(String::as_str))
        })
    }

    fn language(&self) -> Option<&str> {
        self.link
            .as_ref()
            .and_then(|l| l.language.as_deref())
            .or_else(|| self.compile_groups.iter().find_map(|g| g.language.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct PathEntry {
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompileGroup {
    language: Option<String>,
    #[serde(default)]
    includes: Vec<PathEntry>,
    #[serde(default)]
    defines: Vec<Define>,
    #[serde(default)]
    compile_command_fragments: Vec<Fragment>,
}

#[derive(Debug, Deserialize)]
struct Define {
    define: String,
}

#[derive(Debug, Deserialize)]
struct Fragment {
    fragment: String,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TargetDependency {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkInfo {
    language: Option<String>,
    #[serde(default)]
    command_fragments: Vec<Fragment>,
    #[serde(default)]
    libraries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ToolchainsFile {
    #[serde(default)]
    toolchains: Vec<Toolchain>,
}

#[derive(Debug, Deserialize)]
struct Toolchain {
    language: String,
    #[serde(default)]
    compiler: Compiler,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Compiler {
    id: Option<String>,
    version: Option<String>,
}
