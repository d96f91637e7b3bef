//! Pipeline and CLI integration tests.
//!
//! These tests run the full ingest → normalize → classify → enrich → write
//! pipeline over a CMake File API reply directory built in a temp dir.

use linksbom::classify::Platform;
use linksbom::cli::{ScanConfig, exit_code_for, run_scan};
use linksbom::config::{AppConfig, CliOverrides};
use linksbom::pipeline::{PipelineError, exit_codes, render_sbom, run_pipeline};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

fn write(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// A two-configuration build: `app` links `core`, OpenSSL and zlib, and
/// `core` links pthread. The Debug build pulls in fmt's debug library.
fn cmake_build() -> TempDir {
    let build = TempDir::new().unwrap();
    let reply = build.path().join(".cmake").join("api").join("v1").join("reply");
    fs::create_dir_all(&reply).unwrap();

    write(&reply, "index-2024-06-01T00-00-00-0000.json", &json!({
        "cmake": {
            "version": {"string": "3.28.1"},
            "generator": {"name": "Ninja Multi-Config", "platform": "x64"}
        },
        "objects": [
            {"kind": "codemodel", "version": {"major": 2, "minor": 6}, "jsonFile": "codemodel-v2.json"},
            {"kind": "toolchains", "version": {"major": 1, "minor": 0}, "jsonFile": "toolchains-v1.json"}
        ]
    }));
    write(&reply, "toolchains-v1.json", &json!({
        "toolchains": [{"language": "CXX", "compiler": {"id": "GNU", "version": "13.2.0"}}]
    }));

    let mut configurations = Vec::new();
    for config in ["Debug", "Release"] {
        configurations.push(json!({
            "name": config,
            "projects": [{"name": "demo"}],
            "targets": [
                {"name": "app", "id": format!("app::@{config}"), "projectIndex": 0,
                 "jsonFile": format!("target-app-{config}.json")},
                {"name": "core", "id": format!("core::@{config}"), "projectIndex": 0,
                 "jsonFile": format!("target-core-{config}.json")}
            ]
        }));

        let fmt = if config == "Debug" {
            "/opt/vcpkg/installed/x64-linux/debug/lib/fmtd.lib"
        } else {
            "/opt/vcpkg/installed/x64-linux/lib/fmt.lib"
        };
        write(&reply, &format!("target-app-{config}.json"), &json!({
            "name": "app", "id": format!("app::@{config}"), "type": "EXECUTABLE",
            "artifacts": [{"path": "bin/app"}],
            "compileGroups": [{"language": "CXX"}],
            "dependencies": [{"id": format!("core::@{config}")}],
            "link": {
                "language": "CXX",
                "commandFragments": [
                    {"fragment": "-O2", "role": "flags"},
                    {"fragment": "libcore.a", "role": "libraries"},
                    {"fragment": "-lssl", "role": "libraries"},
                    {"fragment": "OpenSSL::Crypto", "role": "libraries"},
                    {"fragment": "/usr/lib/x86_64-linux-gnu/libz.so", "role": "libraries"},
                    {"fragment": fmt, "role": "libraries"}
                ]
            }
        }));
        write(&reply, &format!("target-core-{config}.json"), &json!({
            "name": "core", "id": format!("core::@{config}"), "type": "STATIC_LIBRARY",
            "artifacts": [{"path": "libcore.a"}],
            "link": {"libraries": ["-lpthread"]}
        }));
    }

    write(&reply, "codemodel-v2.json", &json!({
        "paths": {"source": "/src/demo", "build": "/src/demo/build"},
        "configurations": configurations
    }));

    build
}

fn linux_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.classify.platform = Some(Platform::Linux);
    config
}

fn component_names(doc: &Value) -> Vec<String> {
    let mut names: Vec<String> = doc["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

fn find_component<'a>(doc: &'a Value, name: &str) -> &'a Value {
    doc["components"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .unwrap_or_else(|| panic!("component {name} missing"))
}

fn property<'a>(component: &'a Value, name: &str) -> Option<&'a str> {
    component["properties"]
        .as_array()?
        .iter()
        .find(|p| p["name"] == name)
        .and_then(|p| p["value"].as_str())
}

// ============================================================================
// Full pipeline
// ============================================================================

mod full_pipeline {
    use super::*;

    #[test]
    fn default_scan_keeps_third_party_and_unknown() {
        let build = cmake_build();
        let output = run_pipeline(build.path(), &linux_config()).unwrap();
        let doc: Value =
            serde_json::from_str(&render_sbom(&output.graph, &output.overlay, true).unwrap())
                .unwrap();

        assert_eq!(doc["bomFormat"], "CycloneDX");
        assert_eq!(
            component_names(&doc),
            vec!["OpenSSL::Crypto", "fmt", "ssl", "z"]
        );
        assert_eq!(output.report.filtered.components_removed, 2);
        assert!(output.graph.consistency_violations().is_empty());
    }

    #[test]
    fn debug_variant_collapses_into_release() {
        let build = cmake_build();
        let output = run_pipeline(build.path(), &linux_config()).unwrap();
        let doc: Value =
            serde_json::from_str(&render_sbom(&output.graph, &output.overlay, true).unwrap())
                .unwrap();

        let fmt = find_component(&doc, "fmt");
        assert_eq!(property(fmt, "linksbom:variant"), Some("debug"));
        assert_eq!(
            property(fmt, "linksbom:variant.evidence"),
            Some("path:/debug/;msvc-suffix-d")
        );
        assert_eq!(property(fmt, "linksbom:variant.original-name"), Some("fmtd"));
        assert_eq!(output.report.variants.merged, 1);

        let fmt_id = output.graph.find_component_by_name("fmt").unwrap().id.clone();
        assert_eq!(output.graph.edges_to_component(&fmt_id).len(), 2);
    }

    #[test]
    fn imported_target_is_third_party() {
        let build = cmake_build();
        let output = run_pipeline(build.path(), &linux_config()).unwrap();
        let doc: Value =
            serde_json::from_str(&render_sbom(&output.graph, &output.overlay, true).unwrap())
                .unwrap();

        let crypto = find_component(&doc, "OpenSSL::Crypto");
        assert_eq!(property(crypto, "linksbom:origin"), Some("third-party"));
        assert_eq!(
            property(crypto, "linksbom:imported-target"),
            Some("OpenSSL::Crypto")
        );
    }

    #[test]
    fn include_flags_keep_filtered_origins() {
        let build = cmake_build();
        let mut config = linux_config();
        config.filter.include_system = true;
        config.filter.include_project_local = true;

        let output = run_pipeline(build.path(), &config).unwrap();
        let doc: Value =
            serde_json::from_str(&render_sbom(&output.graph, &output.overlay, true).unwrap())
                .unwrap();

        assert_eq!(
            component_names(&doc),
            vec!["OpenSSL::Crypto", "core", "fmt", "pthread", "ssl", "z"]
        );
        assert_eq!(
            property(find_component(&doc, "pthread"), "linksbom:origin"),
            Some("system")
        );
        assert_eq!(
            property(find_component(&doc, "core"), "linksbom:origin"),
            Some("project-local")
        );
    }

    #[test]
    fn enrichment_aggregates_build_context() {
        let build = cmake_build();
        let mut config = linux_config();
        config.enrichment.enabled = true;

        let output = run_pipeline(build.path(), &config).unwrap();
        assert_eq!(output.overlay.model_fingerprint, output.graph.fingerprint());
        assert!(!output.overlay.overlay_hash.is_empty());

        let doc: Value =
            serde_json::from_str(&render_sbom(&output.graph, &output.overlay, true).unwrap())
                .unwrap();
        let ssl = find_component(&doc, "ssl");
        assert_eq!(
            property(ssl, "linksbom:enrich.build.configurations"),
            Some("Debug,Release")
        );
        assert_eq!(
            property(ssl, "linksbom:enrich.build.toolchains"),
            Some("GNU-13.2.0")
        );
        assert_eq!(property(ssl, "linksbom:enrich.build.platforms"), Some("x64"));
        assert_eq!(
            property(ssl, "linksbom:enrich.build.used_by_targets_count"),
            Some("2")
        );
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let build = cmake_build();
        let mut config = linux_config();
        config.enrichment.enabled = true;

        let first = run_pipeline(build.path(), &config).unwrap();
        let second = run_pipeline(build.path(), &config).unwrap();

        assert_eq!(
            render_sbom(&first.graph, &first.overlay, true).unwrap(),
            render_sbom(&second.graph, &second.overlay, true).unwrap()
        );
    }

    #[test]
    fn missing_reply_is_ingest_failure() {
        let build = TempDir::new().unwrap();
        let err = run_pipeline(build.path(), &linux_config()).unwrap_err();
        assert!(matches!(err, PipelineError::IngestFailed { .. }));
    }
}

// ============================================================================
// CLI handlers
// ============================================================================

mod scan_command {
    use super::*;

    fn scan(build: &Path, out: &Path, overrides: CliOverrides) -> ScanConfig {
        let config_path = build.join("linksbom.yaml");
        fs::write(&config_path, "classify:\n  platform: linux\n").unwrap();
        ScanConfig {
            build_dir: build.to_path_buf(),
            config_path: Some(config_path),
            overrides: CliOverrides {
                output: Some(out.to_path_buf()),
                ..overrides
            },
        }
    }

    #[test]
    fn scan_writes_sbom_file() {
        let build = cmake_build();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("sbom.cdx.json");

        let code = run_scan(&scan(build.path(), &out, CliOverrides::default())).unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.lines().count() > 1);
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(component_names(&doc), vec!["OpenSSL::Crypto", "fmt", "ssl", "z"]);
    }

    #[test]
    fn compact_and_include_system_flags() {
        let build = cmake_build();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("sbom.cdx.json");
        let overrides = CliOverrides {
            include_system: true,
            compact: true,
            ..CliOverrides::default()
        };

        run_scan(&scan(build.path(), &out, overrides)).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert!(component_names(&doc).contains(&"pthread".to_string()));
    }

    #[test]
    fn output_into_directory_is_usage_error() {
        let build = cmake_build();
        let out_dir = TempDir::new().unwrap();

        let err = run_scan(&scan(build.path(), out_dir.path(), CliOverrides::default()))
            .unwrap_err();
        assert_eq!(exit_code_for(&err), exit_codes::USAGE);
    }

    #[test]
    fn non_cmake_directory_exits_with_error_status() {
        let build = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("sbom.cdx.json");

        let err = run_scan(&scan(build.path(), &out, CliOverrides::default())).unwrap_err();
        assert_eq!(exit_code_for(&err), exit_codes::ERROR);
        assert!(!out.exists());
    }
}
