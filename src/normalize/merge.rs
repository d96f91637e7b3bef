//! Field-precedence merge of two observations of the same component.

use crate::model::{Checksum, Component, Precedence, SourceRef};

/// Fold `incoming` into `dst` without ever overwriting a set value.
///
/// Optional scalars are first-write-wins, type and origin only move up from
/// unknown, evidence and checksums are unioned, properties keep the existing
/// value for a key. The caller decides which observation is `dst`; the graph
/// passes always merge in ascending key order.
pub fn merge_component(dst: &mut Component, incoming: &Component) {
    if dst.name.is_empty() && !incoming.name.is_empty() {
        dst.name.clone_from(&incoming.name);
    }

    fill(&mut dst.namespace, &incoming.namespace);
    fill(&mut dst.version, &incoming.version);
    fill(&mut dst.purl, &incoming.purl);
    fill(&mut dst.cpe, &incoming.cpe);
    fill(&mut dst.description, &incoming.description);
    fill(&mut dst.homepage, &incoming.homepage);
    fill(&mut dst.supplier, &incoming.supplier);
    fill(&mut dst.license.spdx_id, &incoming.license.spdx_id);
    fill(&mut dst.license.expression, &incoming.license.expression);
    fill(&mut dst.linkage, &incoming.linkage);

    dst.component_type.refine_from(&incoming.component_type);
    dst.origin.refine_from(&incoming.origin);

    union_sources(&mut dst.license.sources, &incoming.license.sources);
    union_sources(&mut dst.sources, &incoming.sources);
    union_checksums(&mut dst.checksums, &incoming.checksums);

    for (key, value) in &incoming.properties {
        dst.properties
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

fn fill<T: Clone>(dst: &mut Option<T>, incoming: &Option<T>) {
    if dst.is_none() {
        dst.clone_from(incoming);
    }
}

/// Append evidence not already present (same system, reference and line).
pub fn union_sources(dst: &mut Vec<SourceRef>, incoming: &[SourceRef]) {
    for source in incoming {
        if !dst.contains(source) {
            dst.push(source.clone());
        }
    }
}

fn union_checksums(dst: &mut Vec<Checksum>, incoming: &[Checksum]) {
    for checksum in incoming {
        if !dst.contains(checksum) {
            dst.push(checksum.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentOrigin, ComponentType, Linkage};

    #[test]
    fn test_scalars_are_first_write_wins() {
        let mut dst = Component::new("zlib", ComponentType::Library).with_version("1.3");
        let mut incoming = Component::new("zlib", ComponentType::Library).with_version("1.2");
        incoming.supplier = Some("zlib project".to_string());
        incoming.linkage = Some(Linkage::Shared);

        merge_component(&mut dst, &incoming);

        assert_eq!(dst.version.as_deref(), Some("1.3"));
        assert_eq!(dst.supplier.as_deref(), Some("zlib project"));
        assert_eq!(dst.linkage, Some(Linkage::Shared));
    }

    #[test]
    fn test_empty_name_is_filled() {
        let mut dst = Component::default();
        merge_component(&mut dst, &Component::new("png", ComponentType::Library));
        assert_eq!(dst.name, "png");
    }

    #[test]
    fn test_type_and_origin_refine_from_unknown_only() {
        let mut dst = Component::new("ssl", ComponentType::Unknown);
        let incoming = Component::new("ssl", ComponentType::Library)
            .with_origin(ComponentOrigin::ThirdParty);
        merge_component(&mut dst, &incoming);
        assert_eq!(dst.component_type, ComponentType::Library);
        assert_eq!(dst.origin, ComponentOrigin::ThirdParty);

        let other = Component::new("ssl", ComponentType::Executable)
            .with_origin(ComponentOrigin::System);
        merge_component(&mut dst, &other);
        assert_eq!(dst.component_type, ComponentType::Library);
        assert_eq!(dst.origin, ComponentOrigin::ThirdParty);
    }

    #[test]
    fn test_sources_and_checksums_union() {
        let mut dst = Component::new("fmt", ComponentType::Library)
            .with_source(SourceRef::new("link-token", "-lfmt"));
        dst.checksums.push(Checksum::new("SHA-256", "aa"));

        let mut incoming = Component::new("fmt", ComponentType::Library)
            .with_source(SourceRef::new("link-token", "-lfmt"))
            .with_source(SourceRef::new("link-token", "-lfmt").with_line(3))
            .with_source(SourceRef::new("vcpkg", "fmt:x64-windows"));
        incoming.checksums.push(Checksum::new("SHA-256", "aa"));
        incoming.checksums.push(Checksum::new("SHA-256", "bb"));

        merge_component(&mut dst, &incoming);

        assert_eq!(dst.sources.len(), 3);
        assert_eq!(dst.checksums.len(), 2);
    }

    #[test]
    fn test_properties_keep_existing_values() {
        let mut dst = Component::new("fmt", ComponentType::Library);
        dst.properties.insert("a".to_string(), "1".to_string());
        let mut incoming = dst.clone();
        incoming.properties.insert("a".to_string(), "2".to_string());
        incoming.properties.insert("b".to_string(), "3".to_string());

        merge_component(&mut dst, &incoming);

        assert_eq!(dst.properties.get("a").map(String::as_str), Some("1"));
        assert_eq!(dst.properties.get("b").map(String::as_str), Some("3"));
        assert_eq!(dst.properties.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_merge_with_self_is_noop() {
        let mut c = Component::new("fmt", ComponentType::Library)
            .with_version("10")
            .with_source(SourceRef::new("link-token", "-lfmt"));
        c.properties.insert("k".to_string(), "v".to_string());
        let before = c.clone();
        merge_component(&mut c, &before);
        assert_eq!(c, before);
    }
}
