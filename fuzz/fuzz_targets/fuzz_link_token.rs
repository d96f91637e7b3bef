#![no_main]
use libfuzzer_sys::fuzz_target;
use linksbom::normalize::{NormalizeOptions, component_from_link_token, is_dependency_token};

/// Fuzz the link-token normalizer.
///
/// Any string must yield a component whose id matches its fields.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = is_dependency_token(s);
        let c = component_from_link_token(s, &NormalizeOptions::default());
        assert_eq!(c.id, linksbom::model::component_id_of(&c));
    }
});
