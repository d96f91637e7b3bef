//! Identity resolution and graph normalization.
//!
//! - [`component_from_link_token`] turns a raw linker token into a candidate component
//! - [`merge_component`] folds duplicate observations together
//! - [`normalize_graph`] resolves raw edges and re-keys the component table
//! - [`normalize_build_variants`] collapses debug/release duplicates
//!
//! Both graph passes share the re-keying step in [`rekey`].

mod graph;
mod merge;
pub mod rekey;
mod token;
mod variant;

pub use graph::normalize_graph;
pub use merge::{merge_component, union_sources};
pub use rekey::{RekeyStats, rekey_components};
pub use token::{
    IMPORTED_TARGET_PROPERTY, IMPORTED_TARGET_SYSTEM, LINK_TOKEN_SYSTEM, NormalizeOptions,
    component_from_link_token, is_dependency_token, normalize_path, normalize_token,
};
pub use variant::{
    VARIANT_EVIDENCE_PROPERTY, VARIANT_ORIGINAL_NAME_PROPERTY, VARIANT_PROPERTY,
    VariantNormalizeOptions, normalize_build_variants, prop_append,
};
