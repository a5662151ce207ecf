//! Deterministic name derivation.
//!
//! Every physical name is a snake-case concatenation of names taken from the
//! input definitions, so separate processes compiling the same input agree on
//! the schema without coordination.

use heck::ToSnakeCase;

pub(crate) fn snake(src: &str) -> String {
    src.to_snake_case()
}

/// Join table for a relational attribute: `<owner table>_<attribute>_links`.
pub(crate) fn join_table(table_name: &str, attribute_name: &str) -> String {
    snake(&format!("{table_name}_{attribute_name}_links"))
}

/// Join table for a morph-to-many attribute: `<owner table>_<attribute>_morphs`.
pub(crate) fn morph_table(table_name: &str, attribute_name: &str) -> String {
    snake(&format!("{table_name}_{attribute_name}_morphs"))
}

/// Shared component link table: `<owner table>_components`.
pub(crate) fn link_table(table_name: &str) -> String {
    format!("{table_name}_components")
}

pub(crate) fn join_column(singular_name: &str) -> String {
    snake(&format!("{singular_name}_id"))
}

pub(crate) fn order_column(singular_name: &str) -> String {
    snake(&format!("{singular_name}_order"))
}

/// Disambiguates the inverse column of a self-referencing relation: when the
/// inverse name collides with the owner-side name, it gains an `inv_` prefix.
pub(crate) fn disambiguate_inverse(name: &str, inverse: String) -> String {
    if name == inverse {
        format!("inv_{inverse}")
    } else {
        inverse
    }
}
