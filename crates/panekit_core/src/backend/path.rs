//! Sub-resource path composition.
//!
//! Pure address arithmetic for the data-access collaborator: deriving a
//! narrower base path from a base and a sub-path with normalized separators.

/// Path separator used in backend addresses.
pub const PATH_SEPARATOR: char = '/';

/// Derives a sub-resource base path from `base` and `sub`.
///
/// An empty `sub` returns `base` unchanged. Otherwise exactly one separator
/// joins the two, regardless of existing leading/trailing separators on
/// either side, and the result ends in a separator.
pub fn derive_sub_resource(base: &str, sub: &str) -> String {
    if sub.is_empty() {
        return base.to_string();
    }
    let base = base.trim_end_matches(PATH_SEPARATOR);
    let sub = sub
        .trim_start_matches(PATH_SEPARATOR)
        .trim_end_matches(PATH_SEPARATOR);
    if sub.is_empty() {
        return format!("{base}{PATH_SEPARATOR}");
    }
    format!("{base}{PATH_SEPARATOR}{sub}{PATH_SEPARATOR}")
}
