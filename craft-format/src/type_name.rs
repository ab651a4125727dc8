//! Readable type names.
//!
//! [`std::any::type_name`] spells out full paths
//! (`alloc::vec::Vec<alloc::string::String>`); these helpers keep only the
//! last path segment of every name, generics included.
//!
//! ```rust
//! use craft_format::type_name_of;
//!
//! assert_eq!(type_name_of(&vec![String::new()]), "Vec<String>");
//! assert_eq!(type_name_of(&42_i64), "i64");
//! ```

/// Short type name of the referenced value.
pub fn type_name_of<T: ?Sized>(_value: &T) -> String {
    clean_type_name(std::any::type_name::<T>())
}

/// Strip module paths from a type name as printed by the compiler.
pub fn clean_type_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // Where the path currently being copied started in `out`.
    let mut segment_start = 0;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if ch.is_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push(ch);
            segment_start = out.len();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_untouched() {
        assert_eq!(type_name_of(&true), "bool");
        assert_eq!(type_name_of(&1.5_f64), "f64");
        assert_eq!(type_name_of("text"), "str");
        assert_eq!(type_name_of(&"text"), "&str");
    }

    #[test]
    fn paths_are_stripped_inside_generics() {
        let nested: Vec<Option<String>> = Vec::new();
        assert_eq!(type_name_of(&nested), "Vec<Option<String>>");
        assert_eq!(type_name_of(&Some(String::new())), "Option<String>");
    }

    #[test]
    fn cleans_raw_names() {
        assert_eq!(
            clean_type_name("core::result::Result<(), alloc::string::String>"),
            "Result<(), String>"
        );
        assert_eq!(clean_type_name("&dyn core::fmt::Debug"), "&dyn Debug");
        assert_eq!(clean_type_name("[std::path::PathBuf; 2]"), "[PathBuf; 2]");
    }
}
