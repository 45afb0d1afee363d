//! Stem/extension handling for literal file names.

/// Split a file name into `(stem, extension)`.
///
/// The extension starts at the last dot and keeps it. A dot at the very
/// start of the name never begins an extension, so `.bashrc` has none while
/// `archive.tar.gz` splits into `archive.tar` and `.gz`.
pub fn split_name_ext(name: &str) -> (&str, &str) {
    if name.starts_with('.') && name.matches('.').count() == 1 {
        return (name, "");
    }
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Append ` <counter>` to the stem of `name`, keeping its extension.
pub fn with_counter_suffix(name: &str, counter: u32, pad: usize) -> String {
    let (stem, ext) = split_name_ext(name);
    format!("{stem} {}{ext}", pad_counter(counter, pad))
}

/// Zero-pad `counter` to `pad` digits.
pub fn pad_counter(counter: u32, pad: usize) -> String {
    format!("{counter:0pad$}")
}

/// Whether `name` can be used as a single path component.
pub fn is_usable_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compound_extension() {
        assert_eq!(split_name_ext("archive.tar.gz"), ("archive.tar", ".gz"));
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        assert_eq!(split_name_ext(".bashrc"), (".bashrc", ""));
    }

    #[test]
    fn test_dotfile_with_extension() {
        assert_eq!(split_name_ext(".env.local"), (".env", ".local"));
    }

    #[test]
    fn test_no_dot() {
        assert_eq!(split_name_ext("Makefile"), ("Makefile", ""));
    }

    #[test]
    fn test_trailing_dot() {
        assert_eq!(split_name_ext("notes."), ("notes", "."));
    }

    #[test]
    fn test_counter_suffix() {
        assert_eq!(with_counter_suffix("b.txt", 2, 2), "b 02.txt");
        assert_eq!(with_counter_suffix("README", 3, 3), "README 003");
        assert_eq!(with_counter_suffix("a.tar.gz", 12, 1), "a.tar 12.gz");
    }

    #[test]
    fn test_usable_names() {
        assert!(is_usable_name("a.txt"));
        assert!(!is_usable_name(""));
        assert!(!is_usable_name("."));
        assert!(!is_usable_name(".."));
        assert!(!is_usable_name("dir/a.txt"));
    }

    proptest! {
        #[test]
        fn split_reassembles(name in "[a-zA-Z0-9._ -]{0,24}") {
            let (stem, ext) = split_name_ext(&name);
            prop_assert_eq!(format!("{stem}{ext}"), name.clone());
            prop_assert!(ext.is_empty() || ext.starts_with('.'));
            prop_assert!(!ext[ext.len().min(1)..].contains('.'));
        }
    }
}
