//! Destination paths inside the archive

use super::path;

/// Computes where `source` lands in the archive.
///
/// `destination` is always treated as a directory prefix. With
/// `strip_parent` only the file name of `source` is kept.
pub fn destination_for(source: &str, destination: &str, strip_parent: bool) -> String {
    if strip_parent {
        path::join(destination, path::base_name(source))
    } else {
        path::join(destination, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_is_a_prefix() {
        assert_eq!(
            destination_for("testdata/a/b/c/d.txt", "var/foobar/d.txt", false),
            "var/foobar/d.txt/testdata/a/b/c/d.txt"
        );
    }

    #[test]
    fn test_empty_destination_keeps_source() {
        assert_eq!(
            destination_for("testdata/a/b/a.txt", "", false),
            "testdata/a/b/a.txt"
        );
    }

    #[test]
    fn test_strip_parent() {
        assert_eq!(
            destination_for("testdata/a/b/c/d.txt", "usr/local/test", true),
            "usr/local/test/d.txt"
        );
        assert_eq!(destination_for("testdata/a/b/c/d.txt", "", true), "d.txt");
    }

    #[test]
    fn test_redundant_separators_are_collapsed() {
        assert_eq!(
            destination_for("a/b.txt", "usr//share/", false),
            "usr/share/a/b.txt"
        );
        assert_eq!(destination_for("a/b.txt", "./opt/", true), "opt/b.txt");
    }
}
