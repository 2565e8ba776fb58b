//! Pure name and path helpers used by the renamer.

use std::path::{Path, PathBuf};

/// Roots that are refused outright, including anything below them.
pub const PROTECTED_TREES: [&str; 10] = [
    "/bin", "/boot", "/dev", "/etc", "/lib", "/lib64", "/proc", "/sbin", "/sys", "/usr",
];

/// Locations refused only on an exact match; their subdirectories are fine.
pub const PROTECTED_ROOTS: [&str; 10] = [
    "/", "/root", "/var", "/opt", "/srv", "/tmp", "/run", "/mnt", "/media", "/home",
];

/// Returns a user-safe, trimmed path string that can be used in logs and messages.
pub fn sanitize_user_path(path: &Path) -> String {
    path.display().to_string().trim().to_string()
}

/// Returns a canonical path where possible, the input otherwise.
pub fn canonical_or_relaxed(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Removes every occurrence of each substring, in order, repeating the whole
/// sequence until the name stops changing.
///
/// The repeat matters for inputs like `"aabb"` with `"ab"`: one pass leaves
/// `"ab"` behind. After this returns, none of `substrings` occurs in the
/// result. Empty substrings are ignored.
pub fn remove_substrings<S: AsRef<str>>(name: &str, substrings: &[S], ignore_case: bool) -> String {
    let mut current = name.to_string();
    loop {
        let mut next = current.clone();
        for substring in substrings {
            let substring = substring.as_ref();
            if substring.is_empty() {
                continue;
            }
            next = if ignore_case {
                remove_ignoring_ascii_case(&next, substring)
            } else {
                next.replace(substring, "")
            };
        }
        if next == current {
            return next;
        }
        current = next;
    }
}

// Matches can only start on a char boundary: non-ASCII bytes compare exactly
// and a complete needle never begins with a continuation byte.
fn remove_ignoring_ascii_case(haystack: &str, needle: &str) -> String {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    let mut out = Vec::with_capacity(hay.len());
    let mut i = 0;
    while i < hay.len() {
        if hay.len() - i >= pat.len() && hay[i..i + pat.len()].eq_ignore_ascii_case(pat) {
            i += pat.len();
        } else {
            out.push(hay[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// A usable entry name: not empty and not made only of dots and whitespace.
pub fn is_valid_name(name: &str) -> bool {
    name.chars().any(|c| c != '.' && !c.is_whitespace())
}

/// Normalizes `--ext` values to lowercase without a leading dot. Empty
/// values are dropped.
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// True when `name` ends with one of the normalized `extensions`, or when no
/// filter is set. Multi-part extensions such as `tar.gz` work.
pub fn matches_extension(name: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let lower = name.to_ascii_lowercase();
    extensions.iter().any(|ext| {
        lower.len() > ext.len() + 1
            && lower.ends_with(ext.as_str())
            && lower.as_bytes()[lower.len() - ext.len() - 1] == b'.'
    })
}

/// Drops repeated substrings, keeping the first occurrence so the caller's
/// order is preserved.
pub fn dedup_preserving_order(substrings: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(substrings.len());
    for substring in substrings {
        if !seen.contains(&substring) {
            seen.push(substring);
        }
    }
    seen
}

/// Whether `path` (already absolute) is a system location or the home root.
pub fn is_protected_directory(path: &Path, home: Option<&Path>) -> bool {
    if PROTECTED_ROOTS.iter().any(|root| path == Path::new(root)) {
        return true;
    }
    if PROTECTED_TREES
        .iter()
        .any(|tree| path.starts_with(Path::new(tree)))
    {
        return true;
    }
    home.is_some_and(|home| path == home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_in_caller_order() {
        assert_eq!(remove_substrings("test_1_report.txt", &["test_1", "_"], false), "report.txt");
    }

    #[test]
    fn order_changes_outcome_for_overlapping_substrings() {
        assert_eq!(remove_substrings("abc", &["ab", "bc"], false), "c");
        assert_eq!(remove_substrings("abc", &["bc", "ab"], false), "a");
    }

    #[test]
    fn removal_reaches_fixed_point() {
        assert_eq!(remove_substrings("aabb.txt", &["ab"], false), ".txt");
        // Removing "_" creates a new "ab", which is then removed too.
        assert_eq!(remove_substrings("a_b-x", &["ab", "_"], false), "-x");
    }

    #[test]
    fn untouched_when_nothing_matches() {
        assert_eq!(remove_substrings("notes.md", &["draft", "_old"], false), "notes.md");
    }

    #[test]
    fn empty_substring_is_ignored() {
        assert_eq!(remove_substrings("keep.md", &["", "x"], false), "keep.md");
        assert_eq!(remove_substrings("a_x.md", &["", "_x"], false), "a.md");
    }

    #[test]
    fn ignore_case_keeps_remaining_case() {
        assert_eq!(remove_substrings("Photo_DRAFT_Final.JPG", &["_draft"], true), "Photo_Final.JPG");
        assert_eq!(remove_substrings("Photo_DRAFT_Final.JPG", &["_draft"], false), "Photo_DRAFT_Final.JPG");
    }

    #[test]
    fn ignore_case_preserves_non_ascii() {
        assert_eq!(remove_substrings("Čaj_OLD_ñ.txt", &["_old"], true), "Čaj_ñ.txt");
        assert_eq!(remove_substrings("ÉtéÉTÉ", &["été"], true), "ÉtéÉTÉ");
    }

    #[test]
    fn name_validity() {
        assert!(is_valid_name("report.txt"));
        assert!(is_valid_name(".hidden"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name(" . "));
        assert!(!is_valid_name("   "));
    }

    #[test]
    fn extension_filter() {
        let exts = normalize_extensions(&[".TXT", "tar.gz", "  ", "pdf"]);
        assert_eq!(exts, vec!["txt", "tar.gz", "pdf"]);
        assert!(matches_extension("a_old.txt", &exts));
        assert!(matches_extension("backup_old.TAR.GZ", &exts));
        assert!(!matches_extension("a_old.md", &exts));
        assert!(!matches_extension("txt", &exts));
        assert!(!matches_extension("notatxt", &exts));
        assert!(matches_extension("anything", &[]));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let out = dedup_preserving_order(vec!["_b".into(), "_a".into(), "_b".into()]);
        assert_eq!(out, vec!["_b", "_a"]);
    }

    #[test]
    fn protected_directories() {
        let home = Path::new("/home/alice");
        assert!(is_protected_directory(Path::new("/"), Some(home)));
        assert!(is_protected_directory(Path::new("/usr/share/doc"), Some(home)));
        assert!(is_protected_directory(Path::new("/etc"), Some(home)));
        assert!(is_protected_directory(Path::new("/tmp"), Some(home)));
        assert!(is_protected_directory(home, Some(home)));
        assert!(!is_protected_directory(Path::new("/tmp/work"), Some(home)));
        assert!(!is_protected_directory(Path::new("/home/alice/photos"), Some(home)));
        assert!(!is_protected_directory(Path::new("/var/folders/x"), None));
        assert!(!is_protected_directory(Path::new("/usrdata"), None));
    }
}
