//! URI ↔ filesystem path conversion for the LSP boundary.
//!
//! The LSP wire format addresses documents by `file://` URI; the store
//! and query layer address them by canonical filesystem path. This
//! crate is the narrow translation between the two, including
//! percent-encoding and Windows drive-letter handling.
//!
//! # Platform Support
//!
//! Most functions are not available on `wasm32` targets since they require
//! filesystem access.
//!
//! # Examples
//!
//! ```
//! # #[cfg(not(target_arch = "wasm32"))]
//! # fn main() {
//! use clangxref_uri::{uri_to_fs_path, fs_path_to_uri};
//!
//! // Convert a URI to a path
//! let path = uri_to_fs_path("file:///tmp/test.c");
//! assert!(path.is_some());
//!
//! // Convert a path to a URI
//! let uri = fs_path_to_uri("/tmp/test.c");
//! assert!(uri.is_ok());
//! # }
//! # #[cfg(target_arch = "wasm32")]
//! # fn main() {}
//! ```

use url::Url;

/// Convert a `file://` URI to a filesystem path.
///
/// Properly handles percent-encoding and works with spaces, Windows paths,
/// and non-ASCII characters. Returns `None` if the URI is not a valid `file://` URI.
///
/// # Examples
///
/// ```
/// # #[cfg(not(target_arch = "wasm32"))]
/// # fn main() {
/// use clangxref_uri::uri_to_fs_path;
///
/// // Basic file URI
/// let path = uri_to_fs_path("file:///tmp/test.c");
/// assert!(path.is_some());
///
/// // URI with percent-encoded spaces
/// let path = uri_to_fs_path("file:///tmp/path%20with%20spaces/test.c");
/// assert!(path.is_some());
///
/// // Non-file URIs return None
/// let path = uri_to_fs_path("https://example.com");
/// assert!(path.is_none());
/// # }
/// # #[cfg(target_arch = "wasm32")]
/// # fn main() {}
/// ```
///
/// # Platform Support
///
/// This function is not available on `wasm32` targets (no filesystem).
#[cfg(not(target_arch = "wasm32"))]
pub fn uri_to_fs_path(uri: &str) -> Option<std::path::PathBuf> {
    // Parse the URI
    let url = Url::parse(uri).ok()?;

    // Only handle file:// URIs
    if url.scheme() != "file" {
        return None;
    }

    // Convert to filesystem path using the url crate's built-in method
    url.to_file_path().ok()
}

/// Convert a filesystem path to a `file://` URI.
///
/// Properly handles percent-encoding and works with spaces, Windows paths,
/// and non-ASCII characters.
///
/// # Examples
///
/// ```
/// # #[cfg(not(target_arch = "wasm32"))]
/// # fn main() {
/// use clangxref_uri::fs_path_to_uri;
///
/// // Absolute path
/// let uri = fs_path_to_uri("/tmp/test.c").unwrap();
/// assert!(uri.starts_with("file:///"));
///
/// // Path with spaces gets percent-encoded
/// let uri = fs_path_to_uri("/tmp/path with spaces/test.c").unwrap();
/// assert!(uri.contains("%20"));
/// # }
/// # #[cfg(target_arch = "wasm32")]
/// # fn main() {}
/// ```
///
/// # Errors
///
/// Returns an error if the path cannot be converted to an absolute path
/// or if the conversion to a URI fails.
///
/// # Platform Support
///
/// This function is not available on `wasm32` targets (no filesystem).
#[cfg(not(target_arch = "wasm32"))]
pub fn fs_path_to_uri<P: AsRef<std::path::Path>>(path: P) -> Result<String, String> {
    let path = path.as_ref();

    // Convert to absolute path if relative
    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| format!("Failed to get current directory: {}", e))?
            .join(path)
    };

    // Use the url crate's built-in method to create a proper file:// URI
    Url::from_file_path(&abs_path)
        .map(|url| url.to_string())
        .map_err(|_| format!("Failed to convert path to URI: {}", abs_path.display()))
}

/// Normalize a URI to a consistent key for lookups.
///
/// This function handles platform-specific differences to ensure consistent
/// lookups across different systems, particularly for Windows drive letters.
///
/// # Windows Drive Letter Normalization
///
/// On Windows, drive letters in URIs may be uppercase or lowercase.
/// This function normalizes them to lowercase for consistent lookups:
/// - `file:///C:/foo` → `file:///c:/foo`
/// - `file:///D:/bar` → `file:///d:/bar`
///
/// # Examples
///
/// ```
/// use clangxref_uri::uri_key;
///
/// // Standard URI
/// let key = uri_key("file:///tmp/test.c");
/// assert_eq!(key, "file:///tmp/test.c");
///
/// // Windows URI with uppercase drive
/// let key = uri_key("file:///C:/Users/test.c");
/// assert_eq!(key, "file:///c:/Users/test.c");
///
/// // Invalid URI returned as-is
/// let key = uri_key("not-a-uri");
/// assert_eq!(key, "not-a-uri");
/// ```
pub fn uri_key(uri: &str) -> String {
    if let Ok(u) = Url::parse(uri) {
        let s = u.as_str().to_string();
        if let Some(rest) = s.strip_prefix("file:///") {
            // Check for Windows drive letter pattern: single letter followed by colon
            if rest.len() > 1
                && rest.as_bytes()[1] == b':'
                && rest.as_bytes()[0].is_ascii_alphabetic()
            {
                // Normalize drive letter to lowercase
                return format!("file:///{}{}", rest[0..1].to_ascii_lowercase(), &rest[1..]);
            }
        }
        s
    } else {
        uri.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_key_basic() {
        assert_eq!(uri_key("file:///tmp/test.c"), "file:///tmp/test.c");
    }

    #[test]
    fn test_uri_key_windows_drive() {
        assert_eq!(uri_key("file:///C:/Users/test.c"), "file:///c:/Users/test.c");
        assert_eq!(uri_key("file:///D:/foo/bar.h"), "file:///d:/foo/bar.h");
    }

    #[test]
    fn test_uri_key_invalid() {
        assert_eq!(uri_key("not-a-uri"), "not-a-uri");
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod filesystem_tests {
        use super::*;

        #[test]
        fn test_uri_to_fs_path_basic() {
            let path = uri_to_fs_path("file:///tmp/test.c");
            assert!(path.is_some());
            let path = path.unwrap();
            assert!(path.ends_with("test.c"));
        }

        #[test]
        fn test_uri_to_fs_path_non_file() {
            assert!(uri_to_fs_path("https://example.com").is_none());
            assert!(uri_to_fs_path("untitled:Untitled-1").is_none());
        }

        #[test]
        fn test_uri_to_fs_path_with_spaces() {
            let path = uri_to_fs_path("file:///tmp/path%20with%20spaces/test.c");
            assert!(path.is_some());
            let path = path.unwrap();
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("path with spaces"));
        }

        #[test]
        fn test_fs_path_to_uri_basic() {
            let uri = fs_path_to_uri("/tmp/test.c").unwrap();
            assert!(uri.starts_with("file:///"));
            assert!(uri.contains("test.c"));
        }

        #[test]
        fn test_fs_path_to_uri_with_spaces() {
            let uri = fs_path_to_uri("/tmp/path with spaces/test.c").unwrap();
            assert!(uri.contains("%20") || uri.contains("path with spaces"));
        }

        #[test]
        fn test_roundtrip() {
            let original = "/tmp/roundtrip-test.c";
            let uri = fs_path_to_uri(original).unwrap();
            let path = uri_to_fs_path(&uri).unwrap();
            assert!(path.ends_with("roundtrip-test.c"));
        }
    }
}
