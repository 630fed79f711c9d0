//! File names and folders of document URIs.
//!
//! Documents may be identified by `file:` URIs as well as by URIs of any custom scheme (e.g.
//! virtual files generated by a tool). All of them are given the same path semantics.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme and optional authority. Single letter schemes are not accepted so that Windows drive
/// letters (`c:\...`) are not mistaken for a scheme.
static SCHEME_AND_AUTHORITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]+:(//[^/?#]*)?").unwrap());

/// Decoded path component of a URI (or the input itself if it is a plain path).
pub fn path_of(uri: &str) -> String {
    let rest = match SCHEME_AND_AUTHORITY.find(uri) {
        Some(m) => &uri[m.end()..],
        None => uri,
    };
    let path = match rest.find(['?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    };
    percent_decode(path).replace('\\', "/")
}

/// Last segment of the URI path.
pub fn file_name(uri: &str) -> String {
    let path = path_of(uri);
    match path.rsplit_once('/') {
        Some((_, name)) => name.to_string(),
        None => path,
    }
}

/// URI path without its last segment, empty if the path has a single segment.
pub fn folder_path(uri: &str) -> String {
    let path = path_of(uri);
    match path.rsplit_once('/') {
        Some((folder, _)) => folder.to_string(),
        None => String::new(),
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                decoded.push(b);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
