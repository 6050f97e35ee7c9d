//! Logical asset path utilities
//!
//! Asset paths are relative to the project root and always use forward
//! slashes (`Assets/Textures/rock.png`).

use std::path::{Component, Path};

/// Normalize a logical asset path
/// - Converts backslashes to forward slashes
/// - Removes redundant separators and leading `/`
/// - Resolves `.` and `..` components
pub fn normalize_asset_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");

    let mut components: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }

    components.join("/")
}

/// Split path into directory and file name
pub fn split_path(path: &str) -> (&str, &str) {
    let path = path.trim_start_matches('/');

    match path.rfind('/') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

/// Parent directory of a logical path, `None` at the top level
pub fn parent_path(path: &str) -> Option<String> {
    let normalized = normalize_asset_path(path);
    normalized.rfind('/').map(|pos| normalized[..pos].to_string())
}

/// Join a relative path onto a base
pub fn join_paths(base: &str, relative: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return normalize_asset_path(relative);
    }
    normalize_asset_path(&format!("{}/{}", base, relative))
}

/// File extension of a path, without the dot
pub fn get_extension(path: &str) -> Option<&str> {
    let (_, name) = split_path(path);

    match name.rfind('.') {
        Some(pos) if pos > 0 && pos < name.len() - 1 => Some(&name[pos + 1..]),
        _ => None,
    }
}

/// Whether any directory segment of `path` equals `segment`
///
/// The file name itself is not considered a segment.
pub fn has_segment(path: &str, segment: &str) -> bool {
    let (dir, _) = split_path(path);
    !dir.is_empty() && dir.split('/').any(|s| s == segment)
}

/// Convert an absolute path under `root` into a logical asset path
pub fn to_logical(root: &Path, absolute: &Path) -> Option<String> {
    let relative = absolute.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Check if a path matches a glob pattern
/// Supports `*` (any run of chars) and `?` (single char)
pub fn glob_match(pattern: &str, path: &str) -> bool {
    wildcard_match(pattern.as_bytes(), path.as_bytes(), false)
}

/// Case-insensitive variant of [`glob_match`] (ASCII only)
pub fn glob_match_ignore_case(pattern: &str, path: &str) -> bool {
    wildcard_match(pattern.as_bytes(), path.as_bytes(), true)
}

fn wildcard_match(pattern: &[u8], text: &[u8], ignore_case: bool) -> bool {
    let same = |a: u8, b: u8| {
        if ignore_case {
            a.eq_ignore_ascii_case(&b)
        } else {
            a == b
        }
    };

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text index it currently covers up to
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(b'*') => {
                resume = Some((p, t));
                p += 1;
            }
            Some(b'?') => {
                p += 1;
                t += 1;
            }
            Some(&c) if same(c, text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match resume {
                Some((star, covered)) => {
                    resume = Some((star, covered + 1));
                    p = star + 1;
                    t = covered + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}
