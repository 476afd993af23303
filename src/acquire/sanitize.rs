use std::path::{Component, Path, PathBuf};

use crate::acquire::error::ExtractError;

/// Resolves an archive entry name to a path inside `base`.
///
/// Both `/` and `\` separate components. `.` is dropped and `..` pops the
/// previous component. Absolute names, drive prefixes and `..` climbing above
/// `base` are zip-slip attempts and are rejected.
pub fn resolve_entry_path(entry_name: &str, base: &Path) -> Result<PathBuf, ExtractError> {
    let unsafe_entry = |reason| ExtractError::UnsafeEntry {
        entry: entry_name.to_string(),
        reason,
    };

    let normalized = entry_name.replace('\\', "/");
    let mut relative = PathBuf::new();
    let mut depth = 0usize;

    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => {
                relative.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir if depth == 0 => {
                return Err(unsafe_entry("escapes the destination directory"));
            }
            Component::ParentDir => {
                relative.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(unsafe_entry("absolute path"));
            }
        }
    }

    // A drive-relative name like "C:evil" is a plain component on Unix
    if normalized.contains(':') {
        return Err(unsafe_entry("absolute path"));
    }

    Ok(base.join(relative))
}
