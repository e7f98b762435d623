// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tenant file-area confinement and media type allowlist
//!
//! Containment is decided per path component (`Path::starts_with`), never on
//! the raw string, so `/data/wiki1file` is not inside `/data/wiki1`.

use std::path::{Component, Path, PathBuf};

/// The requested path would leave the tenant's file area
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("path is outside the tenant file area")]
pub struct PathDenied;

/// Resolve `user_path` against `files_root`, confined to `files_root`
///
/// `.` and `..` are resolved lexically. When part of the result already exists
/// on disk, its real location (symlinks followed) must also be inside the real
/// root. Absolute user paths and roots that are not absolute are denied.
pub fn resolve(files_root: &Path, user_path: &str) -> Result<PathBuf, PathDenied> {
    if !files_root.is_absolute() {
        return Err(PathDenied);
    }
    let root = normalize(files_root)?;

    let mut candidate = root.clone();
    for component in Path::new(user_path).components() {
        match component {
            Component::CurDir => {}
            Component::Normal(segment) => candidate.push(segment),
            Component::ParentDir => {
                if !candidate.pop() {
                    return Err(PathDenied);
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(PathDenied),
        }
    }

    if !candidate.starts_with(&root) {
        tracing::debug!(root = %root.display(), user_path, "path escapes tenant root");
        return Err(PathDenied);
    }
    check_real_location(&root, &candidate)?;
    Ok(candidate)
}

fn normalize(path: &Path) -> Result<PathBuf, PathDenied> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return Err(PathDenied);
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Symlinks inside the tenant area must not lead out of it
fn check_real_location(root: &Path, candidate: &Path) -> Result<(), PathDenied> {
    let existing = candidate
        .ancestors()
        .take_while(|ancestor| ancestor.starts_with(root))
        .find(|ancestor| ancestor.symlink_metadata().is_ok());

    let Some(existing) = existing else {
        // Nothing on disk yet below the root, so nothing can redirect
        return Ok(());
    };

    let real_root = root.canonicalize().map_err(|_| PathDenied)?;
    let real = existing.canonicalize().map_err(|_| PathDenied)?;
    if real.starts_with(&real_root) {
        Ok(())
    } else {
        tracing::warn!(path = %candidate.display(), "symlink leads outside tenant root");
        Err(PathDenied)
    }
}

/// A media type from the serving allowlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType(&'static str);

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Media type for `path` by extension, `None` when the type is not allowlisted
pub fn mime_for(path: &Path) -> Option<MediaType> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "aac" => "audio/aac",
        "avi" => "video/x-msvideo",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "epub" => "application/epub+zip",
        "gif" => "image/gif",
        "html" | "htm" => "text/html",
        "ico" => "image/x-icon",
        "jpg" | "jpeg" => "image/jpeg",
        "mp3" => "audio/mpeg",
        "mpeg" => "video/mpeg",
        "oga" => "audio/ogg",
        "ogv" => "video/ogg",
        "ogx" => "application/ogg",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "weba" => "audio/weba",
        "webm" => "video/webm",
        "wav" => "audio/wav",
        _ => return None,
    };
    Some(MediaType(mime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolves_inside_root() {
        assert_eq!(
            resolve(Path::new("/data/wiki1/files"), "img/a.png"),
            Ok(PathBuf::from("/data/wiki1/files/img/a.png"))
        );
        assert_eq!(
            resolve(Path::new("/data/wiki1/files"), "./img/../b.png"),
            Ok(PathBuf::from("/data/wiki1/files/b.png"))
        );
    }

    #[test]
    fn root_itself_is_allowed() {
        assert_eq!(
            resolve(Path::new("/data/wiki1/files"), ""),
            Ok(PathBuf::from("/data/wiki1/files"))
        );
        assert_eq!(
            resolve(Path::new("/data/wiki1/files"), "img/.."),
            Ok(PathBuf::from("/data/wiki1/files"))
        );
    }

    #[test]
    fn traversal_is_denied() {
        assert_eq!(resolve(Path::new("/data/wiki1/files"), "../../../etc/passwd"), Err(PathDenied));
        assert_eq!(resolve(Path::new("/data/wiki1/files"), ".."), Err(PathDenied));
        assert_eq!(resolve(Path::new("/data/wiki1/files"), "a/../../x"), Err(PathDenied));
    }

    #[test]
    fn sibling_sharing_a_prefix_is_denied() {
        // Both siblings start with the root's string but are different directories
        assert_eq!(resolve(Path::new("/data/wiki1"), "../wiki1file/secret.txt"), Err(PathDenied));
        assert_eq!(resolve(Path::new("/data/wiki1"), "../wiki1-evil/x.png"), Err(PathDenied));
        assert_eq!(resolve(Path::new("/data/wiki1/files"), "../../wiki1file"), Err(PathDenied));
    }

    #[test]
    fn absolute_user_paths_are_denied() {
        assert_eq!(resolve(Path::new("/data/wiki1/files"), "/etc/passwd"), Err(PathDenied));
        assert_eq!(
            resolve(Path::new("/data/wiki1/files"), "/data/wiki1/files/a.png"),
            Err(PathDenied)
        );
    }

    #[test]
    fn relative_root_is_denied() {
        assert_eq!(resolve(Path::new("data/files"), "a.png"), Err(PathDenied));
    }

    #[test]
    fn traversal_that_returns_inside_is_allowed() {
        assert_eq!(
            resolve(Path::new("/data/wiki1/files"), "../files/a.png"),
            Ok(PathBuf::from("/data/wiki1/files/a.png"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_denied() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("wiki1").join("files");
        let outside = dir.path().join("secrets");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("key.png"), b"x").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        assert_eq!(resolve(&root, "link/key.png"), Err(PathDenied));
        // Not yet existing file below the escaping link
        assert_eq!(resolve(&root, "link/new.png"), Err(PathDenied));
    }

    #[test]
    fn existing_file_inside_root_resolves() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("files");
        std::fs::create_dir_all(root.join("img")).unwrap();
        std::fs::write(root.join("img").join("a.png"), b"x").unwrap();

        assert_eq!(resolve(&root, "img/a.png"), Ok(root.join("img").join("a.png")));
        assert_eq!(resolve(&root, "img/new.png"), Ok(root.join("img").join("new.png")));
    }

    #[test]
    fn mime_lookup_is_case_insensitive() {
        assert_eq!(mime_for(Path::new("a.PNG")).map(|m| m.as_str()), Some("image/png"));
        assert_eq!(mime_for(Path::new("dir/song.Mp3")).map(|m| m.as_str()), Some("audio/mpeg"));
        assert_eq!(mime_for(Path::new("page.htm")).map(|m| m.to_string()), Some("text/html".into()));
    }

    #[test]
    fn unknown_types_fail_closed() {
        assert_eq!(mime_for(Path::new("script.js")), None);
        assert_eq!(mime_for(Path::new("noext")), None);
        assert_eq!(mime_for(Path::new(".png")), None);
        assert_eq!(mime_for(Path::new("archive.tar.gz")), None);
    }
}
