//! The directory-tree codec.
//!
//! Transfers move whole directory subtrees as flat lists of
//! `(relative path, bytes)` pairs. [`encode_dir`] walks a local tree into
//! that form; [`decode_dir`] reconstructs a tree from it. The walk order is
//! sorted by name at every level so encoding the same tree twice yields the
//! same list.

use std::fs;
use std::path::Path;

use satchel_core::types::FileEntry;

use crate::error::{io_err, ExchangeError};
use crate::ignore::IgnoreRules;

/// Walk `root` and serialize every non-ignored regular file.
///
/// Paths in the result are relative to `root` and POSIX-separated; a file
/// directly inside `root` is just its filename.
pub fn encode_dir(root: &Path, ignore: &IgnoreRules) -> Result<Vec<FileEntry>, ExchangeError> {
    let mut entries = Vec::new();
    walk(root, "", ignore, &mut entries)?;
    Ok(entries)
}

fn walk(
    dir: &Path,
    prefix: &str,
    ignore: &IgnoreRules,
    out: &mut Vec<FileEntry>,
) -> Result<(), ExchangeError> {
    let mut children: Vec<_> = fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| io_err(dir, e))?;
    children.sort_by_key(|entry| entry.file_name());

    for child in children {
        let path = child.path();
        let name = child.file_name().to_string_lossy().into_owned();
        // symlinks are never followed: a link cycle must not hang the walk
        let file_type = child.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_symlink() {
            tracing::debug!("skipping symlink: {}", path.display());
            continue;
        }

        if file_type.is_dir() {
            let nested = if prefix.is_empty() {
                format!("{name}/")
            } else {
                format!("{prefix}{name}/")
            };
            walk(&path, &nested, ignore, out)?;
        } else if file_type.is_file() {
            let metadata = fs::metadata(&path).map_err(|e| io_err(&path, e))?;
            if ignore.is_ignored(dir, &name, metadata.len()) {
                continue;
            }
            let content = fs::read(&path).map_err(|e| io_err(&path, e))?;
            out.push(FileEntry::new(format!("{prefix}{name}"), content));
        }
    }
    Ok(())
}

/// Materialize `entries` under `dest`, creating it and any intermediate
/// directories as needed.
///
/// With `no_clobber`, an entry whose destination already exists is skipped
/// untouched — the mode used when re-fetching on top of local edits. The
/// ignore predicate, when given, is evaluated against the resolved
/// destination. Decoding is idempotent: running the same list twice into an
/// empty directory produces byte-identical results.
pub fn decode_dir(
    entries: &[FileEntry],
    dest: &Path,
    ignore: Option<&IgnoreRules>,
    no_clobber: bool,
) -> Result<(), ExchangeError> {
    fs::create_dir_all(dest).map_err(|e| io_err(dest, e))?;

    for entry in entries {
        let relative = safe_relative(&entry.path)?;
        let target = dest.join(relative);

        if no_clobber && target.exists() {
            tracing::debug!("keeping existing file: {}", target.display());
            continue;
        }

        let parent = target.parent().unwrap_or(dest);
        let filename = relative.rsplit('/').next().unwrap_or(relative);
        if let Some(rules) = ignore {
            if rules.is_ignored(parent, filename, entry.content.len() as u64) {
                continue;
            }
        }

        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        fs::write(&target, &entry.content).map_err(|e| io_err(&target, e))?;
    }
    Ok(())
}

/// Reject absolute paths and any `..` component. Remote data never gets to
/// pick a destination outside `dest`.
fn safe_relative(path: &str) -> Result<&str, ExchangeError> {
    let unsafe_path = || ExchangeError::UnsafePath {
        path: path.to_string(),
    };
    if path.is_empty() || path.starts_with('/') {
        return Err(unsafe_path());
    }
    if path.split('/').any(|part| part == "..") {
        return Err(unsafe_path());
    }
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_rules() -> IgnoreRules {
        IgnoreRules::new(&[], &[], None)
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
        let mut files = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    let rel = path
                        .strip_prefix(root)
                        .unwrap()
                        .to_string_lossy()
                        .replace('\\', "/");
                    files.push((rel, fs::read(&path).unwrap()));
                }
            }
        }
        files.sort();
        files
    }

    #[test]
    fn round_trip_preserves_nested_tree() {
        let src = TempDir::new().unwrap();
        write(src.path(), "p1.ipynb", b"cells");
        write(src.path(), "data/input.csv", b"1,2,3");
        write(src.path(), "data/deep/raw.bin", &[0, 1, 2]);

        let entries = encode_dir(src.path(), &no_rules()).expect("encode");
        assert_eq!(entries.len(), 3);

        let dest = TempDir::new().unwrap();
        decode_dir(&entries, dest.path(), None, false).expect("decode");
        assert_eq!(read_tree(src.path()), read_tree(dest.path()));
    }

    #[test]
    fn encode_order_is_stable() {
        let src = TempDir::new().unwrap();
        write(src.path(), "b.txt", b"b");
        write(src.path(), "a.txt", b"a");
        write(src.path(), "sub/c.txt", b"c");

        let first = encode_dir(src.path(), &no_rules()).expect("encode");
        let second = encode_dir(src.path(), &no_rules()).expect("encode");
        assert_eq!(first, second);
        let paths: Vec<_> = first.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn ignored_files_are_not_encoded() {
        let src = TempDir::new().unwrap();
        write(src.path(), "p1.ipynb", b"cells");
        write(src.path(), "junk.pyc", b"bytecode");

        let rules = IgnoreRules::new(&["*.pyc".to_string()], &[], None);
        let entries = encode_dir(src.path(), &rules).expect("encode");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "p1.ipynb");
    }

    #[test]
    fn decode_twice_is_idempotent() {
        let entries = vec![
            FileEntry::new("p1.ipynb", b"cells".to_vec()),
            FileEntry::new("sub/p2.ipynb", b"more".to_vec()),
        ];
        let dest = TempDir::new().unwrap();
        decode_dir(&entries, dest.path(), None, false).expect("first");
        let after_once = read_tree(dest.path());
        decode_dir(&entries, dest.path(), None, false).expect("second");
        assert_eq!(after_once, read_tree(dest.path()));
    }

    #[test]
    fn no_clobber_preserves_existing_bytes() {
        let dest = TempDir::new().unwrap();
        write(dest.path(), "p1.ipynb", b"student edits");

        let entries = vec![
            FileEntry::new("p1.ipynb", b"pristine".to_vec()),
            FileEntry::new("p2.ipynb", b"new file".to_vec()),
        ];
        decode_dir(&entries, dest.path(), None, true).expect("decode");

        assert_eq!(fs::read(dest.path().join("p1.ipynb")).unwrap(), b"student edits");
        assert_eq!(fs::read(dest.path().join("p2.ipynb")).unwrap(), b"new file");
    }

    #[test]
    fn decode_applies_ignore_rules() {
        let entries = vec![
            FileEntry::new("p1.ipynb", b"cells".to_vec()),
            FileEntry::new("junk.pyc", b"bytecode".to_vec()),
        ];
        let dest = TempDir::new().unwrap();
        let rules = IgnoreRules::new(&["*.pyc".to_string()], &[], None);
        decode_dir(&entries, dest.path(), Some(&rules), false).expect("decode");

        assert!(dest.path().join("p1.ipynb").exists());
        assert!(!dest.path().join("junk.pyc").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped_not_followed() {
        let src = TempDir::new().unwrap();
        write(src.path(), "p1.ipynb", b"cells");
        write(src.path(), "data/input.csv", b"1,2,3");
        // a cycle back to the root and a link to a regular file
        std::os::unix::fs::symlink(src.path(), src.path().join("data").join("loop")).unwrap();
        std::os::unix::fs::symlink(src.path().join("p1.ipynb"), src.path().join("alias.ipynb"))
            .unwrap();

        let entries = encode_dir(src.path(), &no_rules()).expect("encode");
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["data/input.csv", "p1.ipynb"]);
    }

    #[test]
    fn traversal_paths_are_rejected() {
        let dest = TempDir::new().unwrap();
        for bad in ["../escape.txt", "/etc/passwd", "a/../../b", ""] {
            let entries = vec![FileEntry::new(bad, b"x".to_vec())];
            let err = decode_dir(&entries, dest.path(), None, false).unwrap_err();
            assert!(matches!(err, ExchangeError::UnsafePath { .. }), "{bad}");
        }
    }
}
