//! Resolves a CLI `path` argument to the list of Dockerfiles to process:
//! the file itself, or every `Dockerfile*` found under a directory.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

fn dockerfile_glob_set() -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("Dockerfile*").unwrap());
    builder.build().unwrap()
}

pub fn resolve(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let set = dockerfile_glob_set();
    let mut files = Vec::new();
    walk_dir(path, &set, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, set: &GlobSet, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, set, files)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| set.is_match(name))
        {
            files.push(path);
        }
    }
    Ok(())
}
