// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Moving agent files between disk and payloads.

use anyhow::{bail, Context};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use revenant_core::payload::StateFile;

/// Every UTF-8 file under `dir`, keyed by its `/`-separated path relative to
/// `dir`, sorted by path. Dot-files and dot-directories are skipped; symlinks
/// are followed.
pub fn collect_files(dir: &Path) -> anyhow::Result<Vec<StateFile>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    let mut out = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        out.push(read_file_as(entry.path(), name)?);
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// A single file, stored under its file name.
pub fn read_file(path: &Path) -> anyhow::Result<StateFile> {
    let name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_string_lossy()
        .into_owned();
    read_file_as(path, name)
}

fn read_file_as(path: &Path, name: String) -> anyhow::Result<StateFile> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {} as UTF-8", path.display()))?;
    Ok(StateFile::new(name, content))
}

/// Parse repeated `key=value` flags into payload metadata.
pub fn parse_metadata(pairs: &[String]) -> anyhow::Result<Map<String, Value>> {
    let mut map = Map::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("metadata {:?} is not key=value", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("metadata {:?} has an empty key", pair);
        }
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(map)
}

/// Where a revived file lands under `out`. Paths that would escape `out`
/// are refused.
pub fn restore_path(out: &Path, file_path: &str) -> anyhow::Result<PathBuf> {
    let relative = Path::new(file_path);
    if file_path.is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        bail!("refusing to restore {:?} outside the output directory", file_path);
    }
    Ok(out.join(relative))
}

/// Write revived files under `out`. Later duplicates overwrite earlier ones,
/// matching the order they were salvaged in.
pub fn write_files(out: &Path, files: &[StateFile]) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = restore_path(out, &file.path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&target, &file.content).with_context(|| format!("writing {}", target.display()))?;
        written.push(target);
    }
    Ok(written)
}
