//! Migration catalog reader.
//!
//! Scans a flat directory for files named
//! `<10-digit-version>_<name>.<up|down>.sql` and yields the ordered forward
//! catalog. The filename grammar is a pure parsing function so it can be
//! unit-tested without touching a filesystem.

use crate::error::{MigrateError, MigrateResult};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Compiled filename grammar, shared across invocations.
fn file_regex() -> &'static Regex {
    static FILE_RE: OnceLock<Regex> = OnceLock::new();
    FILE_RE.get_or_init(|| Regex::new(r"^(\d{10})_(.*)\.(up|down)\.sql$").unwrap())
}

/// One migration identified by version and descriptive name.
///
/// Matching against the ledger is by `version` alone; `name` is carried for
/// diagnostics and for resolving on-disk filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
}

impl MigrationRecord {
    pub fn new(version: i64, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
        }
    }

    /// Resolve the on-disk path of this migration in `dir` for `direction`.
    pub fn file_path(&self, dir: &Path, direction: Direction) -> PathBuf {
        dir.join(format!("{}_{}.{}.sql", self.version, self.name, direction))
    }
}

impl fmt::Display for MigrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.version, self.name)
    }
}

/// Direction token from the filename grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A catalog entry: a record plus its direction and resolved path.
///
/// Ephemeral; rebuilt from the directory on every invocation.
#[derive(Debug, Clone)]
pub struct MigrationFile {
    pub record: MigrationRecord,
    pub direction: Direction,
    pub path: PathBuf,
}

/// Structured result of matching one filename against the grammar.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedName {
    pub version: i64,
    pub name: String,
    pub direction: Direction,
}

/// Match `file_name` against the filename grammar.
///
/// Returns `Ok(None)` for names that simply do not match (skipped with a
/// warning by the directory scan) and `Err` when a grammar-matching name
/// carries a version the integer parser rejects.
pub fn parse_filename(file_name: &str) -> MigrateResult<Option<ParsedName>> {
    let Some(caps) = file_regex().captures(file_name) else {
        return Ok(None);
    };

    let version = caps[1]
        .parse::<i64>()
        .map_err(|source| MigrateError::BadVersion {
            file: file_name.to_string(),
            source,
        })?;

    let direction = match &caps[3] {
        "up" => Direction::Up,
        _ => Direction::Down,
    };

    Ok(Some(ParsedName {
        version,
        name: caps[2].to_string(),
        direction,
    }))
}

/// Scan `base_path` and return the forward catalog, ascending by version.
///
/// Subdirectories and hidden entries are skipped silently; names that do not
/// match the grammar are skipped with a warning; only `up` entries populate
/// the catalog. An empty result is not an error here: the caller decides
/// whether an empty catalog is tolerable.
pub fn read_catalog(base_path: &Path) -> MigrateResult<Vec<MigrationFile>> {
    let entries = fs::read_dir(base_path).map_err(|source| MigrateError::Io {
        path: base_path.to_path_buf(),
        source,
    })?;

    let mut catalog = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MigrateError::Io {
            path: base_path.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| MigrateError::Io {
            path: entry.path(),
            source,
        })?;

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            // Non-UTF-8 names cannot match the grammar
            log::warn!("file {:?} is not formatted correctly", file_name);
            continue;
        };

        if file_type.is_dir() || name.starts_with('.') {
            continue;
        }

        let Some(parsed) = parse_filename(name)? else {
            log::warn!("file {} is not formatted correctly", name);
            continue;
        };

        if parsed.direction != Direction::Up {
            continue;
        }

        catalog.push(MigrationFile {
            record: MigrationRecord::new(parsed.version, parsed.name),
            direction: Direction::Up,
            path: entry.path(),
        });
    }

    // Ten-digit fixed-width versions make lexical and numeric order
    // coincide, but directory order is arbitrary; sort regardless.
    catalog.sort_by_key(|m| m.record.version);
    Ok(catalog)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
