use std::fs;
use std::path::{Path, PathBuf};

use super::config::DataPaths;
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::error::FileError;
use super::prototype::{Prototype, PrototypeKind};
use super::registry::PrototypeRegistry;

/// One entry of a list file that did not match its kind's schema.
#[derive(Debug)]
pub(crate) struct RecordError {
    pub index: usize,
    pub source: toml::de::Error,
}

/// Load every prototype under the configured kind directories.
///
/// Never stops early: unreadable files, malformed records, missing ids and
/// duplicate ids are all reported and skipped.
pub fn load_all(paths: &DataPaths) -> (PrototypeRegistry, Diagnostics) {
    let mut registry = PrototypeRegistry::new();
    let mut diagnostics = Diagnostics::new();

    for kind in PrototypeKind::ALL {
        load_kind(paths, kind, &mut registry, &mut diagnostics);
    }

    tracing::info!(
        target: "data",
        locations = registry.count_kind(PrototypeKind::Location),
        items = registry.count_kind(PrototypeKind::Item),
        npcs = registry.count_kind(PrototypeKind::Npc),
        "Loaded prototypes from {}",
        paths.root.display()
    );

    (registry, diagnostics)
}

pub(crate) fn load_kind(
    paths: &DataPaths,
    kind: PrototypeKind,
    registry: &mut PrototypeRegistry,
    diagnostics: &mut Diagnostics,
) {
    let dir = paths.kind_dir(kind);
    let mut files = Vec::new();
    collect_files(&dir, paths, &mut files, diagnostics);
    // Lexical order keeps "first definition wins" stable across runs.
    files.sort();

    for file in files {
        tracing::debug!(target: "data", "Reading {} file {}", kind.dir_name(), file.display());

        let records = match read_records(kind, &file) {
            Ok(records) => records,
            Err(e) => {
                let diag_kind = match e {
                    FileError::Read { .. } => DiagnosticKind::ReadFailed,
                    FileError::Parse { .. } => DiagnosticKind::ParseFailed,
                };
                diagnostics.error(diag_kind, None, Some(&file), e.to_string());
                continue;
            }
        };

        for record in records {
            let mut proto = match record {
                Ok(proto) => proto,
                Err(RecordError { index, source }) => {
                    diagnostics.error(
                        DiagnosticKind::ParseFailed,
                        None,
                        Some(&file),
                        format!(
                            "Failed to deserialize entry {} in file \"{}\":\n{}",
                            index,
                            file.display(),
                            source
                        ),
                    );
                    continue;
                }
            };

            proto.set_source_file(&file);
            for key in proto.on_deserialized() {
                let id = proto.id().unwrap_or_default();
                diagnostics.error(
                    DiagnosticKind::DuplicatePath,
                    Some(id),
                    Some(&file),
                    format!(
                        "Duplicate path key \"{}\" in location '{}' in file \"{}\" (destination already defined).",
                        key,
                        id,
                        file.display()
                    ),
                );
            }
            insert_prototype(registry, proto, diagnostics);
        }
    }
}

fn insert_prototype(
    registry: &mut PrototypeRegistry,
    proto: Prototype,
    diagnostics: &mut Diagnostics,
) {
    let rejected = match registry.insert(proto) {
        Ok(()) => return,
        Err(rejected) => rejected,
    };

    let file = rejected.source_file();
    match rejected.id() {
        None => diagnostics.missing_property(None, file, "id"),
        Some(id) => {
            let first = registry
                .get(id)
                .map(|p| p.source_file().display().to_string())
                .unwrap_or_default();
            diagnostics.error(
                DiagnosticKind::DuplicatePrototype,
                Some(id),
                Some(file),
                format!(
                    "Duplicate prototype definition of '{}' in file \"{}\" (first defined in \"{}\").",
                    id,
                    file.display(),
                    first
                ),
            );
        }
    }
}

/// Recursively gather content files below `dir`. Unreadable directories
/// are reported and skipped.
fn collect_files(
    dir: &Path,
    paths: &DataPaths,
    files: &mut Vec<PathBuf>,
    diagnostics: &mut Diagnostics,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            let e = FileError::Read {
                path: dir.to_path_buf(),
                source,
            };
            diagnostics.error(DiagnosticKind::ReadFailed, None, Some(dir), e.to_string());
            return;
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(source) => {
                let e = FileError::Read {
                    path: dir.to_path_buf(),
                    source,
                };
                diagnostics.error(DiagnosticKind::ReadFailed, None, Some(dir), e.to_string());
                continue;
            }
        };

        if path.is_dir() {
            collect_files(&path, paths, files, diagnostics);
        } else if paths.matches_extension(&path) {
            files.push(path);
        }
    }
}

fn read_records(
    kind: PrototypeKind,
    path: &Path,
) -> Result<Vec<Result<Prototype, RecordError>>, FileError> {
    let contents = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(kind, path, &contents)
}

/// Split a file into records.
///
/// - empty file: no records
/// - top-level array under the kind key (`[[npc]]`): one record per entry
/// - anything else: the whole file is a single bare record
pub(crate) fn parse_records(
    kind: PrototypeKind,
    path: &Path,
    contents: &str,
) -> Result<Vec<Result<Prototype, RecordError>>, FileError> {
    let mut table: toml::Table = toml::from_str(contents).map_err(|source| FileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if table.is_empty() {
        return Ok(Vec::new());
    }

    let entries = match table.remove(kind.list_key()) {
        Some(toml::Value::Array(entries)) => entries,
        Some(other) => {
            // Not a list, so it is an ordinary field of a bare record.
            table.insert(kind.list_key().to_string(), other);
            vec![toml::Value::Table(table)]
        }
        None => vec![toml::Value::Table(table)],
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, value)| kind.parse(value).map_err(|source| RecordError { index, source }))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(records: Vec<Result<Prototype, RecordError>>) -> Vec<String> {
        records
            .into_iter()
            .map(|r| r.unwrap().id().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn bare_record_is_promoted_to_a_list() {
        let src = r#"
            # a comment
            id = "tavern"
            name = "The Drunken Dwarf"
            call_name = "tavern"
            description = "Smoky."
            items = ["mug", "stool",]
        "#;
        let records = parse_records(PrototypeKind::Location, Path::new("t.toml"), src).unwrap();
        assert_eq!(ids(records), vec!["tavern"]);
    }

    #[test]
    fn explicit_list_keeps_order() {
        let src = r#"
            [[item]]
            id = "mug"

            [[item]]
            id = "stool"
        "#;
        let records = parse_records(PrototypeKind::Item, Path::new("i.toml"), src).unwrap();
        assert_eq!(ids(records), vec!["mug", "stool"]);
    }

    #[test]
    fn empty_file_has_no_records() {
        let records =
            parse_records(PrototypeKind::Npc, Path::new("n.toml"), "# nothing yet\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn one_bad_entry_does_not_sink_the_list() {
        let src = r#"
            [[item]]
            id = "mug"

            [[item]]
            id = "stool"
            hands_required = "two"
        "#;
        let records = parse_records(PrototypeKind::Item, Path::new("i.toml"), src).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        let err = records[1].as_ref().unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn syntax_error_is_a_file_error() {
        let err = parse_records(PrototypeKind::Item, Path::new("bad.toml"), "id = ").unwrap_err();
        assert!(matches!(err, FileError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
