//! Cohort file loading.

use std::io::{self, BufReader};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use log::debug;
use sitescore_core::LocationRecord;

use crate::CliError;

/// Confirm `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path has no file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Load a JSON array of location records.
///
/// Records without an identifier receive a generated one so batch reports
/// can refer to every member.
pub(crate) fn load_cohort(path: &Utf8Path) -> Result<Vec<LocationRecord>, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenCohort {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let mut cohort: Vec<LocationRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| CliError::ParseCohort {
            path: path.to_path_buf(),
            source,
        })?;
    for record in cohort.iter_mut().filter(|record| record.id.is_empty()) {
        record.id = LocationRecord::with_generated_id().id;
    }
    debug!("loaded {} cohort member(s) from {path}", cohort.len());
    Ok(cohort)
}
