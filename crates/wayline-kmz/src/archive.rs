//! KMZ container packaging.
//!
//! The entry layout is fixed by the firmware and is not configurable.
//! Both documents live under the `wpmz/` directory, whose own entry is the
//! marker the firmware looks for. Mission configuration is carried inside
//! each document's `missionConfig`, so no separate file sits at the archive
//! root.

use crate::error::Result;
use crate::MissionDocuments;
use chrono::{Datelike, Timelike};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Root directory marker
pub const ROOT_DIR: &str = "wpmz/";
pub const TEMPLATE_ENTRY: &str = "wpmz/template.kml";
pub const WAYLINES_ENTRY: &str = "wpmz/waylines.wpml";

/// Entry names in archive order
pub const ENTRIES: [&str; 3] = [ROOT_DIR, TEMPLATE_ENTRY, WAYLINES_ENTRY];

/// Write both documents into a zip container on `sink`.
pub fn write_archive<W: Write + Seek>(documents: &MissionDocuments, sink: W) -> Result<W> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(entry_time(documents));

    let mut zip = ZipWriter::new(sink);
    zip.add_directory(ROOT_DIR, options)?;
    zip.start_file(TEMPLATE_ENTRY, options)?;
    zip.write_all(documents.template.as_bytes())?;
    zip.start_file(WAYLINES_ENTRY, options)?;
    zip.write_all(documents.waylines.as_bytes())?;
    Ok(zip.finish()?)
}

/// Archive bytes in memory
pub fn to_bytes(documents: &MissionDocuments) -> Result<Vec<u8>> {
    Ok(write_archive(documents, Cursor::new(Vec::new()))?.into_inner())
}

/// Write the archive to `path` atomically.
///
/// The container is staged in a temporary file next to `path` and renamed
/// into place once complete; on any failure the staging file is removed and
/// `path` is left untouched.
pub fn write_to_path(documents: &MissionDocuments, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staging = NamedTempFile::new_in(dir)?;
    write_archive(documents, staging.as_file_mut())?;
    staging.as_file().sync_all()?;
    staging.persist(path)?;

    tracing::info!(
        mission_id = %documents.mission_id,
        path = %path.display(),
        "KMZ archive written"
    );
    Ok(())
}

/// Entries are stamped with the mission creation time so repeated packaging
/// of one mission is byte-identical. Times outside the zip range fall back
/// to the format's epoch.
fn entry_time(documents: &MissionDocuments) -> zip::DateTime {
    let created = documents.created_at;
    let (Ok(year), Ok(month), Ok(day)) = (
        u16::try_from(created.year()),
        u8::try_from(created.month()),
        u8::try_from(created.day()),
    ) else {
        return zip::DateTime::default();
    };
    let (Ok(hour), Ok(minute), Ok(second)) = (
        u8::try_from(created.hour()),
        u8::try_from(created.minute()),
        u8::try_from(created.second()),
    ) else {
        return zip::DateTime::default();
    };

    zip::DateTime::from_date_and_time(year, month, day, hour, minute, second).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Read;
    use uuid::Uuid;

    fn documents() -> MissionDocuments {
        MissionDocuments {
            mission_id: Uuid::nil(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            template: "<kml>template</kml>".to_string(),
            waylines: "<kml>waylines</kml>".to_string(),
        }
    }

    #[test]
    fn test_entry_layout() {
        let bytes = to_bytes(&documents()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        let names: Vec<_> = archive.file_names().map(str::to_string).collect();
        assert_eq!(archive.len(), 3);
        for entry in ENTRIES {
            assert!(names.iter().any(|name| name == entry), "missing {entry}");
        }

        let mut template = String::new();
        archive
            .by_name(TEMPLATE_ENTRY)
            .unwrap()
            .read_to_string(&mut template)
            .unwrap();
        assert_eq!(template, "<kml>template</kml>");

        let waylines = archive.by_name(WAYLINES_ENTRY).unwrap();
        assert_eq!(waylines.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn test_packaging_is_deterministic() {
        let docs = documents();
        assert_eq!(to_bytes(&docs).unwrap(), to_bytes(&docs).unwrap());
    }

    #[test]
    fn test_write_to_path_leaves_only_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mission.kmz");

        write_to_path(&documents(), &path).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).is_ok());
    }

    #[test]
    fn test_write_to_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("mission.kmz");

        let err = write_to_path(&documents(), &path).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!path.exists());
    }
}
