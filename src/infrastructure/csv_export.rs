// CSV serialization of sensor records, for downloads and the server-side archive
use crate::domain::error::ReportError;
use crate::domain::report::stamped_name;
use crate::domain::sensor::SensorRecord;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Header row followed by one row per record, in record order
pub fn to_csv_bytes(records: &[SensorRecord]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

/// Write `pranbot_data_<timestamp>.csv` under `dir`, creating the directory if needed
pub fn archive(
    records: &[SensorRecord],
    dir: &Path,
    at: DateTime<Local>,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(stamped_name("pranbot_data", "csv", at));
    std::fs::write(&path, to_csv_bytes(records)?)?;
    tracing::info!("Archived {} records to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::tests::sample_data;
    use chrono::TimeZone;

    #[test]
    fn test_csv_has_header_and_one_line_per_record() {
        let records = sample_data(4).into_export_records().unwrap();
        let bytes = to_csv_bytes(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "timestamp,smoke,methane,co,air,gpi,temperature,humidity"
        );
        assert_eq!(lines[1], "10:00,300,100,50,60,40.0,25.0,50.0");
    }

    #[test]
    fn test_archive_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("archive");
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let records = sample_data(3).into_export_records().unwrap();

        let path = archive(&records, &dir, at).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "pranbot_data_20240102_030405.csv"
        );
        assert_eq!(std::fs::read_to_string(path).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_archive_into_a_file_path_fails() {
        let root = tempfile::NamedTempFile::new().unwrap();
        let records = sample_data(3).into_export_records().unwrap();
        let err = archive(&records, root.path(), Local::now()).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
