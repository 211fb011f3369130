//! CSV export of season datasets
//!
//! Each league-season is written to `<base>/<season>/<league>.csv`,
//! overwriting any previous file.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::info;

use crate::dataset::Dataset;
use crate::error::Result;

/// Where a dataset was written and how many rows it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes season datasets below a base directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    base_dir: PathBuf,
}

impl CsvExporter {
    /// # Arguments
    /// * `base_dir` - Directory holding one subdirectory per season
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Destination file for a league-season
    pub fn path_for(&self, season: &str, league: &str) -> PathBuf {
        self.base_dir.join(season).join(format!("{league}.csv"))
    }

    /// Drop placeholder and nameless rows, then write the dataset as CSV.
    ///
    /// The season directory is created when missing.
    ///
    /// # Errors
    /// - `TransferError::Io` - the directory or file cannot be created
    /// - `TransferError::Csv` - a record cannot be written
    pub fn export(&self, dataset: Dataset, season: &str, league: &str) -> Result<ExportSummary> {
        let path = self.path_for(season, league);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let dataset = dataset.without_placeholders();
        let file = fs::File::create(&path)?;
        write_csv(&dataset, io::BufWriter::new(file))?;

        info!(path = %path.display(), rows = dataset.len(), "exported season dataset");
        Ok(ExportSummary {
            path,
            rows: dataset.len(),
        })
    }
}

/// Write the dataset's columns and transfer rows; null cells are empty.
pub fn write_csv<W: io::Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if !dataset.columns().is_empty() {
        wtr.write_record(dataset.columns())?;
    }
    for cells in dataset.transfers() {
        wtr.write_record(cells.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractedRow, TransferTable};

    fn dataset() -> Dataset {
        Dataset::from_table(TransferTable {
            header: ["Club", "Name", "Fee", "Movement"].map(String::from).to_vec(),
            rows: vec![
                ExtractedRow::Transfer(["Everton FC", "Richarlison", "£35.28m", "In"].map(String::from).to_vec()),
                ExtractedRow::NoActivity { width: 3 },
                ExtractedRow::Transfer(["Everton FC", "Lucas Digne, Jr.", "", "In"].map(String::from).to_vec()),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_path_for() {
        let exporter = CsvExporter::new("/data");
        assert_eq!(
            exporter.path_for("2018", "premier-league"),
            PathBuf::from("/data/2018/premier-league.csv")
        );
    }

    #[test]
    fn test_write_csv_quotes_and_nulls() {
        let mut buf = Vec::new();
        write_csv(&dataset().without_placeholders(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Club,Name,Fee,Movement\n\
             Everton FC,Richarlison,£35.28m,In\n\
             Everton FC,\"Lucas Digne, Jr.\",,In\n"
        );
    }

    #[test]
    fn test_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());

        let summary = exporter.export(dataset(), "2018", "premier-league").unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.path, dir.path().join("2018").join("premier-league.csv"));

        let mut reader = csv::Reader::from_path(&summary.path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, dataset().columns());
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let path = exporter.path_for("2018", "championship");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale contents that are longer than the new file\n".repeat(50)).unwrap();

        exporter.export(dataset(), "2018", "championship").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Club,Name,Fee,Movement\n"));
        assert!(!text.contains("stale"));
    }

    #[test]
    fn test_export_empty_dataset_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let summary = CsvExporter::new(dir.path())
            .export(Dataset::default(), "2019", "premier-league")
            .unwrap();
        assert_eq!(summary.rows, 0);
        assert_eq!(fs::read_to_string(summary.path).unwrap(), "");
    }
}
