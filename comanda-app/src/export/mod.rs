//! File exports
//!
//! Reports go out as semicolon-delimited CSV (the Excel default for the
//! Spanish locale, which also frees the decimal comma) or as a printable
//! standalone HTML page. Files land in the configured export directory
//! under a timestamped name.

pub mod csv;
pub mod html;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Write `contents` under `<dir>/<stem>-<yyyymmdd-hhmmss>.<extension>`,
/// creating the directory if needed. Returns the path written.
pub fn write_export(
    dir: &Path,
    stem: &str,
    extension: &str,
    contents: &str,
) -> ExportResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{stem}-{stamp}.{extension}"));
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_export_creates_the_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports");
        let path = write_export(&nested, "ventas", "csv", "a;b\n").unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a;b\n");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ventas-"));
        assert!(name.ends_with(".csv"));
    }
}
