//! Report export downloads.

use jiff::Zoned;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

enum_display_fromstr!(
    ExportFormat,
    crate::error::ConsoleError::invalid_export_format,
    {
        Csv => "csv",
        Xlsx => "xlsx",
    }
);

/// A downloaded export blob plus the filename to save it under.
#[derive(Debug, Clone)]
pub struct ExportDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Generate the client-side filename: `<report-name>-<YYYY-MM-DD>.<ext>`.
pub fn export_filename(report_name: &str, format: ExportFormat) -> String {
    let today = Zoned::now().date();
    format!("{report_name}-{today}.{format}")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_format_display_fromstr() {
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
        assert_eq!(ExportFormat::from_str("XLSX").unwrap(), ExportFormat::Xlsx);
        assert!(ExportFormat::from_str("pdf").is_err());
    }

    #[test]
    fn test_filename_shape() {
        let name = export_filename("player-performance", ExportFormat::Csv);
        assert!(name.starts_with("player-performance-"));
        assert!(name.ends_with(".csv"));

        // The date segment is ISO: YYYY-MM-DD
        let middle = name
            .trim_start_matches("player-performance-")
            .trim_end_matches(".csv");
        let parts: Vec<&str> = middle.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 4);
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 2);
    }
}
