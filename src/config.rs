use std::path::PathBuf;

/// File opened at startup when present in the working directory.
pub const DEFAULT_DATA_FILE: &str = "LOGISTICA.csv";
pub const DEFAULT_DELIMITER: u8 = b';';

/// Where the dashboard reads its data from.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub delimiter: u8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}
