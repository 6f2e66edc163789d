use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value as JsonValue;

use super::error::LoadError;

/// Cell text that counts as a missing value, following the usual
/// dataframe reader defaults.  Matched exactly, without trimming.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// RawTable – rows as read, before any cleaning
// ---------------------------------------------------------------------------

/// Untyped table straight from the input file.  `None` marks a missing cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Remove every column whose name contains "index" (any case).
    /// Returns the names that were dropped.
    pub fn drop_index_columns(&mut self) -> Vec<String> {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|h| !h.to_lowercase().contains("index"))
            .collect();
        if keep.iter().all(|k| *k) {
            return Vec::new();
        }

        let dropped = self
            .headers
            .iter()
            .zip(&keep)
            .filter(|(_, k)| !**k)
            .map(|(h, _)| h.clone())
            .collect();
        self.headers = retain_flagged(std::mem::take(&mut self.headers), &keep);
        for row in &mut self.rows {
            *row = retain_flagged(std::mem::take(row), &keep);
        }
        dropped
    }
}

fn retain_flagged<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter(|(_, k)| **k)
        .map(|(item, _)| item)
        .collect()
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw logistics table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – records orientation: `[{ "LINEA": "...", ... }, ...]`
/// * anything else – delimited text with one header row, split on `delimiter`
///
/// Index artifact columns are removed before returning.
pub fn load_file(path: &Path, delimiter: u8) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut table = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" | "txt" | "tsv" | "" => load_delimited(path, delimiter)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dropped = table.drop_index_columns();
    if !dropped.is_empty() {
        log::debug!("Dropped index columns {dropped:?}");
    }
    log::info!(
        "Read {} rows with {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_delimited(BufReader::new(file), delimiter).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse delimited text.  Short rows are padded with missing cells and
/// surplus fields are ignored.
pub fn read_delimited<R: std::io::Read>(reader: R, delimiter: u8) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = (0..headers.len())
            .map(|i| record.get(i).and_then(missing_to_none))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn missing_to_none(s: &str) -> Option<String> {
    if NA_TOKENS.contains(&s) {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    json_records(&root)
}

/// Build a table from records-oriented JSON.  Columns appear in the order
/// their keys are first seen.
pub fn json_records(root: &JsonValue) -> Result<RawTable, LoadError> {
    let records = root.as_array().ok_or(LoadError::NotRecords)?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for rec in records {
        let obj = rec.as_object().ok_or(LoadError::NotRecords)?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).and_then(json_to_text))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn semicolon_file_with_missing_tokens() {
        let text = "LINEA;FALLAS;PESO NETO\nA;;1000\nNA;Motor;n/a\n";
        let table = read_delimited(text.as_bytes(), b';').unwrap();
        assert_eq!(table.headers, vec!["LINEA", "FALLAS", "PESO NETO"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Some("A".into()), None, Some("1000".into())],
                vec![None, Some("Motor".into()), None],
            ]
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let text = "A;B;C\n1;2\n";
        let table = read_delimited(text.as_bytes(), b';').unwrap();
        assert_eq!(table.rows, vec![vec![Some("1".into()), Some("2".into()), None]]);
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let text = "\u{feff}LINEA;TURNO\nA;Mañana\n";
        let table = read_delimited(text.as_bytes(), b';').unwrap();
        assert_eq!(table.column_index("LINEA"), Some(0));
    }

    #[test]
    fn index_columns_dropped_case_insensitive() {
        let text = "Unnamed: 0_index;LINEA;INDEX;Reindexado;TURNO\n0;A;1;x;Noche\n";
        let mut table = read_delimited(text.as_bytes(), b';').unwrap();
        let dropped = table.drop_index_columns();
        assert_eq!(dropped, vec!["Unnamed: 0_index", "INDEX", "Reindexado"]);
        assert_eq!(table.headers, vec!["LINEA", "TURNO"]);
        assert_eq!(table.rows, vec![vec![Some("A".into()), Some("Noche".into())]]);
    }

    #[test]
    fn json_records_keep_key_order() {
        let root: JsonValue = serde_json::from_str(
            r#"[{"TURNO": "Noche", "LINEA": "A", "FALLAS": null},
                {"LINEA": "B", "PESO NETO": 1200.5}]"#,
        )
        .unwrap();
        let table = json_records(&root).unwrap();
        assert_eq!(table.headers, vec!["TURNO", "LINEA", "FALLAS", "PESO NETO"]);
        assert_eq!(table.rows[0], vec![Some("Noche".into()), Some("A".into()), None, None]);
        assert_eq!(table.rows[1], vec![None, Some("B".into()), None, Some("1200.5".into())]);
    }

    #[test]
    fn json_must_be_records() {
        let root: JsonValue = serde_json::from_str(r#"{"LINEA": ["A"]}"#).unwrap();
        assert!(matches!(json_records(&root), Err(LoadError::NotRecords)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/LOGISTICA.csv"), b';').unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("datos.xlsx"), b';').unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn load_file_drops_index_columns() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "index;LINEA\n0;A\n1;B\n").unwrap();
        let table = load_file(file.path(), b';').unwrap();
        assert_eq!(table.headers, vec!["LINEA"]);
        assert_eq!(table.rows.len(), 2);
    }
}
