use std::collections::HashMap;
use std::path::Path;

use super::error::LoadError;
use super::loader::{load_file, RawTable};
use super::model::{
    Category, CellValue, ColumnSource, FailureKind, Field, Shipment, ShipmentTable, TableColumn,
};
use super::timestamp::{minutes_between, parse_day_first};

/// Rows supervised by this person are excluded entirely.
pub const EXCLUDED_SUPERVISOR: &str = "Antonio Medina";
/// Rows of this steel type are excluded entirely.
pub const EXCLUDED_STEEL: &str = "ACERO INOX";

/// Read `path` and run it through [`clean`].
pub fn load_and_clean(path: &Path, delimiter: u8) -> Result<ShipmentTable, LoadError> {
    let raw = load_file(path, delimiter)?;
    clean(raw)
}

/// Turn a raw table into cleaned shipments:
///
/// * parse the four timestamps day-first (unparsable → missing)
/// * drop excluded supervisor / steel-type rows
/// * derive unload, travel and wait minutes and the departure day
/// * replace missing categorical values with their sentinels
///
/// Fails only when a required column is absent.
pub fn clean(raw: RawTable) -> Result<ShipmentTable, LoadError> {
    let missing: Vec<String> = Field::REQUIRED
        .iter()
        .filter(|f| raw.column_index(f.header()).is_none())
        .map(|f| f.header().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let idx: HashMap<Field, usize> = Field::REQUIRED
        .iter()
        .filter_map(|f| raw.column_index(f.header()).map(|i| (*f, i)))
        .collect();

    // Source columns in order; names matching a known field bind to it.
    let mut columns = Vec::with_capacity(raw.headers.len() + Field::DERIVED.len());
    let mut extra_columns = Vec::new();
    let mut extra_idx = Vec::new();
    for (i, name) in raw.headers.iter().enumerate() {
        let source = match Field::from_header(name) {
            Some(field) => ColumnSource::Field(field),
            None => {
                extra_columns.push(name.clone());
                extra_idx.push(i);
                ColumnSource::Extra(extra_columns.len() - 1)
            }
        };
        columns.push(TableColumn {
            name: name.clone(),
            source,
        });
    }
    for field in Field::DERIVED {
        if !columns.iter().any(|c| c.source == ColumnSource::Field(field)) {
            columns.push(TableColumn {
                name: field.header().to_string(),
                source: ColumnSource::Field(field),
            });
        }
    }

    let fallas_col = idx[&Field::Fallas];
    let failure_kind = infer_failure_kind(&raw, fallas_col);
    let all_integers = failure_kind == FailureKind::Numeric
        && present_failures(&raw, fallas_col).all(|s| s.trim().parse::<i64>().is_ok());

    let total = raw.rows.len();
    let mut unparsed: HashMap<Field, usize> = HashMap::new();
    let mut rows = Vec::with_capacity(total);

    for row in &raw.rows {
        let cell = |f: Field| field_text(row, &idx, f);

        if cell(Field::Supervisor) == Some(EXCLUDED_SUPERVISOR)
            || cell(Field::TipoAcero) == Some(EXCLUDED_STEEL)
        {
            continue;
        }

        let mut timestamp = |f: Field| {
            let text = cell(f)?;
            let parsed = parse_day_first(text);
            if parsed.is_none() {
                *unparsed.entry(f).or_default() += 1;
            }
            parsed
        };
        let inicio_descarga = timestamp(Field::InicioDescarga);
        let fin_descarga = timestamp(Field::FinDescarga);
        let salida_proveedor = timestamp(Field::SalidaProveedor);
        let llegada_fabrica = timestamp(Field::LlegadaFabrica);

        let category = |c: Category| {
            cell(c.field())
                .map(str::to_string)
                .unwrap_or_else(|| c.sentinel().to_string())
        };

        let fallas = match (cell(Field::Fallas).filter(|s| !is_non_finite(s)), failure_kind) {
            (None, _) => CellValue::Null,
            (Some(s), FailureKind::Text) => CellValue::Text(s.to_string()),
            (Some(s), FailureKind::Numeric) if all_integers => s
                .trim()
                .parse::<i64>()
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Null),
            (Some(s), FailureKind::Numeric) => parse_number(s)
                .map(CellValue::Float)
                .unwrap_or(CellValue::Null),
        };

        rows.push(Shipment {
            linea: category(Category::Linea),
            supervisor: category(Category::Supervisor),
            tipo_acero: category(Category::TipoAcero),
            transporte: category(Category::Transporte),
            turno: cell(Field::Turno).map(str::to_string),
            fallas,
            peso_neto: cell(Field::PesoNeto).and_then(parse_number),
            temperatura: cell(Field::Temperatura).and_then(parse_number),
            tiempo_descarga_min: minutes_between(inicio_descarga, fin_descarga),
            tiempo_viaje_min: minutes_between(salida_proveedor, llegada_fabrica),
            tiempo_espera_min: minutes_between(llegada_fabrica, inicio_descarga),
            dia: salida_proveedor.map(|t| t.date()),
            inicio_descarga,
            fin_descarga,
            salida_proveedor,
            llegada_fabrica,
            extra: extra_idx.iter().map(|&i| row[i].clone()).collect(),
        });
    }

    for (field, n) in &unparsed {
        log::warn!("{n} unparsable values in '{}' set to missing", field.header());
    }
    log::info!(
        "Cleaned {} of {} rows ({} excluded), FALLAS is {:?}",
        rows.len(),
        total,
        total - rows.len(),
        failure_kind
    );

    Ok(ShipmentTable {
        columns,
        extra_columns,
        rows,
        failure_kind,
    })
}

fn field_text<'a>(
    row: &'a [Option<String>],
    idx: &HashMap<Field, usize>,
    field: Field,
) -> Option<&'a str> {
    row[idx[&field]].as_deref()
}

/// FALLAS cells that hold a value.  NaN and infinity spellings count as missing.
fn present_failures(raw: &RawTable, col: usize) -> impl Iterator<Item = &str> {
    raw.rows
        .iter()
        .filter_map(move |r| r[col].as_deref())
        .filter(|s| !is_non_finite(s))
}

/// FALLAS is numeric when every present value parses as a number.  An
/// all-missing column counts as numeric.
fn infer_failure_kind(raw: &RawTable, col: usize) -> FailureKind {
    let numeric = present_failures(raw, col).all(|s| parse_number(s).is_some());
    if numeric {
        FailureKind::Numeric
    } else {
        FailureKind::Text
    }
}

fn is_non_finite(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok_and(|v| !v.is_finite())
}

/// Parse a finite number, accepting a single decimal comma (`"1234,5"`).
/// NaN and infinities are missing; `-0` reads as `0`.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let parsed = match s.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) if s.matches(',').count() == 1 && !s.contains('.') => {
            s.replace(',', ".").parse::<f64>().ok()
        }
        Err(_) => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .map(|v| if v == 0.0 { 0.0 } else { v })
}
