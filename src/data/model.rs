use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// CellValue – a typed FALLAS cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe would infer.
/// Used as a grouping key, so equality must agree with `Hash`: floats
/// compare by bit pattern.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Null, CellValue::Null) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// Inferred type of the FALLAS column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FailureKind {
    Numeric,
    Text,
}

// ---------------------------------------------------------------------------
// Field – every column the pipeline knows by name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Linea,
    Supervisor,
    TipoAcero,
    Transporte,
    Turno,
    Fallas,
    PesoNeto,
    Temperatura,
    InicioDescarga,
    FinDescarga,
    SalidaProveedor,
    LlegadaFabrica,
    TiempoDescargaMin,
    TiempoViajeMin,
    TiempoEsperaMin,
    Dia,
}

impl Field {
    /// Columns that must be present in the source file.
    pub const REQUIRED: [Field; 12] = [
        Field::Linea,
        Field::Supervisor,
        Field::TipoAcero,
        Field::Transporte,
        Field::Turno,
        Field::Fallas,
        Field::PesoNeto,
        Field::Temperatura,
        Field::InicioDescarga,
        Field::FinDescarga,
        Field::SalidaProveedor,
        Field::LlegadaFabrica,
    ];

    /// Columns computed after cleaning, appended after the source columns.
    pub const DERIVED: [Field; 4] = [
        Field::TiempoDescargaMin,
        Field::TiempoViajeMin,
        Field::TiempoEsperaMin,
        Field::Dia,
    ];

    /// Header text exactly as it appears in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Field::Linea => "LINEA",
            Field::Supervisor => "SUPERVISOR",
            Field::TipoAcero => "TIPO_ACERO",
            Field::Transporte => "TRANSPORTE",
            Field::Turno => "TURNO",
            Field::Fallas => "FALLAS",
            Field::PesoNeto => "PESO NETO",
            Field::Temperatura => "TEMPERATURA",
            Field::InicioDescarga => "INICIO DESCARGA",
            Field::FinDescarga => "FIN DESCARGA",
            Field::SalidaProveedor => "SALIDA DEL PROVEEDOR",
            Field::LlegadaFabrica => "LLEGADA A FÁBRICA",
            Field::TiempoDescargaMin => "TIEMPO_DESCARGA_MIN",
            Field::TiempoViajeMin => "TIEMPO_VIAJE_MIN",
            Field::TiempoEsperaMin => "TIEMPO_ESPERA_MIN",
            Field::Dia => "DIA",
        }
    }

    pub fn from_header(name: &str) -> Option<Field> {
        Field::REQUIRED
            .into_iter()
            .chain(Field::DERIVED)
            .find(|f| f.header() == name)
    }
}

// ---------------------------------------------------------------------------
// Category – the four filterable dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Linea,
    Supervisor,
    TipoAcero,
    Transporte,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Linea,
        Category::Supervisor,
        Category::TipoAcero,
        Category::Transporte,
    ];

    pub fn field(self) -> Field {
        match self {
            Category::Linea => Field::Linea,
            Category::Supervisor => Field::Supervisor,
            Category::TipoAcero => Field::TipoAcero,
            Category::Transporte => Field::Transporte,
        }
    }

    /// Replacement for a missing value in this column.
    pub fn sentinel(self) -> &'static str {
        match self {
            Category::Linea => "Línea B",
            Category::Supervisor | Category::TipoAcero | Category::Transporte => "Sin dato",
        }
    }

    /// Label of the "no filter" entry in the selector.
    pub fn all_label(self) -> &'static str {
        match self {
            Category::Linea => "Todas",
            _ => "Todos",
        }
    }

    /// Selector caption.
    pub fn caption(self) -> &'static str {
        match self {
            Category::Linea => "Selecciona Línea",
            Category::Supervisor => "Selecciona Supervisor",
            Category::TipoAcero => "Selecciona Tipo de Acero",
            Category::Transporte => "Selecciona Transporte",
        }
    }
}

// ---------------------------------------------------------------------------
// Shipment – one cleaned row
// ---------------------------------------------------------------------------

/// One truck movement after cleaning.  Categorical columns are never
/// missing; everything else may be.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub linea: String,
    pub supervisor: String,
    pub tipo_acero: String,
    pub transporte: String,
    pub turno: Option<String>,
    pub fallas: CellValue,
    pub peso_neto: Option<f64>,
    pub temperatura: Option<f64>,
    pub inicio_descarga: Option<NaiveDateTime>,
    pub fin_descarga: Option<NaiveDateTime>,
    pub salida_proveedor: Option<NaiveDateTime>,
    pub llegada_fabrica: Option<NaiveDateTime>,
    pub tiempo_descarga_min: Option<f64>,
    pub tiempo_viaje_min: Option<f64>,
    pub tiempo_espera_min: Option<f64>,
    pub dia: Option<NaiveDate>,
    /// Pass-through values of non-required source columns, aligned with
    /// [`ShipmentTable::extra_columns`].
    pub extra: Vec<Option<String>>,
}

impl Shipment {
    pub fn category(&self, category: Category) -> &str {
        match category {
            Category::Linea => &self.linea,
            Category::Supervisor => &self.supervisor,
            Category::TipoAcero => &self.tipo_acero,
            Category::Transporte => &self.transporte,
        }
    }

    /// Text shown in the data table and written on export.  Missing
    /// values render as an empty string.
    pub fn display(&self, column: &ColumnSource) -> String {
        fn ts(v: &Option<NaiveDateTime>) -> String {
            v.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default()
        }
        fn num(v: &Option<f64>) -> String {
            v.map(|x| x.to_string()).unwrap_or_default()
        }

        let field = match column {
            ColumnSource::Extra(i) => {
                return self.extra.get(*i).cloned().flatten().unwrap_or_default();
            }
            ColumnSource::Field(f) => *f,
        };
        match field {
            Field::Linea => self.linea.clone(),
            Field::Supervisor => self.supervisor.clone(),
            Field::TipoAcero => self.tipo_acero.clone(),
            Field::Transporte => self.transporte.clone(),
            Field::Turno => self.turno.clone().unwrap_or_default(),
            Field::Fallas => self.fallas.to_string(),
            Field::PesoNeto => num(&self.peso_neto),
            Field::Temperatura => num(&self.temperatura),
            Field::InicioDescarga => ts(&self.inicio_descarga),
            Field::FinDescarga => ts(&self.fin_descarga),
            Field::SalidaProveedor => ts(&self.salida_proveedor),
            Field::LlegadaFabrica => ts(&self.llegada_fabrica),
            Field::TiempoDescargaMin => num(&self.tiempo_descarga_min),
            Field::TiempoViajeMin => num(&self.tiempo_viaje_min),
            Field::TiempoEsperaMin => num(&self.tiempo_espera_min),
            Field::Dia => self.dia.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ShipmentTable – a cleaned (or filtered) table
// ---------------------------------------------------------------------------

/// Where a displayed column takes its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Field(Field),
    Extra(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub name: String,
    pub source: ColumnSource,
}

/// An immutable table of cleaned shipments.  Filtering produces a new
/// table sharing the column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentTable {
    /// Display order: source columns, then derived columns.
    pub columns: Vec<TableColumn>,
    /// Names of non-required source columns, indexing `Shipment::extra`.
    pub extra_columns: Vec<String>,
    pub rows: Vec<Shipment>,
    pub failure_kind: FailureKind,
}

impl ShipmentTable {
    /// Number of shipments.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new table with the same layout and the given rows.
    pub fn with_rows(&self, rows: Vec<Shipment>) -> Self {
        ShipmentTable {
            columns: self.columns.clone(),
            extra_columns: self.extra_columns.clone(),
            rows,
            failure_kind: self.failure_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_preserves_diacritics() {
        assert_eq!(Field::from_header("LLEGADA A FÁBRICA"), Some(Field::LlegadaFabrica));
        assert_eq!(Field::from_header("LLEGADA A FABRICA"), None);
        assert_eq!(Field::from_header("DIA"), Some(Field::Dia));
    }

    #[test]
    fn null_cells_display_empty() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Integer(3).to_string(), "3");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn equal_cells_hash_alike() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(v: &CellValue) -> u64 {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        }
        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(hash_of(&nan), hash_of(&nan.clone()));
        assert_ne!(CellValue::Float(0.0), CellValue::Float(-0.0));
        assert_ne!(CellValue::Integer(1), CellValue::Float(1.0));
        assert_eq!(CellValue::Text("a".into()), CellValue::Text("a".into()));
    }
}
