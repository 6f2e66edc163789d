//! Builders shared by the pipeline unit tests.

use chrono::NaiveDate;

use super::model::{CellValue, ColumnSource, FailureKind, Field, Shipment, ShipmentTable, TableColumn};

pub fn shipment(linea: &str, supervisor: &str, tipo_acero: &str, transporte: &str) -> Shipment {
    Shipment {
        linea: linea.to_string(),
        supervisor: supervisor.to_string(),
        tipo_acero: tipo_acero.to_string(),
        transporte: transporte.to_string(),
        turno: None,
        fallas: CellValue::Null,
        peso_neto: None,
        temperatura: None,
        inicio_descarga: None,
        fin_descarga: None,
        salida_proveedor: None,
        llegada_fabrica: None,
        tiempo_descarga_min: None,
        tiempo_viaje_min: None,
        tiempo_espera_min: None,
        dia: None,
        extra: Vec::new(),
    }
}

pub fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn table_of(rows: Vec<Shipment>) -> ShipmentTable {
    let columns = Field::REQUIRED
        .into_iter()
        .chain(Field::DERIVED)
        .map(|f| TableColumn {
            name: f.header().to_string(),
            source: ColumnSource::Field(f),
        })
        .collect();
    ShipmentTable {
        columns,
        extra_columns: Vec::new(),
        rows,
        failure_kind: FailureKind::Text,
    }
}
