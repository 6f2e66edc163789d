use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::ShipmentTable;

/// Write `table` as delimited text with the same columns and cell text the
/// data grid shows.
pub fn export_table(table: &ShipmentTable, path: &Path, delimiter: u8) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_delimited(table, file, delimiter)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

pub fn write_delimited<W: Write>(table: &ShipmentTable, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(table.columns.iter().map(|c| row.display(&c.source)))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::loader::read_delimited;

    const INPUT: &str = "LINEA;SUPERVISOR;TIPO_ACERO;TRANSPORTE;TURNO;FALLAS;PESO NETO;TEMPERATURA;\
INICIO DESCARGA;FIN DESCARGA;SALIDA DEL PROVEEDOR;LLEGADA A FÁBRICA\n\
A;Juan;ACERO AL CARBONO;Tren;Mañana;;1000;35.5;01/03/2024 10:00;01/03/2024 10:30;01/03/2024 06:00;01/03/2024 09:15\n";

    #[test]
    fn exported_rows_carry_derived_columns() {
        let table = clean(read_delimited(INPUT.as_bytes(), b';').unwrap()).unwrap();
        let mut out = Vec::new();
        write_delimited(&table, &mut out, b';').unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().ends_with(";TIEMPO_DESCARGA_MIN;TIEMPO_VIAJE_MIN;TIEMPO_ESPERA_MIN;DIA"));
        assert_eq!(
            lines.next().unwrap(),
            "A;Juan;ACERO AL CARBONO;Tren;Mañana;;1000;35.5;2024-03-01 10:00:00;2024-03-01 10:30:00;\
2024-03-01 06:00:00;2024-03-01 09:15:00;30;195;45;2024-03-01"
        );
    }

    #[test]
    fn export_to_file() {
        let table = clean(read_delimited(INPUT.as_bytes(), b';').unwrap()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtrado.csv");
        export_table(&table, &path, b';').unwrap();
        let reread = clean(read_delimited(std::fs::File::open(&path).unwrap(), b';').unwrap()).unwrap();
        assert_eq!(reread.rows[0].tiempo_descarga_min, Some(30.0));
        assert_eq!(reread.rows[0].linea, "A");
    }
}
