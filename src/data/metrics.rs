use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use super::model::{FailureKind, ShipmentTable};

/// Which definition of "number of failures" to use.
///
/// The dashboard has always shown [`FailureCount::NonNull`] on the failure
/// tile, while the historic rate computation used [`FailureCount::SumIfNumeric`].
/// Both are exposed so callers pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureCount {
    /// Number of shipments with any FALLAS value.
    NonNull,
    /// Sum of FALLAS when the column is numeric, otherwise the non-null count.
    SumIfNumeric,
}

/// Headline numbers for the filtered shipments.  Means over zero values
/// are `None` ("no data"), never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_trucks: usize,
    pub failure_kind: FailureKind,
    pub failures_non_null: usize,
    /// Present only when FALLAS is numeric.
    pub failures_numeric_sum: Option<f64>,
    pub avg_failures: Option<f64>,
    pub net_weight_sum: f64,
    pub avg_wait_min: Option<f64>,
    pub avg_unload_min: Option<f64>,
    pub avg_travel_min: Option<f64>,
    pub avg_temperature: Option<f64>,
}

impl MetricsSummary {
    pub fn total_failures(&self, definition: FailureCount) -> f64 {
        match (definition, self.failures_numeric_sum) {
            (FailureCount::SumIfNumeric, Some(sum)) => sum,
            _ => self.failures_non_null as f64,
        }
    }

    /// Failures per hundred trucks; 0 when there are no trucks.
    pub fn failure_rate(&self, definition: FailureCount) -> f64 {
        if self.total_trucks == 0 {
            return 0.0;
        }
        self.total_failures(definition) / self.total_trucks as f64 * 100.0
    }
}

pub fn compute_metrics(table: &ShipmentTable) -> MetricsSummary {
    let rows = &table.rows;

    let failures_non_null = rows.iter().filter(|r| !r.fallas.is_null()).count();
    let (failures_numeric_sum, avg_failures) = match table.failure_kind {
        FailureKind::Numeric => (
            Some(rows.iter().filter_map(|r| r.fallas.as_f64()).sum::<f64>()),
            mean(rows.iter().map(|r| r.fallas.as_f64())),
        ),
        FailureKind::Text => (None, None),
    };

    MetricsSummary {
        total_trucks: rows.len(),
        failure_kind: table.failure_kind,
        failures_non_null,
        failures_numeric_sum,
        avg_failures,
        net_weight_sum: rows.iter().filter_map(|r| r.peso_neto).sum::<f64>(),
        avg_wait_min: mean(rows.iter().map(|r| r.tiempo_espera_min)),
        avg_unload_min: mean(rows.iter().map(|r| r.tiempo_descarga_min)),
        avg_travel_min: mean(rows.iter().map(|r| r.tiempo_viaje_min)),
        avg_temperature: mean(rows.iter().map(|r| r.temperatura)),
    }
}

/// Mean of the present values, `None` if there are none.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Tile formatting
// ---------------------------------------------------------------------------

pub const NO_DATA: &str = "Sin datos";

/// One decimal, or the no-data label.
pub fn format_mean(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| NO_DATA.to_string())
}

pub fn format_rate(rate: f64) -> String {
    format!("{rate:.1} %")
}

/// Rounded integer with comma thousands separators, e.g. `1,234,567`.
pub fn format_thousands(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::data::testing::{shipment, table_of};

    #[test]
    fn empty_table_has_zero_rate_and_no_means() {
        let m = compute_metrics(&table_of(Vec::new()));
        assert_eq!(m.total_trucks, 0);
        assert_eq!(m.failure_rate(FailureCount::NonNull), 0.0);
        assert_eq!(m.failure_rate(FailureCount::SumIfNumeric), 0.0);
        assert_eq!(m.net_weight_sum, 0.0);
        assert_eq!(m.avg_wait_min, None);
        assert_eq!(m.avg_temperature, None);
        assert_eq!(format_mean(m.avg_unload_min), "Sin datos");

        let mut numeric = table_of(Vec::new());
        numeric.failure_kind = FailureKind::Numeric;
        let m = compute_metrics(&numeric);
        assert_eq!(m.failures_numeric_sum, Some(0.0));
        assert_eq!(m.avg_failures, None);
        assert_eq!(m.failure_rate(FailureCount::NonNull), 0.0);
        assert_eq!(m.failure_rate(FailureCount::SumIfNumeric), 0.0);
    }

    #[test]
    fn all_missing_failures() {
        let rows = (0..5).map(|_| shipment("A", "Juan", "C", "Camión")).collect();
        let m = compute_metrics(&table_of(rows));
        assert_eq!(m.total_trucks, 5);
        assert_eq!(m.total_failures(FailureCount::NonNull), 0.0);
        assert_eq!(m.failure_rate(FailureCount::NonNull), 0.0);
    }

    #[test]
    fn text_failures_count_non_null() {
        let mut rows: Vec<_> = (0..4).map(|_| shipment("A", "Juan", "C", "Camión")).collect();
        rows[0].fallas = CellValue::Text("Frenos".into());
        let m = compute_metrics(&table_of(rows));
        assert_eq!(m.failures_numeric_sum, None);
        assert_eq!(m.avg_failures, None);
        assert_eq!(m.total_failures(FailureCount::SumIfNumeric), 1.0);
        assert_eq!(m.failure_rate(FailureCount::NonNull), 25.0);
    }

    #[test]
    fn numeric_failures_expose_both_definitions() {
        let mut rows: Vec<_> = (0..4).map(|_| shipment("A", "Juan", "C", "Camión")).collect();
        rows[0].fallas = CellValue::Integer(3);
        rows[1].fallas = CellValue::Integer(0);
        let mut t = table_of(rows);
        t.failure_kind = FailureKind::Numeric;
        let m = compute_metrics(&t);
        assert_eq!(m.total_failures(FailureCount::NonNull), 2.0);
        assert_eq!(m.total_failures(FailureCount::SumIfNumeric), 3.0);
        assert_eq!(m.failure_rate(FailureCount::SumIfNumeric), 75.0);
        assert_eq!(m.avg_failures, Some(1.5));
    }

    #[test]
    fn means_skip_missing_values() {
        let mut a = shipment("A", "Juan", "C", "Camión");
        a.tiempo_espera_min = Some(10.0);
        a.peso_neto = Some(1000.0);
        a.temperatura = Some(20.0);
        let mut b = shipment("A", "Juan", "C", "Camión");
        b.tiempo_espera_min = Some(20.0);
        b.peso_neto = Some(500.0);
        let c = shipment("A", "Juan", "C", "Camión");
        let m = compute_metrics(&table_of(vec![a, b, c]));
        assert_eq!(m.avg_wait_min, Some(15.0));
        assert_eq!(m.avg_temperature, Some(20.0));
        assert_eq!(m.avg_travel_min, None);
        assert_eq!(m.net_weight_sum, 1500.0);
    }

    #[test]
    fn tile_formatting() {
        assert_eq!(format_thousands(1234567.4), "1,234,567");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(-1000.0), "-1,000");
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_rate(12.345), "12.3 %");
        assert_eq!(format_mean(Some(7.26)), "7.3");
    }
}
