use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::ShipmentTable;

/// Aggregates behind the four charts.  Each list is empty when there is
/// nothing to show; the view decides how to render that.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    /// Trucks per departure day, oldest first.
    pub daily_counts: Vec<(NaiveDate, usize)>,
    /// Trucks per shift, most frequent first.
    pub shift_counts: Vec<(String, usize)>,
    /// Shipments per failure type, most frequent first.
    pub failure_type_counts: Vec<(String, usize)>,
    /// Shipments with a failure, per transport mode, most frequent first.
    pub failure_by_transport: Vec<(String, usize)>,
}

pub fn compute_chart_aggregates(table: &ShipmentTable) -> ChartData {
    let rows = &table.rows;

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for day in rows.iter().filter_map(|r| r.dia) {
        *per_day.entry(day).or_default() += 1;
    }

    let shift_counts = value_counts(rows.iter().filter_map(|r| r.turno.clone()));

    let failure_type_counts = value_counts(rows.iter().map(|r| &r.fallas).filter(|f| !f.is_null()))
        .into_iter()
        .map(|(value, n)| (value.to_string(), n))
        .filter(|(label, _)| !label.is_empty())
        .collect();

    let failure_by_transport = value_counts(
        rows.iter()
            .filter(|r| !r.fallas.is_null())
            .map(|r| r.transporte.clone()),
    );

    ChartData {
        daily_counts: per_day.into_iter().collect(),
        shift_counts,
        failure_type_counts,
        failure_by_transport,
    }
}

/// Frequency of each distinct value, most frequent first.  Ties keep the
/// order in which values first appear.
pub fn value_counts<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut slot: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for v in values {
        match slot.get(&v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(v.clone(), counts.len());
                counts.push((v, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
