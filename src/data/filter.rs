use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{Category, ShipmentTable};

// ---------------------------------------------------------------------------
// Selections: one optional value per categorical dimension
// ---------------------------------------------------------------------------

/// The user's current choice for each selector.  `None` means "all", so a
/// real category value can never be mistaken for the no-filter marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selections {
    pub linea: Option<String>,
    pub supervisor: Option<String>,
    pub tipo_acero: Option<String>,
    pub transporte: Option<String>,
}

impl Selections {
    pub fn get(&self, category: Category) -> Option<&str> {
        match category {
            Category::Linea => self.linea.as_deref(),
            Category::Supervisor => self.supervisor.as_deref(),
            Category::TipoAcero => self.tipo_acero.as_deref(),
            Category::Transporte => self.transporte.as_deref(),
        }
    }

    pub fn set(&mut self, category: Category, value: Option<String>) {
        let slot = match category {
            Category::Linea => &mut self.linea,
            Category::Supervisor => &mut self.supervisor,
            Category::TipoAcero => &mut self.tipo_acero,
            Category::Transporte => &mut self.transporte,
        };
        *slot = value;
    }

    /// Whether every selector is on "all".
    pub fn is_unfiltered(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_none())
    }

    pub fn reset(&mut self) {
        *self = Selections::default();
    }
}

/// Keep the shipments matching every active selection (exact,
/// case-sensitive).  An unmatched value yields an empty table.
pub fn apply_filters(table: &ShipmentTable, selections: &Selections) -> ShipmentTable {
    let active: Vec<(Category, &str)> = Category::ALL
        .iter()
        .filter_map(|c| selections.get(*c).map(|v| (*c, v)))
        .collect();

    let rows = table
        .rows
        .iter()
        .filter(|sh| active.iter().all(|(c, v)| sh.category(*c) == *v))
        .cloned()
        .collect();
    table.with_rows(rows)
}

/// Sorted unique values of a categorical column, for populating a selector.
pub fn category_domain(table: &ShipmentTable, category: Category) -> Vec<String> {
    table
        .rows
        .iter()
        .map(|sh| sh.category(category))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testing::{shipment, table_of};

    fn sample() -> ShipmentTable {
        table_of(vec![
            shipment("A", "Juan", "ACERO AL CARBONO", "Camión"),
            shipment("A", "Laura", "ACERO AL CARBONO", "Tren"),
            shipment("B", "Juan", "ACERO ALEADO", "Camión"),
            shipment("Línea B", "Sin dato", "Sin dato", "Sin dato"),
        ])
    }

    fn select(pairs: &[(Category, &str)]) -> Selections {
        let mut s = Selections::default();
        for (c, v) in pairs {
            s.set(*c, Some(v.to_string()));
        }
        s
    }

    #[test]
    fn all_selectors_on_all_returns_full_table() {
        let t = sample();
        let selections = Selections::default();
        assert!(selections.is_unfiltered());
        assert_eq!(apply_filters(&t, &selections), t);
    }

    #[test]
    fn selections_combine_with_and() {
        let t = sample();
        let out = apply_filters(&t, &select(&[(Category::Linea, "A"), (Category::Supervisor, "Juan")]));
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows[0].transporte, "Camión");
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = sample();
        let s = select(&[(Category::Transporte, "Camión")]);
        let once = apply_filters(&t, &s);
        assert_eq!(apply_filters(&once, &s), once);
    }

    #[test]
    fn filter_order_does_not_matter() {
        let t = sample();
        let f = select(&[(Category::Linea, "A")]);
        let g = select(&[(Category::TipoAcero, "ACERO AL CARBONO")]);
        let fg = apply_filters(&apply_filters(&t, &f), &g);
        let gf = apply_filters(&apply_filters(&t, &g), &f);
        assert_eq!(fg, gf);
        assert_eq!(fg.len(), 2);
    }

    #[test]
    fn unmatched_or_wrong_case_value_yields_empty() {
        let t = sample();
        assert!(apply_filters(&t, &select(&[(Category::Linea, "a")])).is_empty());
        assert!(apply_filters(&t, &select(&[(Category::Supervisor, "Nadie")])).is_empty());
    }

    #[test]
    fn domain_is_sorted_and_unique() {
        let t = sample();
        assert_eq!(category_domain(&t, Category::Linea), vec!["A", "B", "Línea B"]);
        assert_eq!(
            category_domain(&t, Category::Transporte),
            vec!["Camión", "Sin dato", "Tren"]
        );
    }

    #[test]
    fn reset_clears_every_selector() {
        let mut s = select(&[(Category::Linea, "A"), (Category::Transporte, "Tren")]);
        assert!(!s.is_unfiltered());
        s.reset();
        assert!(s.is_unfiltered());
    }
}
