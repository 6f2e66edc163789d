use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::charts::{compute_chart_aggregates, ChartData};
use crate::data::clean::load_and_clean;
use crate::data::error::LoadError;
use crate::data::filter::{apply_filters, category_domain, Selections};
use crate::data::metrics::{compute_metrics, MetricsSummary};
use crate::data::model::{Category, ShipmentTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.  The cleaned table is
/// built once per load; everything below it is recomputed from scratch
/// whenever a selection changes.
pub struct AppState {
    pub config: DashboardConfig,

    /// Cleaned dataset (None until a file loads).
    pub table: Option<ShipmentTable>,

    /// Selector options per category, sorted.
    pub domains: HashMap<Category, Vec<String>>,

    pub selections: Selections,

    /// Rows passing the current selections (cached).
    pub filtered: Option<ShipmentTable>,
    pub metrics: Option<MetricsSummary>,
    pub charts: ChartData,

    pub shift_colors: ColorMap,
    pub transport_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

/// What "copy summary" puts on the clipboard.
#[derive(Serialize)]
struct Snapshot<'a> {
    selections: &'a Selections,
    metrics: &'a MetricsSummary,
    charts: &'a ChartData,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            domains: HashMap::new(),
            selections: Selections::default(),
            filtered: None,
            metrics: None,
            charts: ChartData::default(),
            shift_colors: ColorMap::default(),
            transport_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load and clean `path`.  On failure the previous dataset stays and the
    /// error becomes the status message.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_and_clean(path, self.config.delimiter) {
            Ok(table) => {
                log::info!("Loaded {} shipments from {}", table.len(), path.display());
                self.config.data_path = path.to_path_buf();
                self.set_dataset(table);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly cleaned dataset and reset the selections.
    pub fn set_dataset(&mut self, table: ShipmentTable) {
        self.domains = Category::ALL
            .iter()
            .map(|c| (*c, category_domain(&table, *c)))
            .collect();
        self.shift_colors = ColorMap::new(table.rows.iter().filter_map(|r| r.turno.as_deref()));
        self.transport_colors = ColorMap::new(table.rows.iter().map(|r| r.transporte.as_str()));

        self.selections.reset();
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered table and everything derived from it.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let filtered = apply_filters(table, &self.selections);
        log::debug!(
            "Selections {:?} keep {} of {} shipments",
            self.selections,
            filtered.len(),
            table.len()
        );
        self.metrics = Some(compute_metrics(&filtered));
        self.charts = compute_chart_aggregates(&filtered);
        self.filtered = Some(filtered);
    }

    /// Change one selector; recomputes only when the value actually changed.
    pub fn select(&mut self, category: Category, value: Option<String>) {
        if self.selections.get(category) == value.as_deref() {
            return;
        }
        self.selections.set(category, value);
        self.refilter();
    }

    pub fn domain(&self, category: Category) -> &[String] {
        self.domains.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Current selections, metrics and chart data as pretty JSON.
    pub fn summary_json(&self) -> Option<String> {
        let metrics = self.metrics.as_ref()?;
        let snapshot = Snapshot {
            selections: &self.selections,
            metrics,
            charts: &self.charts,
        };
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Failed to serialise summary: {e}");
                None
            }
        }
    }
}
