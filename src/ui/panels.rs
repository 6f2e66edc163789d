use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::export_table;
use crate::data::metrics::{
    format_mean, format_rate, format_thousands, FailureCount, MetricsSummary,
};
use crate::data::model::{Category, FailureKind};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_rows = state.filtered.as_ref().is_some_and(|t| !t.is_empty());
            if ui
                .add_enabled(has_rows, egui::Button::new("Exportar CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.metrics.is_some(), egui::Button::new("Copiar resumen (JSON)"))
                .clicked()
            {
                if let Some(json) = state.summary_json() {
                    ui.ctx().copy_text(json);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(filtered)) = (&state.table, &state.filtered) {
            ui.label(format!(
                "{} camiones cargados, {} visibles",
                table.len(),
                filtered.len()
            ));
        }

        ui.separator();

        if ui
            .add_enabled(
                !state.selections.is_unfiltered(),
                egui::Button::new("Restablecer filtros"),
            )
            .clicked()
        {
            state.selections.reset();
            state.refilter();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Filter row – one selector per category
// ---------------------------------------------------------------------------

pub fn filter_row(ui: &mut Ui, state: &mut AppState) {
    ui.columns(Category::ALL.len(), |cols: &mut [Ui]| {
        for (ui, category) in cols.iter_mut().zip(Category::ALL) {
            let options = state.domain(category).to_vec();
            let mut choice = state.selections.get(category).map(str::to_string);

            ui.label(category.caption());
            egui::ComboBox::from_id_salt(category.caption())
                .selected_text(choice.as_deref().unwrap_or(category.all_label()))
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut choice, None, category.all_label());
                    for value in &options {
                        ui.selectable_value(&mut choice, Some(value.clone()), value);
                    }
                });

            state.select(category, choice);
        }
    });
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

fn tile(ui: &mut Ui, label: &str, value: String) -> egui::Response {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(24.0).strong());
    })
    .response
}

/// Two rows of four tiles.  Failures use the non-null definition for both
/// the count and the rate.
pub fn metric_tiles(ui: &mut Ui, metrics: &MetricsSummary) {
    let failures = FailureCount::NonNull;

    ui.columns(4, |cols: &mut [Ui]| {
        tile(&mut cols[0], "Cantidad Total de Camiones", metrics.total_trucks.to_string());
        let failures_tile = tile(
            &mut cols[1],
            "Cantidad de Fallas",
            metrics.failures_non_null.to_string(),
        );
        if metrics.failure_kind == FailureKind::Numeric {
            failures_tile.on_hover_text(format!(
                "Suma de FALLAS: {} · promedio: {}",
                metrics.total_failures(FailureCount::SumIfNumeric),
                format_mean(metrics.avg_failures)
            ));
        }
        tile(
            &mut cols[2],
            "Fallas / Camiones",
            format_rate(metrics.failure_rate(failures)),
        );
        tile(
            &mut cols[3],
            "Peso Neto Total",
            format_thousands(metrics.net_weight_sum),
        );
    });

    ui.columns(4, |cols: &mut [Ui]| {
        tile(&mut cols[0], "Promedio en Viaje (min)", format_mean(metrics.avg_travel_min));
        tile(&mut cols[1], "Promedio en Espera (min)", format_mean(metrics.avg_wait_min));
        tile(
            &mut cols[2],
            "Promedio de Descarga (min)",
            format_mean(metrics.avg_unload_min),
        );
        tile(
            &mut cols[3],
            "Promedio en Temperatura C°",
            format_mean(metrics.avg_temperature),
        );
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos de logística")
        .add_filter("Archivos soportados", &["csv", "txt", "json"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        // Errors are already reported through the status message.
        let _ = state.load(&path);
    }
}

fn export_file_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Exportar datos filtrados")
        .set_file_name("datos_filtrados.csv")
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };
    export_filtered(state, &path);
}

fn export_filtered(state: &mut AppState, path: &Path) {
    let Some(filtered) = &state.filtered else {
        return;
    };
    if let Err(e) = export_table(filtered, path, state.config.delimiter) {
        log::error!("Export failed: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
