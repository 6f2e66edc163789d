use eframe::egui::{self, RichText, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{funnel, panels, plot, table, treemap};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SteelHaulApp {
    pub state: AppState,
}

impl SteelHaulApp {
    /// Opens the configured data file right away when it exists.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        let path = state.config.data_path.clone();
        if path.exists() {
            // A failure is kept as the status message.
            let _ = state.load(&path);
        } else {
            log::warn!("{} not found, waiting for a file", path.display());
            state.status_message = Some(format!(
                "No se encontró {} (Archivo → Abrir…)",
                path.display()
            ));
        }
        Self { state }
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(6.0);
    ui.heading(title);
}

impl eframe::App for SteelHaulApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: filters, tiles, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.heading(
                            RichText::new(
                                "Monitoreo de Transporte y Fallas – Industria Metalúrgica",
                            )
                            .size(26.0)
                            .strong(),
                        );
                    });

                    if self.state.table.is_none() {
                        ui.centered_and_justified(|ui: &mut Ui| {
                            ui.label("Abra un archivo para ver el tablero  (Archivo → Abrir…)");
                        });
                        return;
                    }

                    panels::filter_row(ui, &mut self.state);
                    ui.separator();

                    let state = &self.state;
                    if let Some(metrics) = &state.metrics {
                        panels::metric_tiles(ui, metrics);
                    }

                    let charts = &state.charts;
                    ui.columns(2, |cols: &mut [Ui]| {
                        section(&mut cols[0], "Cantidad de Camiones por Día");
                        plot::daily_trend(&mut cols[0], &charts.daily_counts);
                        section(&mut cols[1], "Cantidad de Camiones por Turno");
                        plot::shift_donut(&mut cols[1], &charts.shift_counts, &state.shift_colors);
                    });
                    ui.columns(2, |cols: &mut [Ui]| {
                        section(&mut cols[0], "Embudo: Cantidad de Fallas por Tipo");
                        funnel::failure_funnel(&mut cols[0], &charts.failure_type_counts);
                        section(&mut cols[1], "Treemap: Cantidad de Fallas por Transporte");
                        treemap::failure_treemap(
                            &mut cols[1],
                            &charts.failure_by_transport,
                            &state.transport_colors,
                        );
                    });

                    section(ui, "Datos Filtrados");
                    match &state.filtered {
                        Some(filtered) if !filtered.is_empty() => table::data_table(ui, filtered),
                        _ => {
                            ui.label("Ningún camión coincide con los filtros seleccionados.");
                        }
                    }
                });
        });
    }
}
