use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::ShipmentTable;

const ROW_HEIGHT: f32 = 18.0;

/// The filtered shipments, verbatim, one row per truck movement.
pub fn data_table(ui: &mut Ui, table: &ShipmentTable) {
    ScrollArea::horizontal()
        .id_salt("data_table_h")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(420.0)
                .columns(
                    Column::auto().at_least(70.0).clip(true),
                    table.columns.len(),
                )
                .header(22.0, |mut header| {
                    for column in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(&column.name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.len(), |mut row| {
                        let shipment = &table.rows[row.index()];
                        for column in &table.columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(shipment.display(&column.source));
                            });
                        }
                    });
                });
        });
}
