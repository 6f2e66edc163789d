use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::color::ColorMap;
use crate::data::metrics::NO_DATA;

const CHART_HEIGHT: f32 = 280.0;

pub fn no_data(ui: &mut Ui, message: &str) {
    ui.allocate_ui(vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(message);
        });
    });
}

// ---------------------------------------------------------------------------
// Daily trend (line chart)
// ---------------------------------------------------------------------------

fn day_from_axis(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Trucks per departure day, x axis in days since the common era.
pub fn daily_trend(ui: &mut Ui, daily_counts: &[(NaiveDate, usize)]) {
    if daily_counts.is_empty() {
        no_data(ui, NO_DATA);
        return;
    }

    let points: PlotPoints = daily_counts
        .iter()
        .map(|(day, n)| [day.num_days_from_ce() as f64, *n as f64])
        .collect();

    Plot::new("daily_trend")
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .y_axis_label("Cantidad de Camiones")
        .x_axis_formatter(|mark, _range| {
            // Only whole days get a label.
            if (mark.value - mark.value.round()).abs() > 1e-6 {
                return String::new();
            }
            day_from_axis(mark.value)
                .map(|d| d.format("%d/%m").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|_name, point| match day_from_axis(point.x) {
            Some(d) => format!("{}\n{:.0} camiones", d.format("%d/%m/%Y"), point.y),
            None => String::new(),
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Cantidad de Camiones")
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Shift share (donut)
// ---------------------------------------------------------------------------

/// Points of one wedge from `start` sweeping `sweep` radians, split so each
/// polygon stays convex.
fn wedges(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Vec<Pos2>> {
    let pieces = (sweep / FRAC_PI_4 - 1e-3).ceil().max(1.0) as usize;
    let step = sweep / pieces as f32;
    (0..pieces)
        .map(|p| {
            let a0 = start + step * p as f32;
            let segments = ((step / 0.05).ceil() as usize).max(1);
            let mut points = Vec::with_capacity(segments + 2);
            points.push(center);
            for s in 0..=segments {
                let a = a0 + step * s as f32 / segments as f32;
                points.push(center + radius * vec2(a.cos(), a.sin()));
            }
            points
        })
        .collect()
}

/// Share of trucks per shift as a donut with a 50% hole and a legend.
pub fn shift_donut(ui: &mut Ui, shift_counts: &[(String, usize)], colors: &ColorMap) {
    let total: usize = shift_counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        no_data(ui, NO_DATA);
        return;
    }

    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), CHART_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();

    let radius = (rect.height() * 0.45).min(rect.width() * 0.3);
    let center = pos2(rect.left() + radius + 16.0, rect.center().y);

    let mut angle = -FRAC_PI_2;
    for (label, n) in shift_counts {
        let sweep = *n as f32 / total as f32 * TAU;
        let color = colors.color_for(label);
        for points in wedges(center, radius, angle, sweep) {
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }

        let share = *n as f32 / total as f32 * 100.0;
        if share >= 4.0 {
            let mid = angle + sweep / 2.0;
            painter.text(
                center + radius * 0.75 * vec2(mid.cos(), mid.sin()),
                Align2::CENTER_CENTER,
                format!("{share:.1}%"),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
        angle += sweep;
    }
    painter.circle_filled(center, radius * 0.5, ui.visuals().panel_fill);

    // Legend
    let mut y = rect.top() + 12.0;
    let x = center.x + radius + 24.0;
    for (label, n) in shift_counts {
        let swatch = egui::Rect::from_min_size(pos2(x, y - 6.0), vec2(12.0, 12.0));
        painter.rect_filled(swatch, 2.0, colors.color_for(label));
        painter.text(
            pos2(x + 18.0, y),
            Align2::LEFT_CENTER,
            format!("{label} ({n})"),
            FontId::proportional(13.0),
            text_color,
        );
        y += 20.0;
    }
}
