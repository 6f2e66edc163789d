use eframe::egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Ui};

use super::plot::no_data;

const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
const MAX_BAR_HEIGHT: f32 = 36.0;

/// Failure types as a funnel: one centred bar per type, widest first.
pub fn failure_funnel(ui: &mut Ui, counts: &[(String, usize)]) {
    let Some(max) = counts.iter().map(|(_, n)| *n).max().filter(|m| *m > 0) else {
        no_data(ui, "No hay datos de fallas para mostrar el embudo.");
        return;
    };

    let height = (counts.len() as f32 * MAX_BAR_HEIGHT).min(280.0).max(MAX_BAR_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();

    let label_width = rect.width() * 0.3;
    let bar_area = Rect::from_min_max(pos2(rect.left() + label_width, rect.top()), rect.max);
    let row_height = rect.height() / counts.len() as f32;

    for (i, (label, n)) in counts.iter().enumerate() {
        let top = rect.top() + row_height * i as f32;
        let center_y = top + row_height / 2.0;
        let width = bar_area.width() * *n as f32 / max as f32;
        let bar = Rect::from_center_size(
            pos2(bar_area.center().x, center_y),
            vec2(width.max(2.0), row_height * 0.8),
        );
        painter.rect_filled(bar, 0.0, BAR_COLOR);
        painter.text(
            bar.center(),
            Align2::CENTER_CENTER,
            n.to_string(),
            FontId::proportional(12.0),
            Color32::WHITE,
        );
        painter.text(
            pos2(rect.left() + label_width - 8.0, center_y),
            Align2::RIGHT_CENTER,
            label,
            FontId::proportional(13.0),
            text_color,
        );
    }
}
