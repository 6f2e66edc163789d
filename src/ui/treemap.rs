use eframe::egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Ui};

use super::plot::no_data;
use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Squarified layout
// ---------------------------------------------------------------------------

/// Worst aspect ratio of a row of areas laid along a side of length `side`.
fn worst_ratio(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    if sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let side2 = side * side;
    row.iter()
        .map(|&a| {
            if a <= 0.0 {
                f64::INFINITY
            } else {
                (side2 * a / (sum * sum)).max(sum * sum / (side2 * a))
            }
        })
        .fold(0.0, f64::max)
}

/// Split `bounds` into one rectangle per value, areas proportional to the
/// values, keeping blocks close to square.  Values should be sorted
/// largest first.
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let total: f64 = values.iter().sum();
    let area = (bounds.width() * bounds.height()) as f64;
    if total <= 0.0 || area <= 0.0 {
        return vec![Rect::from_min_size(bounds.min, vec2(0.0, 0.0)); values.len()];
    }

    let areas: Vec<f64> = values.iter().map(|v| v / total * area).collect();
    let mut out = Vec::with_capacity(values.len());
    let mut free = bounds;
    let mut start = 0;

    while start < areas.len() {
        let side = free.width().min(free.height()) as f64;
        let mut end = start + 1;
        while end < areas.len()
            && worst_ratio(&areas[start..=end], side) <= worst_ratio(&areas[start..end], side)
        {
            end += 1;
        }

        let row = &areas[start..end];
        let row_sum: f64 = row.iter().sum();
        if free.width() >= free.height() {
            // Column on the left edge.
            let h = free.height() as f64;
            let w = if h > 0.0 { row_sum / h } else { 0.0 };
            let mut y = free.top();
            for a in row {
                let rh = if w > 0.0 { (a / w) as f32 } else { 0.0 };
                out.push(Rect::from_min_size(pos2(free.left(), y), vec2(w as f32, rh)));
                y += rh;
            }
            free.min.x = (free.min.x + w as f32).min(free.max.x);
        } else {
            // Row along the top edge.
            let w = free.width() as f64;
            let h = if w > 0.0 { row_sum / w } else { 0.0 };
            let mut x = free.left();
            for a in row {
                let rw = if h > 0.0 { (a / h) as f32 } else { 0.0 };
                out.push(Rect::from_min_size(pos2(x, free.top()), vec2(rw, h as f32)));
                x += rw;
            }
            free.min.y = (free.min.y + h as f32).min(free.max.y);
        }
        start = end;
    }
    out
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Failures per transport mode as a treemap.
pub fn failure_treemap(ui: &mut Ui, counts: &[(String, usize)], colors: &ColorMap) {
    if counts.is_empty() {
        no_data(ui, "No hay datos de fallas para mostrar el treemap.");
        return;
    }

    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), 280.0), Sense::hover());
    let painter = ui.painter_at(rect);

    let values: Vec<f64> = counts.iter().map(|(_, n)| *n as f64).collect();
    for ((label, n), block) in counts.iter().zip(squarify(&values, rect)) {
        let block = block.shrink(1.0);
        painter.rect_filled(block, 2.0, colors.color_for(label));
        if block.width() > 48.0 && block.height() > 32.0 {
            painter.text(
                block.left_top() + vec2(6.0, 6.0),
                Align2::LEFT_TOP,
                format!("{label}\n{n}"),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::from_min_size(pos2(10.0, 20.0), vec2(600.0, 400.0))
    }

    #[test]
    fn areas_are_proportional_and_cover_bounds() {
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&values, bounds());
        assert_eq!(rects.len(), values.len());

        let total: f64 = values.iter().sum();
        let full = 600.0 * 400.0;
        let mut covered = 0.0;
        for (r, v) in rects.iter().zip(values) {
            let a = (r.width() * r.height()) as f64;
            assert!((a - v / total * full).abs() < 1.0, "area {a} for value {v}");
            assert!(bounds().expand(0.01).contains_rect(*r));
            covered += a;
        }
        assert!((covered - full).abs() < 1.0);
    }

    #[test]
    fn single_value_fills_everything() {
        let rects = squarify(&[5.0], bounds());
        assert_eq!(rects.len(), 1);
        assert!((rects[0].width() - 600.0).abs() < 1e-3);
        assert!((rects[0].height() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn blocks_do_not_overlap() {
        let rects = squarify(&[5.0, 3.0, 3.0, 1.0], bounds());
        for i in 0..rects.len() {
            for j in i + 1..rects.len() {
                let overlap = rects[i].intersect(rects[j]);
                let area = overlap.width().max(0.0) * overlap.height().max(0.0);
                assert!(area < 0.5, "rects {i} and {j} overlap by {area}");
            }
        }
    }

    #[test]
    fn zero_total_gives_empty_blocks() {
        let rects = squarify(&[0.0, 0.0], bounds());
        assert!(rects.iter().all(|r| r.width() == 0.0 && r.height() == 0.0));
    }
}
