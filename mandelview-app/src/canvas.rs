use eframe::egui;

use mandelview_core::Point;
use mandelview_render::{OffscreenIndicator, Projection};

use crate::app::MandelviewApp;

const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 230, 230);
const OVERLAY_BG: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 160);
const PROGRESS_FILL: egui::Color32 = egui::Color32::from_rgb(80, 200, 255);
const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 180, 220, 200);
const INDICATOR_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 160, 80);

fn to_pos(rect: egui::Rect, p: Point) -> egui::Pos2 {
    egui::pos2(rect.min.x + p.x as f32, rect.min.y + p.y as f32)
}

impl MandelviewApp {
    pub(crate) fn draw_canvas(&self, painter: &egui::Painter, rect: egui::Rect) {
        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        if let Some(projection) = self.session.preview() {
            self.draw_raster(painter, rect, &projection);
            if let Some(indicator) = projection.indicator {
                draw_indicator(painter, rect, &indicator);
            }
        }

        if let Some((start, end)) = self.session.selection() {
            painter.rect_stroke(
                egui::Rect::from_two_pos(to_pos(rect, start), to_pos(rect, end)),
                0.0,
                egui::Stroke::new(1.5, SELECTION_COLOR),
                egui::StrokeKind::Outside,
            );
        }

        if self.session.interface_hidden() {
            return;
        }
        if self.session.is_pending() {
            self.draw_progress(painter, rect);
        }
        if let Some(entry) = self.session.entry() {
            let text = format!("{}: {}_", entry.target().prompt(), entry.text());
            draw_label(
                painter,
                rect.center() - egui::vec2(0.0, 40.0),
                egui::Align2::CENTER_CENTER,
                text,
            );
        }
        self.draw_status(painter, rect);
    }

    fn draw_raster(&self, painter: &egui::Painter, rect: egui::Rect, projection: &Projection) {
        let (Some((tex, _)), Some(source), Some(dest)) =
            (self.texture.as_ref(), projection.source, projection.dest)
        else {
            return;
        };
        let [tw, th] = tex.size();
        if tw == 0 || th == 0 {
            return;
        }
        let (tw, th) = (tw as f32, th as f32);
        let uv = egui::Rect::from_min_max(
            egui::pos2(source.x as f32 / tw, source.y as f32 / th),
            egui::pos2(
                (source.x + source.width) as f32 / tw,
                (source.y + source.height) as f32 / th,
            ),
        );
        let dest = egui::Rect::from_min_max(to_pos(rect, dest.min()), to_pos(rect, dest.max()));
        painter.image(tex.id(), dest, uv, egui::Color32::WHITE);
    }

    fn draw_progress(&self, painter: &egui::Painter, rect: egui::Rect) {
        let percent = self.session.progress().unwrap_or(0).min(100);
        let bar_w = (rect.width() * 0.4).max(120.0);
        let bar = egui::Rect::from_center_size(rect.center(), egui::vec2(bar_w, 8.0));
        painter.rect_filled(bar, 2.0, OVERLAY_BG);
        let fill = egui::Rect::from_min_size(
            bar.min,
            egui::vec2(bar_w * percent as f32 / 100.0, bar.height()),
        );
        painter.rect_filled(fill, 2.0, PROGRESS_FILL);
        draw_label(
            painter,
            bar.center_top() - egui::vec2(0.0, 12.0),
            egui::Align2::CENTER_BOTTOM,
            format!("Loading\u{2026} {percent}%"),
        );
    }

    fn draw_status(&self, painter: &egui::Painter, rect: egui::Rect) {
        let s = &self.session;
        let view = s.view();
        let timing = s
            .snapshot()
            .map(|snap| format!("  {} ms", snap.elapsed.as_millis()))
            .unwrap_or_default();
        let text = format!(
            "zoom {:.6e}  x {:.15}  y {:.15}  iter {}  {}  {}{}{}{}",
            view.zoom,
            view.offset_x,
            view.offset_y,
            s.max_iteration(),
            s.precision().label(),
            s.palette().name,
            if s.antialiasing() { "  AA" } else { "" },
            if s.auto_refresh() { "" } else { "  manual" },
            timing,
        );
        draw_label(
            painter,
            rect.left_bottom() + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            text,
        );
    }
}

fn draw_label(painter: &egui::Painter, pos: egui::Pos2, anchor: egui::Align2, text: String) {
    let galley = painter.layout_no_wrap(text, egui::FontId::monospace(13.0), TEXT_COLOR);
    let bg = anchor.anchor_size(pos, galley.size()).expand(4.0);
    painter.rect_filled(bg, 3.0, OVERLAY_BG);
    painter.galley(bg.min + egui::vec2(4.0, 4.0), galley, TEXT_COLOR);
}

fn draw_indicator(painter: &egui::Painter, rect: egui::Rect, indicator: &OffscreenIndicator) {
    let points = vec![
        to_pos(rect, indicator.tip),
        to_pos(rect, indicator.left),
        to_pos(rect, indicator.right),
    ];
    painter.add(egui::Shape::convex_polygon(
        points,
        INDICATOR_COLOR,
        egui::Stroke::NONE,
    ));
}
