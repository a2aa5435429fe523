use eframe::egui;

use mandelview_core::navigation::PanDirection;
use mandelview_core::{EntryTarget, Point};
use mandelview_render::PointerButton;

use crate::app::MandelviewApp;

/// Scroll distance, in points, that counts as one wheel notch.
pub(crate) const WHEEL_NOTCH: f32 = 50.0;

/// Turns smooth scroll deltas into whole zoom steps.
///
/// A mouse wheel delivers one notch at a time; trackpads deliver many small
/// deltas per frame. Either way one step fires per [`WHEEL_NOTCH`] of travel.
#[derive(Debug, Default)]
pub(crate) struct WheelAccumulator {
    pending: f32,
}

impl WheelAccumulator {
    /// Add a delta and return the number of whole steps, positive for
    /// zooming in.
    pub(crate) fn feed(&mut self, delta: f32) -> i32 {
        if delta.signum() != self.pending.signum() {
            self.pending = 0.0;
        }
        self.pending += delta;
        let steps = (self.pending / WHEEL_NOTCH).trunc();
        self.pending -= steps * WHEEL_NOTCH;
        steps as i32
    }

    pub(crate) fn reset(&mut self) {
        self.pending = 0.0;
    }
}

fn canvas_point(rect: egui::Rect, pos: egui::Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn pointer_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl MandelviewApp {
    /// Translate this frame's egui events into session operations.
    pub(crate) fn handle_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let rect = response.rect;
        let (events, scroll_y) = ctx.input(|i| (i.events.clone(), i.raw_scroll_delta.y));

        match response.hover_pos() {
            Some(pos) if self.session.entry().is_none() => {
                if scroll_y != 0.0 {
                    let steps = self.wheel.feed(scroll_y);
                    for _ in 0..steps.unsigned_abs() {
                        self.session.wheel_zoom(canvas_point(rect, pos), steps > 0);
                    }
                }
            }
            _ => self.wheel.reset(),
        }

        for event in &events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let Some(button) = pointer_button(*button) else {
                        continue;
                    };
                    if *pressed {
                        if rect.contains(*pos) {
                            self.session.pointer_pressed(button, canvas_point(rect, *pos));
                        }
                    } else {
                        self.session.pointer_released(button, canvas_point(rect, *pos));
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    self.session.pointer_moved(canvas_point(rect, *pos));
                }
                egui::Event::Text(text) => {
                    if self.session.entry().is_some() {
                        self.session.entry_insert(text);
                    }
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    if self.session.entry().is_some() {
                        self.handle_entry_key(*key);
                    } else if !modifiers.ctrl && !modifiers.command {
                        self.handle_key(*key);
                    }
                }
                _ => {}
            }
        }
    }

    fn handle_entry_key(&mut self, key: egui::Key) {
        match key {
            egui::Key::Enter => {
                self.session.entry_confirm();
            }
            egui::Key::Backspace => self.session.entry_backspace(),
            egui::Key::Escape => self.session.entry_cancel(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: egui::Key) {
        let s = &mut self.session;
        match key {
            egui::Key::ArrowUp => s.key_pan(PanDirection::Up),
            egui::Key::ArrowDown => s.key_pan(PanDirection::Down),
            egui::Key::ArrowLeft => s.key_pan(PanDirection::Left),
            egui::Key::ArrowRight => s.key_pan(PanDirection::Right),
            egui::Key::Plus | egui::Key::Equals => s.key_zoom(true),
            egui::Key::Minus => s.key_zoom(false),
            egui::Key::Space => s.recompute(),
            egui::Key::R => s.toggle_auto_refresh(),
            egui::Key::J => s.toggle_antialiasing(),
            egui::Key::M => s.toggle_precision(),
            egui::Key::B => s.cycle_palette(),
            egui::Key::H => s.toggle_interface(),
            egui::Key::I => {
                s.open_entry(EntryTarget::MaxIteration);
            }
            egui::Key::W => {
                s.open_entry(EntryTarget::Zoom);
            }
            egui::Key::X => {
                s.open_entry(EntryTarget::OffsetX);
            }
            egui::Key::C => {
                s.open_entry(EntryTarget::OffsetY);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_notch_is_one_step() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.feed(WHEEL_NOTCH), 1);
        assert_eq!(wheel.feed(-WHEEL_NOTCH), -1);
    }

    #[test]
    fn small_deltas_accumulate() {
        let mut wheel = WheelAccumulator::default();
        let steps: i32 = (0..20).map(|_| wheel.feed(WHEEL_NOTCH / 8.0)).sum();
        // 20 / 8 = 2.5 notches.
        assert_eq!(steps, 2);
        assert_eq!(wheel.feed(WHEEL_NOTCH / 2.0), 1);
    }

    #[test]
    fn fling_fires_per_notch_not_per_frame() {
        let mut wheel = WheelAccumulator::default();
        let steps: i32 = (0..60).map(|_| wheel.feed(3.0)).sum();
        assert_eq!(steps, 3);
    }

    #[test]
    fn large_delta_fires_several_steps() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.feed(WHEEL_NOTCH * 3.5), 3);
    }

    #[test]
    fn reversal_drops_partial_travel() {
        let mut wheel = WheelAccumulator::default();
        assert_eq!(wheel.feed(WHEEL_NOTCH * 0.9), 0);
        assert_eq!(wheel.feed(-WHEEL_NOTCH * 0.5), 0);
        assert_eq!(wheel.feed(-WHEEL_NOTCH * 0.5), -1);
    }
}
