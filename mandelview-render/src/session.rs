use tracing::{debug, error, info};

use mandelview_core::navigation::{
    self, ContinuousAction, PanDirection, KEY_ZOOM_FACTOR, WHEEL_ZOOM_FACTOR,
};
use mandelview_core::{
    EntryTarget, EntryValue, NumericEntry, Point, PrecisionMode, View, ViewHistory,
};

use crate::buffer::RasterSnapshot;
use crate::colorize::colorize;
use crate::controller::{CompletedCompute, ComputeController, ControllerPhase, PollOutcome};
use crate::engine::ComputeParams;
use crate::palette::{ColorScheme, Palette};
use crate::reproject::{project, Projection, RasterFrame};

/// Starting state of a session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub view: View,
    pub max_iteration: u32,
    pub antialiasing: bool,
    pub auto_refresh: bool,
    pub precision: PrecisionMode,
    pub color_scheme: ColorScheme,
    pub history_capacity: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            view: View::default(),
            max_iteration: mandelview_core::IterationLimit::DEFAULT,
            antialiasing: true,
            auto_refresh: false,
            precision: PrecisionMode::Standard,
            color_scheme: ColorScheme::default(),
            history_capacity: mandelview_core::history::DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Primary button down, not yet past the drag threshold.
    Pressed { origin: Point },
    Dragging { last: Point },
    /// Secondary button down, not yet past the drag threshold.
    SecondaryPressed { origin: Point },
    Selecting { start: Point, end: Point },
}

/// Result of one [`FractalSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Something visible changed since the previous tick.
    pub redraw: bool,
    /// A computation is still running; keep ticking.
    pub pending: bool,
}

/// All explorer state behind the window: the current view and settings,
/// undo history, the computation controller and the last rendered frame.
///
/// Input methods take pixel coordinates relative to the canvas. Nothing here
/// depends on the windowing toolkit.
#[derive(Debug)]
pub struct FractalSession {
    view: View,
    max_iteration: u32,
    antialiasing: bool,
    auto_refresh: bool,
    precision: PrecisionMode,
    color_scheme: ColorScheme,
    palette: Palette,
    interface_hidden: bool,
    width: u32,
    height: u32,

    history: ViewHistory,
    last_action: Option<ContinuousAction>,
    gesture: Gesture,
    entry: Option<NumericEntry>,

    controller: ComputeController,
    snapshot: Option<RasterSnapshot>,
    generation: u64,
    dirty: bool,
}

impl FractalSession {
    pub fn new(settings: SessionSettings, width: u32, height: u32) -> Self {
        let precision = settings.precision.effective();
        Self {
            view: settings.view,
            max_iteration: settings.max_iteration.max(1),
            antialiasing: settings.antialiasing,
            auto_refresh: settings.auto_refresh,
            precision,
            color_scheme: settings.color_scheme,
            palette: settings.color_scheme.palette(),
            interface_hidden: false,
            width,
            height,
            history: ViewHistory::new(settings.history_capacity),
            last_action: None,
            gesture: Gesture::Idle,
            entry: None,
            controller: ComputeController::new(),
            snapshot: None,
            generation: 0,
            dirty: true,
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn max_iteration(&self) -> u32 {
        self.max_iteration
    }

    pub fn antialiasing(&self) -> bool {
        self.antialiasing
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn precision(&self) -> PrecisionMode {
        self.precision
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn interface_hidden(&self) -> bool {
        self.interface_hidden
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn history(&self) -> &ViewHistory {
        &self.history
    }

    pub fn snapshot(&self) -> Option<&RasterSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn phase(&self) -> ControllerPhase {
        self.controller.phase()
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    pub fn progress(&self) -> Option<u32> {
        self.controller.progress()
    }

    pub fn entry(&self) -> Option<&NumericEntry> {
        self.entry.as_ref()
    }

    /// Corners of the rubber band being dragged, if any.
    pub fn selection(&self) -> Option<(Point, Point)> {
        match self.gesture {
            Gesture::Selecting { start, end } => Some((start, end)),
            _ => None,
        }
    }

    pub fn frame(&self) -> RasterFrame {
        RasterFrame {
            view: self.view,
            width: self.width,
            height: self.height,
        }
    }

    /// Where the last rendered raster should be drawn for the current view.
    pub fn preview(&self) -> Option<Projection> {
        self.snapshot
            .as_ref()
            .map(|snap| project(&snap.frame(), &self.frame()))
    }

    // -- History ------------------------------------------------------------

    /// Record the current view before a change.
    ///
    /// Continuous actions push only when they differ from the previous one;
    /// `None` marks a discrete action, which always pushes.
    fn record(&mut self, action: Option<ContinuousAction>) {
        if action.is_none() || action != self.last_action {
            self.history.push(self.view);
        }
        self.last_action = action;
    }

    fn set_view(&mut self, view: View) {
        self.view = view;
        self.dirty = true;
        self.query_recompute();
    }

    /// Restore the most recent history entry.
    pub fn undo(&mut self) -> bool {
        self.last_action = None;
        match self.history.pop() {
            Some(view) => {
                debug!(%view, "Undo");
                self.set_view(view);
                true
            }
            None => false,
        }
    }

    // -- Navigation ---------------------------------------------------------

    /// One mouse-wheel notch about the cursor.
    pub fn wheel_zoom(&mut self, cursor: Point, zoom_in: bool) {
        let factor = if zoom_in {
            WHEEL_ZOOM_FACTOR
        } else {
            1.0 / WHEEL_ZOOM_FACTOR
        };
        self.record(None);
        let next = navigation::zoom_at(&self.view, cursor, self.width, self.height, factor);
        self.set_view(next);
    }

    /// `+`/`-` about the window centre.
    pub fn key_zoom(&mut self, zoom_in: bool) {
        let (action, factor) = if zoom_in {
            (ContinuousAction::ZoomIn, KEY_ZOOM_FACTOR)
        } else {
            (ContinuousAction::ZoomOut, 1.0 / KEY_ZOOM_FACTOR)
        };
        self.record(Some(action));
        let next = navigation::zoom_center(&self.view, factor);
        self.set_view(next);
    }

    pub fn key_pan(&mut self, direction: PanDirection) {
        self.record(Some(ContinuousAction::Pan(direction)));
        let next = navigation::pan(&self.view, direction);
        self.set_view(next);
    }

    // -- Pointer ------------------------------------------------------------

    pub fn pointer_pressed(&mut self, button: PointerButton, pos: Point) {
        if self.entry.is_some() {
            return;
        }
        match button {
            PointerButton::Primary => {
                self.gesture = Gesture::Pressed { origin: pos }
            }
            PointerButton::Secondary => self.gesture = Gesture::SecondaryPressed { origin: pos },
            PointerButton::Middle => self.recompute(),
        }
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        match self.gesture {
            Gesture::Pressed { origin } => {
                if navigation::exceeds_drag_threshold(pos - origin) {
                    // One entry per gesture, however long it runs.
                    self.record(None);
                    self.gesture = Gesture::Dragging { last: origin };
                    self.drag_to(pos);
                }
            }
            Gesture::Dragging { .. } => self.drag_to(pos),
            Gesture::SecondaryPressed { origin } => {
                if navigation::exceeds_drag_threshold(pos - origin) {
                    self.gesture = Gesture::Selecting {
                        start: origin,
                        end: pos,
                    };
                    self.dirty = true;
                }
            }
            Gesture::Selecting { start, .. } => {
                self.gesture = Gesture::Selecting { start, end: pos };
                self.dirty = true;
            }
            Gesture::Idle => {}
        }
    }

    fn drag_to(&mut self, pos: Point) {
        if let Gesture::Dragging { last } = self.gesture {
            let next = navigation::drag(&self.view, pos - last);
            self.gesture = Gesture::Dragging { last: pos };
            self.set_view(next);
        }
    }

    pub fn pointer_released(&mut self, button: PointerButton, pos: Point) {
        match (button, self.gesture) {
            (PointerButton::Primary, Gesture::Dragging { .. }) => {
                self.drag_to(pos);
                self.gesture = Gesture::Idle;
            }
            (PointerButton::Primary, Gesture::Pressed { .. }) => self.gesture = Gesture::Idle,
            (PointerButton::Secondary, Gesture::SecondaryPressed { .. }) => {
                self.gesture = Gesture::Idle;
                self.undo();
            }
            (PointerButton::Secondary, Gesture::Selecting { start, .. }) => {
                self.gesture = Gesture::Idle;
                self.dirty = true;
                self.zoom_to_selection(start, pos);
            }
            _ => {}
        }
    }

    /// Zoom into the rectangle spanned by two canvas points. Returns `false`
    /// (and records nothing) when the rectangle is too small.
    pub fn zoom_to_selection(&mut self, start: Point, end: Point) -> bool {
        match navigation::zoom_to_selection(&self.view, start, end, self.width, self.height) {
            Some(next) => {
                self.record(None);
                self.set_view(next);
                true
            }
            None => {
                debug!("Selection too small, ignored");
                false
            }
        }
    }

    // -- Toggles ------------------------------------------------------------

    pub fn toggle_auto_refresh(&mut self) {
        self.auto_refresh = !self.auto_refresh;
        info!(auto_refresh = self.auto_refresh, "Auto refresh toggled");
        self.dirty = true;
    }

    pub fn toggle_antialiasing(&mut self) {
        self.antialiasing = !self.antialiasing;
        self.recolor();
    }

    pub fn cycle_palette(&mut self) {
        self.color_scheme = self.color_scheme.next();
        self.palette = self.color_scheme.palette();
        debug!(palette = self.palette.name, "Palette changed");
        self.recolor();
    }

    /// Switch between standard and arbitrary precision. Ignored when the
    /// arbitrary kernel is not compiled in.
    pub fn toggle_precision(&mut self) {
        let wanted = self.precision.toggled();
        let next = wanted.effective();
        if next == self.precision {
            return;
        }
        self.precision = next;
        info!(precision = next.label(), "Precision mode changed");
        self.dirty = true;
        self.query_recompute();
    }

    pub fn toggle_interface(&mut self) {
        self.interface_hidden = !self.interface_hidden;
        self.dirty = true;
    }

    /// Re-apply palette and antialiasing to the current snapshot.
    fn recolor(&mut self) {
        self.dirty = true;
        if let Some(snap) = self.snapshot.as_mut() {
            snap.buffer = colorize(&snap.grid, &self.palette, self.antialiasing);
            self.generation += 1;
            snap.generation = self.generation;
        }
    }

    // -- Numeric entry ------------------------------------------------------

    /// Open a numeric menu. Refused while a computation is pending or
    /// another menu is open.
    pub fn open_entry(&mut self, target: EntryTarget) -> bool {
        if self.entry.is_some() || self.controller.is_pending() {
            return false;
        }
        self.entry = Some(NumericEntry::new(target));
        self.gesture = Gesture::Idle;
        self.dirty = true;
        true
    }

    pub fn entry_insert(&mut self, text: &str) {
        if let Some(entry) = self.entry.as_mut() {
            entry.insert(text);
            self.dirty = true;
        }
    }

    pub fn entry_backspace(&mut self) {
        if let Some(entry) = self.entry.as_mut() {
            entry.backspace();
            self.dirty = true;
        }
    }

    pub fn entry_cancel(&mut self) {
        if self.entry.take().is_some() {
            self.dirty = true;
        }
    }

    /// Apply the typed value. An invalid value leaves the menu open.
    pub fn entry_confirm(&mut self) -> bool {
        let Some(value) = self.entry.as_ref().and_then(|e| e.confirm(&self.view)) else {
            return false;
        };
        self.entry = None;
        match value {
            EntryValue::MaxIteration(n) => {
                info!(max_iteration = n, "Max iteration set");
                self.max_iteration = n;
                self.dirty = true;
                self.query_recompute();
            }
            EntryValue::View(view) => {
                self.record(None);
                self.set_view(view);
            }
        }
        true
    }

    // -- Computation --------------------------------------------------------

    fn params(&self) -> ComputeParams {
        ComputeParams {
            view: self.view,
            max_iteration: self.max_iteration,
            width: self.width,
            height: self.height,
            antialiasing: self.antialiasing,
            precision: self.precision,
        }
    }

    /// A change that wants a new computation if auto refresh is on.
    fn query_recompute(&mut self) {
        if self.auto_refresh {
            self.dispatch();
        }
    }

    /// Unconditional recompute.
    pub fn recompute(&mut self) {
        self.dispatch();
    }

    fn dispatch(&mut self) {
        match self.controller.request(self.params()) {
            Ok(_) => self.dirty = true,
            Err(e) => error!("Could not dispatch computation: {e}"),
        }
    }

    /// Track a new canvas size. The computation in flight is cancelled and a
    /// recompute is queried for the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        debug!(width, height, "Canvas resized");
        self.width = width;
        self.height = height;
        self.controller.cancel();
        self.dirty = true;
        if width > 0 && height > 0 {
            self.query_recompute();
        }
    }

    fn install(&mut self, done: CompletedCompute) {
        let buffer = colorize(&done.grid, &self.palette, self.antialiasing);
        self.generation += 1;
        let snapshot = RasterSnapshot {
            view: done.params.view,
            buffer,
            grid: done.grid,
            generation: self.generation,
            elapsed: done.elapsed,
        };
        if let Some(old) = self.snapshot.replace(snapshot) {
            self.controller.recycle(old.grid);
        }
    }

    /// Advance the computation state machine. Call once per UI frame.
    pub fn tick(&mut self) -> TickOutcome {
        match self.controller.poll(self.width, self.height) {
            PollOutcome::ResultReady => {
                if let Some(done) = self.controller.take_result() {
                    self.install(done);
                }
                self.dirty = true;
            }
            PollOutcome::Progress(_) | PollOutcome::Discarded => self.dirty = true,
            PollOutcome::Idle | PollOutcome::Unchanged => {}
        }

        if self.controller.phase() == ControllerPhase::Idle && self.controller.take_deferred() {
            debug!("Dispatching deferred computation");
            self.dispatch();
        }

        TickOutcome {
            redraw: std::mem::take(&mut self.dirty),
            pending: self.controller.is_pending(),
        }
    }
}
