//! Runs a backdrop inside the terminal event loop.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use folio_backdrop::{EventKind, FrameHandle, Host, ListenerId, PixelBuffer, TimerId};
use folio_config::TerminalSettings;
use folio_core::{Point, Size};

/// [`Host`] backed by the terminal grid.
///
/// Every terminal column is one backing pixel and every row is two, so a
/// [`PixelBuffer`] sized by the backdrop lines up with the cells that
/// `BackdropWidget` paints.
#[derive(Debug)]
pub struct TerminalHost {
    cols: u16,
    rows: u16,
    settings: TerminalSettings,
    next_id: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerId, Instant)>,
    listeners: HashMap<ListenerId, EventKind>,
}

impl TerminalHost {
    /// `max_pixel_ratio` is the backdrop's ratio cap. A cell width whose
    /// ratio would be capped cannot give one backing pixel per column, so
    /// it is replaced by the default.
    pub fn new(cols: u16, rows: u16, settings: &TerminalSettings, max_pixel_ratio: f32) -> Self {
        let mut settings = settings.clone();
        let width = settings.cell_width;
        if !(width.is_finite() && width > 0.0 && 1.0 / width <= max_pixel_ratio) {
            let fallback = TerminalSettings::default().cell_width;
            log::warn!(
                "invalid cell_width {width} (pixel ratio cap {max_pixel_ratio}), using {fallback}"
            );
            settings.cell_width = fallback;
        }
        Self {
            cols,
            rows,
            settings,
            next_id: 0,
            frames: Vec::new(),
            timers: Vec::new(),
            listeners: HashMap::new(),
        }
    }

    pub fn set_terminal_size(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Centre of the cell at `(col, row)` in logical pixels.
    pub fn cell_to_logical(&self, col: u16, row: u16) -> Point {
        Point::new(
            (f32::from(col) + 0.5) * self.settings.cell_width,
            (f32::from(row) + 0.5) * self.settings.cell_height(),
        )
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|&k| k == kind)
    }

    pub fn has_pending_frame(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Take every outstanding frame request.
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frames)
    }

    /// Remove and return the timers whose deadline has passed, earliest first.
    pub fn take_due_timers(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<(TimerId, Instant)> = Vec::new();
        self.timers.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push((id, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, deadline)| deadline);
        due.into_iter().map(|(id, _)| id).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|&(_, deadline)| deadline).min()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for TerminalHost {
    type Surface = PixelBuffer;

    fn viewport(&self) -> Size {
        Size::new(
            f32::from(self.cols) * self.settings.cell_width,
            f32::from(self.rows) * self.settings.cell_height(),
        )
    }

    fn device_pixel_ratio(&self) -> f32 {
        1.0 / self.settings.cell_width
    }

    fn acquire_surface(&mut self) -> Option<PixelBuffer> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        Some(PixelBuffer::default())
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|&h| h != handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id());
        self.timers.push((id, Instant::now() + delay));
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|&(t, _)| t != id);
    }

    fn add_listener(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_backdrop::Backdrop;
    use folio_core::BackdropSettings;
    use pretty_assertions::assert_eq;

    fn host(cols: u16, rows: u16) -> TerminalHost {
        TerminalHost::new(cols, rows, &TerminalSettings::default(), 2.0)
    }

    #[test]
    fn test_viewport_and_ratio() {
        let host = host(80, 24);
        assert_eq!(host.viewport(), Size::new(320.0, 192.0));
        assert_eq!(host.device_pixel_ratio(), 0.25);
    }

    #[test]
    fn test_cell_centre() {
        let host = host(80, 24);
        assert_eq!(host.cell_to_logical(0, 0), Point::new(2.0, 4.0));
        assert_eq!(host.cell_to_logical(10, 3), Point::new(42.0, 28.0));
    }

    #[test]
    fn test_bad_cell_width_falls_back() {
        let settings = TerminalSettings {
            cell_width: 0.0,
            ..Default::default()
        };
        let host = TerminalHost::new(10, 10, &settings, 2.0);
        assert_eq!(host.device_pixel_ratio(), 0.25);
    }

    #[test]
    fn test_cell_width_beyond_ratio_cap_falls_back() {
        let narrow = TerminalSettings {
            cell_width: 0.25,
            ..Default::default()
        };
        let host = TerminalHost::new(80, 24, &narrow, 2.0);
        assert_eq!(host.device_pixel_ratio(), 0.25);
        assert_eq!(host.viewport(), Size::new(320.0, 192.0));

        let smallest = TerminalSettings {
            cell_width: 0.5,
            ..Default::default()
        };
        let host = TerminalHost::new(80, 24, &smallest, 2.0);
        assert_eq!(host.device_pixel_ratio(), 2.0);
    }

    #[test]
    fn test_small_cells_still_fill_terminal_grid() {
        let settings = TerminalSettings {
            cell_width: 0.5,
            ..Default::default()
        };
        let mut host = TerminalHost::new(80, 24, &settings, 2.0);
        let mut backdrop: Backdrop<PixelBuffer> =
            Backdrop::with_seed(BackdropSettings::default(), 5);
        backdrop.mount(&mut host);

        let surface = backdrop.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (80, 48));
    }

    #[test]
    fn test_empty_terminal_has_no_surface() {
        assert!(host(0, 24).acquire_surface().is_none());
        assert!(host(80, 24).acquire_surface().is_some());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut host = host(80, 24);
        let late = host.set_timeout(Duration::from_millis(20));
        let early = host.set_timeout(Duration::ZERO);
        let cleared = host.set_timeout(Duration::ZERO);
        host.clear_timeout(cleared);

        let now = Instant::now() + Duration::from_millis(50);
        assert_eq!(host.take_due_timers(now), vec![early, late]);
        assert!(host.next_deadline().is_none());
    }

    #[test]
    fn test_cancelled_frame_is_not_delivered() {
        let mut host = host(80, 24);
        let a = host.request_frame();
        let b = host.request_frame();
        host.cancel_frame(a);
        assert_eq!(host.take_frames(), vec![b]);
        assert!(!host.has_pending_frame());
    }

    #[test]
    fn test_backdrop_fills_terminal_grid() {
        let mut host = host(80, 24);
        let mut backdrop: Backdrop<PixelBuffer> =
            Backdrop::with_seed(BackdropSettings::default(), 3);
        backdrop.mount(&mut host);

        let surface = backdrop.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (80, 48));
        for kind in EventKind::ALL {
            assert!(host.is_listening(kind));
        }

        let frame = host.take_frames()[0];
        backdrop.on_frame(&mut host, frame, 16.0);
        assert!(host.has_pending_frame());

        backdrop.unmount(&mut host);
        assert!(!host.has_pending_frame());
        assert!(!host.is_listening(EventKind::Click));
    }
}
