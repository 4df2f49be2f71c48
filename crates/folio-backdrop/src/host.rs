//! The environment a backdrop runs inside.

use std::time::Duration;

use folio_core::{Point, Size};

use crate::surface::Surface;

/// Handle for a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Handle for a one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle for a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Event categories a backdrop subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    PointerMove,
    Click,
    Visibility,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Resize,
        EventKind::PointerMove,
        EventKind::Click,
        EventKind::Visibility,
    ];
}

/// Input delivered by the host. Positions are in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize(Size),
    PointerMove(Point),
    Click(Point),
    Visibility { hidden: bool },
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::Resize(_) => EventKind::Resize,
            HostEvent::PointerMove(_) => EventKind::PointerMove,
            HostEvent::Click(_) => EventKind::Click,
            HostEvent::Visibility { .. } => EventKind::Visibility,
        }
    }
}

/// Single-threaded event loop that owns scheduling for a backdrop.
///
/// Frame requests are one-shot: the host calls back once per request
/// (through [`crate::Backdrop::on_frame`]) and the backdrop asks again.
/// Timers work the same way through [`crate::Backdrop::on_timer`].
pub trait Host {
    type Surface: Surface;

    /// Current viewport size in logical pixels.
    fn viewport(&self) -> Size;

    /// Backing-store pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f32;

    /// Hand out a drawing surface, or `None` if there is nothing to draw on.
    fn acquire_surface(&mut self) -> Option<Self::Surface>;

    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    fn clear_timeout(&mut self, id: TimerId);

    fn add_listener(&mut self, kind: EventKind) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);
}
