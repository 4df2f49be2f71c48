//! Backdrop lifecycle and per-frame orchestration.

use folio_core::{BackdropSettings, Point, Size};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::confetti::ConfettiField;
use crate::frame;
use crate::host::{EventKind, FrameHandle, Host, HostEvent, ListenerId, TimerId};
use crate::particle::Particle;
use crate::surface::{Surface, SurfaceError};

/// Where a backdrop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Running { hidden: bool },
}

/// Animated particle backdrop.
///
/// All state is owned here; any number of backdrops may run side by side.
/// The host drives it through [`Backdrop::on_frame`], [`Backdrop::on_timer`]
/// and [`Backdrop::handle_event`].
#[derive(Debug)]
pub struct Backdrop<S> {
    settings: BackdropSettings,
    rng: StdRng,
    lifecycle: Lifecycle,
    surface: Option<S>,
    /// Logical size particles bounce inside.
    viewport: Size,
    particles: Vec<Particle>,
    confetti: ConfettiField,
    /// Last pointer position, `None` until the pointer first moves.
    pointer: Option<Point>,
    /// Pointer move not yet applied as attraction.
    pending_attraction: Option<Point>,
    frame: Option<FrameHandle>,
    resize_timer: Option<TimerId>,
    pending_size: Option<Size>,
    listeners: Vec<ListenerId>,
}

impl<S: Surface> Backdrop<S> {
    /// Create an unmounted backdrop seeded from the OS.
    pub fn new(settings: BackdropSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Create an unmounted backdrop with a fixed seed.
    pub fn with_seed(settings: BackdropSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: BackdropSettings, rng: StdRng) -> Self {
        let confetti = ConfettiField::new(settings.max_confetti, settings.confetti_life);
        Self {
            settings,
            rng,
            lifecycle: Lifecycle::Unmounted,
            surface: None,
            viewport: Size::default(),
            particles: Vec::new(),
            confetti,
            pointer: None,
            pending_attraction: None,
            frame: None,
            resize_timer: None,
            pending_size: None,
            listeners: Vec::new(),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Running { .. })
    }

    pub fn settings(&self) -> &BackdropSettings {
        &self.settings
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn confetti(&self) -> &ConfettiField {
        &self.confetti
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Frame currently requested from the host, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Attach to `host` and start animating.
    ///
    /// If the host has no surface to give, nothing happens and the
    /// backdrop stays unmounted.
    pub fn mount<H: Host<Surface = S>>(&mut self, host: &mut H) {
        if self.is_running() {
            log::debug!("backdrop already mounted");
            return;
        }
        let Some(surface) = host.acquire_surface() else {
            log::debug!("no drawing surface available, backdrop disabled");
            return;
        };
        self.surface = Some(surface);
        self.listeners = EventKind::ALL
            .iter()
            .map(|&kind| host.add_listener(kind))
            .collect();
        self.lifecycle = Lifecycle::Running { hidden: false };
        self.allocate(host, host.viewport());
        self.frame = Some(host.request_frame());
        log::debug!(
            "backdrop mounted at {}x{} with {} particles",
            self.viewport.width,
            self.viewport.height,
            self.particles.len()
        );
    }

    /// Detach from `host`: cancel the pending frame and resize timer and
    /// drop every listener. Safe to call repeatedly.
    pub fn unmount<H: Host<Surface = S>>(&mut self, host: &mut H) {
        if let Some(handle) = self.frame.take() {
            host.cancel_frame(handle);
        }
        if let Some(timer) = self.resize_timer.take() {
            host.clear_timeout(timer);
        }
        for id in self.listeners.drain(..) {
            host.remove_listener(id);
        }
        if self.is_running() {
            log::debug!("backdrop unmounted");
        }
        self.lifecycle = Lifecycle::Unmounted;
        self.surface = None;
        self.particles.clear();
        self.confetti.clear();
        self.pointer = None;
        self.pending_attraction = None;
        self.pending_size = None;
    }

    /// Route a host event to the matching handler.
    pub fn handle_event<H: Host<Surface = S>>(&mut self, host: &mut H, event: HostEvent) {
        match event {
            HostEvent::Resize(size) => self.on_resize(host, size),
            HostEvent::PointerMove(p) => self.on_pointer_move(p),
            HostEvent::Click(p) => self.on_click(p),
            HostEvent::Visibility { hidden } => self.on_visibility(hidden),
        }
    }

    /// Queue a resize; it is applied once resizes stop arriving for the
    /// debounce window.
    pub fn on_resize<H: Host<Surface = S>>(&mut self, host: &mut H, size: Size) {
        if !self.is_running() {
            return;
        }
        if let Some(timer) = self.resize_timer.take() {
            host.clear_timeout(timer);
        }
        self.pending_size = Some(size);
        self.resize_timer = Some(host.set_timeout(self.settings.resize_debounce()));
    }

    pub fn on_pointer_move(&mut self, at: Point) {
        if !self.is_running() {
            return;
        }
        self.pointer = Some(at);
        self.pending_attraction = Some(at);
    }

    pub fn on_click(&mut self, at: Point) {
        if !self.is_running() {
            return;
        }
        let spawned = self
            .confetti
            .burst(&mut self.rng, at, self.settings.burst_size);
        log::trace!("click at ({}, {}) spawned {spawned} confetti", at.x, at.y);
    }

    pub fn on_visibility(&mut self, hidden: bool) {
        if let Lifecycle::Running { hidden: current } = &mut self.lifecycle {
            *current = hidden;
        }
    }

    /// Timer callback from the host.
    pub fn on_timer<H: Host<Surface = S>>(&mut self, host: &mut H, id: TimerId) {
        if self.resize_timer != Some(id) {
            return;
        }
        self.resize_timer = None;
        let size = self.pending_size.take().unwrap_or_else(|| host.viewport());
        self.allocate(host, size);
        log::debug!(
            "backdrop resized to {}x{}, {} particles",
            size.width,
            size.height,
            self.particles.len()
        );
    }

    /// Frame callback from the host: one tick, then ask for the next.
    ///
    /// Frames that were cancelled or belong to an earlier mount are ignored.
    pub fn on_frame<H: Host<Surface = S>>(
        &mut self,
        host: &mut H,
        handle: FrameHandle,
        time_ms: f64,
    ) {
        if self.frame != Some(handle) {
            return;
        }
        self.frame = None;

        if self.lifecycle == (Lifecycle::Running { hidden: false }) {
            if let Err(err) = self.tick(time_ms) {
                log::warn!("backdrop frame failed: {err}");
            }
        }

        self.frame = Some(host.request_frame());
    }

    /// Size the surface for `size` and replace the particle population.
    fn allocate<H: Host<Surface = S>>(&mut self, host: &H, size: Size) {
        let ratio = host
            .device_pixel_ratio()
            .min(self.settings.max_pixel_ratio);
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        self.viewport = size;
        if let Some(surface) = self.surface.as_mut() {
            let (width, height) = size.scaled(ratio);
            surface.resize(width, height);
            surface.set_scale(ratio);
        }
        self.particles = Particle::populate(&mut self.rng, self.settings.particle_count, size);
    }

    /// Update and draw one frame, in fixed layer order.
    fn tick(&mut self, time_ms: f64) -> Result<(), SurfaceError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let size = self.viewport;

        if let Some(target) = self.pending_attraction.take() {
            for p in &mut self.particles {
                p.attract(
                    target,
                    self.settings.attraction_radius,
                    self.settings.attraction_strength,
                );
            }
        }
        for p in &mut self.particles {
            p.update(time_ms, size);
        }
        self.confetti.update();

        surface.begin_frame();
        frame::paint_background(surface, size, time_ms, self.settings.overlay_alpha)?;
        for p in &self.particles {
            p.draw(surface)?;
        }
        frame::draw_links(surface, &self.particles, self.settings.link_distance)?;
        frame::draw_floating_glyphs(surface, size, time_ms)?;
        if let Some(pointer) = self.pointer {
            frame::draw_interactive_glyphs(surface, size, pointer)?;
        }
        frame::draw_corner_markers(surface, size, time_ms)?;
        self.confetti.draw(surface)
    }
}
