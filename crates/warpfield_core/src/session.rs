//! # Session
//!
//! One running starfield: the surface it draws to and every piece of state
//! the tick reads. Protocol messages are applied through [`Session::apply`]
//! between calls to [`Session::tick`]; nothing is shared with the host.
//!
//! ## Tick order
//!
//! 1. Clamp `dt`, fold it into the FPS average
//! 2. Integrate every star (boosted while holding), collecting spread stats
//!    until the reveal
//! 3. Unless holding, flush the batched streaks and the vignette
//! 4. Evaluate the reveal gate
//! 5. Emit a throttled perf sample

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use warpfield_shared::constants::MAX_DT_MS;
use warpfield_shared::{Config, ConfigPatch, HostMessage, ResizeRequest, WorkerEvent};

use crate::geometry::Geometry;
use crate::physics::{self, StepParams};
use crate::pool::{PoolResize, StarPool};
use crate::raster::BatchRasterizer;
use crate::reveal::RevealGate;
use crate::star::SpawnMode;
use crate::surface::RasterSurface;
use crate::telemetry::Telemetry;
use crate::vignette::VignetteGradient;

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Clamped frame time in milliseconds
    pub dt_ms: f64,
    /// True if nothing was drawn
    pub held: bool,
    /// Segments stroked
    pub segments: u32,
    /// Paths stroked (one per non-empty bin)
    pub draw_calls: u32,
    /// Stars respawned
    pub respawned: u32,
    /// Set on the tick the reveal gate latched
    pub visible_at: Option<f64>,
    /// Throttled frame-rate sample
    pub perf: Option<WorkerEvent>,
}

impl TickReport {
    /// Events for the host, in emission order.
    pub fn events(&self) -> impl Iterator<Item = WorkerEvent> {
        self.visible_at
            .map(|at| WorkerEvent::Visible { at })
            .into_iter()
            .chain(self.perf)
    }
}

/// A live starfield session.
#[derive(Debug)]
pub struct Session<S: RasterSurface> {
    surface: S,
    config: Config,
    geometry: Geometry,
    vignette: VignetteGradient,
    pool: StarPool,
    raster: BatchRasterizer,
    gate: RevealGate,
    telemetry: Telemetry,
    rng: ChaCha8Rng,
    last_tick: f64,
    ticks: u64,
}

impl<S: RasterSurface> Session<S> {
    /// Starts a session on `surface`, seeded from OS entropy.
    #[must_use]
    pub fn start(surface: S, config: Config, now: f64) -> Self {
        Self::with_rng(surface, config, now, ChaCha8Rng::from_entropy())
    }

    /// Starts a session with a fixed seed. Same seed, same inputs, same field.
    #[must_use]
    pub fn with_seed(surface: S, config: Config, now: f64, seed: u64) -> Self {
        Self::with_rng(surface, config, now, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(surface: S, config: Config, now: f64, mut rng: ChaCha8Rng) -> Self {
        if let Err(e) = config.validate() {
            tracing::debug!("Repairing session config: {}", e);
        }
        let config = config.sanitized();

        let (width, height) = surface.size();
        let geometry = Geometry::from_surface(width, height);

        // A surface with no size yet gets its stars on the first resize.
        let pool = if geometry.is_empty() {
            StarPool::default()
        } else {
            StarPool::populate(&mut rng, &geometry, &config, SpawnMode::Hidden)
        };

        let gate = RevealGate::new(&config, now);
        tracing::info!(
            "Session started: {}x{} px, {} stars, ready={}",
            width,
            height,
            pool.len(),
            gate.is_ready()
        );

        Self {
            vignette: VignetteGradient::new(&geometry, &config),
            surface,
            geometry,
            pool,
            raster: BatchRasterizer::new(),
            gate,
            telemetry: Telemetry::new(now),
            rng,
            last_tick: now,
            ticks: 0,
            config,
        }
    }

    /// Applies a protocol message.
    ///
    /// `init`, `pause` and `resume` concern the scheduler that owns the
    /// session and are ignored here, as are unknown kinds.
    pub fn apply(&mut self, message: &HostMessage, now: f64) {
        match message {
            HostMessage::Resize(req) => {
                self.resize(req);
            }
            HostMessage::Ready { is_ready } => self.set_ready(*is_ready, now),
            HostMessage::ConfigUpdate { config } => self.update_config(config),
            HostMessage::Init { .. }
            | HostMessage::Pause
            | HostMessage::Resume
            | HostMessage::Unknown => {
                tracing::debug!("Session ignoring '{}' message", message.kind());
            }
        }
    }

    /// Rebuilds geometry, surface, vignette and pool for a new size.
    ///
    /// Returns `None` and changes nothing if the request has a zero device
    /// width or height.
    pub fn resize(&mut self, req: &ResizeRequest) -> Option<PoolResize> {
        let Some(geometry) = Geometry::from_resize(req) else {
            tracing::debug!(
                "Ignoring empty resize {}x{} @ {}",
                req.width_css,
                req.height_css,
                req.dpr
            );
            return None;
        };

        self.geometry = geometry;
        self.surface.resize(geometry.width(), geometry.height());
        self.vignette = VignetteGradient::new(&self.geometry, &self.config);

        let target = self.geometry.target_pool_size(self.config.density);
        let resize = self.pool.resize_to(
            target,
            &mut self.rng,
            &self.geometry,
            &self.config,
            SpawnMode::for_visibility(self.gate.is_visible()),
        );
        tracing::debug!(
            "Resized to {}x{} px (dpr {}), pool {} -> {}",
            geometry.width(),
            geometry.height(),
            geometry.dpr(),
            resize.from,
            resize.to
        );
        Some(resize)
    }

    /// Host anchor readiness.
    pub fn set_ready(&mut self, ready: bool, now: f64) {
        self.gate.set_ready(ready, now);
        tracing::debug!("Anchor ready={} at {:.1}", ready, now);
    }

    /// Overlays a partial config and rebuilds the vignette.
    ///
    /// A patch that would leave the config invalid is dropped whole. The
    /// pool keeps its size until the next resize.
    pub fn update_config(&mut self, patch: &ConfigPatch) {
        let mut config = self.config.clone();
        config.apply_partial(patch);
        if let Err(e) = config.validate() {
            tracing::debug!("Dropping config update: {}", e);
            return;
        }
        self.config = config;
        self.vignette = VignetteGradient::new(&self.geometry, &self.config);
    }

    /// Runs one tick at time `now` (milliseconds).
    pub fn tick(&mut self, now: f64) -> TickReport {
        let elapsed = now - self.last_tick;
        let dt_ms = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_DT_MS)
        } else {
            0.0
        };
        if now.is_finite() {
            self.last_tick = now;
        }
        self.ticks += 1;
        self.telemetry.record_frame(dt_ms);

        let held = self.gate.should_hold(&self.config);
        let params = StepParams {
            dt_sec: (dt_ms / 1000.0) as f32,
            scale: if held { self.config.pre_sim_boost } else { 1.0 },
            track_spread: self.gate.tracks_spread(),
            spawn_mode: SpawnMode::for_visibility(self.gate.is_visible()),
        };

        self.raster.begin();
        let raster = &mut self.raster;
        let outcome = physics::step(
            &mut self.pool,
            &self.geometry,
            &self.config,
            params,
            &mut self.rng,
            |segment| {
                if !held {
                    raster.push(&segment);
                }
            },
        );

        let mut report = TickReport {
            dt_ms,
            held,
            respawned: outcome.respawned as u32,
            ..TickReport::default()
        };

        if !held {
            let stats = self.raster.flush(&mut self.surface, &self.vignette);
            report.segments = stats.segments;
            report.draw_calls = stats.paths;
        }

        if let Some(spread) = outcome.spread {
            report.visible_at = self.gate.evaluate(&spread, &self.geometry, &self.config, now);
            if let Some(at) = report.visible_at {
                tracing::info!(
                    "Starfield revealed at {:.1} (spread {:.2}, {} ticks)",
                    at,
                    spread.ratio(),
                    self.ticks
                );
            }
        }

        report.perf = self.telemetry.poll(now);
        report
    }

    /// Live configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Current geometry
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Cached vignette
    #[must_use]
    pub const fn vignette(&self) -> &VignetteGradient {
        &self.vignette
    }

    /// Star pool
    #[must_use]
    pub const fn pool(&self) -> &StarPool {
        &self.pool
    }

    /// Reveal state
    #[must_use]
    pub const fn gate(&self) -> &RevealGate {
        &self.gate
    }

    /// True once the reveal gate has latched
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    /// Smoothed frames per second
    #[must_use]
    pub const fn fps(&self) -> f64 {
        self.telemetry.fps()
    }

    /// Ticks run so far
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The surface being drawn to
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface being drawn to, mutably
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Ends the session and hands the surface back.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
