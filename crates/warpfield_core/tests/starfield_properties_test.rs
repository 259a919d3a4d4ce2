//! # Starfield Property Tests
//!
//! End-to-end checks of the guarantees a host relies on: pool sizing,
//! one-shot reveal, respawn bounds, FPS smoothing, reveal timing and
//! segment conservation in the batch rasterizer.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use warpfield_core::physics::{self, StepParams};
use warpfield_core::{
    Geometry, PixelSurface, RasterSurface, RecordingSurface, RevealGate, Session, SpawnMode,
    StarPool,
};
use warpfield_shared::constants::MIN_STARS;
use warpfield_shared::{Config, ResizeRequest, Vec2, WorkerEvent};

const FRAME_MS: f64 = 16.0;

/// Ticks until the gate latches, returning the time of the last tick.
fn run_until_visible<S: RasterSurface>(session: &mut Session<S>, mut now: f64) -> f64 {
    let deadline = now + 10_000.0;
    while !session.is_visible() {
        assert!(now < deadline, "field never revealed");
        now += FRAME_MS;
        session.tick(now);
    }
    now
}

/// Test: pool size tracks `max(60, floor(megapixels × density))` and keeps
/// every surviving star across resizes.
#[test]
fn test_pool_resize_preserves_prefix() {
    let config = Config {
        density: 220.0,
        ..Config::default()
    };
    let mut session = Session::with_seed(RecordingSurface::new(0, 0), config, 0.0, 7);

    let sizes = [
        (1280.0, 720.0, 1.0),
        (1920.0, 1080.0, 1.0),
        (1920.0, 1080.0, 2.0),
        (320.0, 200.0, 1.0),
        (640.0, 480.0, 1.5),
    ];

    for (w, h, dpr) in sizes {
        let before = session.pool().stars().to_vec();
        session.resize(&ResizeRequest::centered(w, h, dpr)).unwrap();

        let g = session.geometry();
        let expected = ((g.megapixels() * 220.0).floor() as usize).max(MIN_STARS);
        assert_eq!(session.pool().len(), expected, "{w}x{h}@{dpr}");

        let keep = before.len().min(expected);
        assert_eq!(&session.pool().stars()[..keep], &before[..keep]);

        // Let the field move between resizes.
        for i in 1..=5 {
            session.tick(f64::from(i) * FRAME_MS);
        }
    }
}

/// Test: `visible` flips once and stays latched.
#[test]
fn test_visible_latches_once() {
    let mut session = Session::with_seed(
        RecordingSurface::new(1024, 768),
        Config {
            start_delay_ms: 50.0,
            ..Config::default()
        },
        0.0,
        11,
    );

    let mut now = 0.0;
    let mut visible_events = 0;
    for _ in 0..2_000 {
        now += FRAME_MS;
        let report = session.tick(now);
        visible_events += report
            .events()
            .filter(|e| matches!(e, WorkerEvent::Visible { .. }))
            .count();
        if session.gate().visible_at().is_some() {
            assert!(session.is_visible());
        }
    }

    assert!(session.is_visible());
    assert_eq!(visible_events, 1);

    // Losing readiness afterwards does not hide the field.
    session.set_ready(false, now);
    session.tick(now + FRAME_MS);
    assert!(session.is_visible());
}

/// Test: no star is left beyond the margin after any tick.
#[test]
fn test_no_star_left_out_of_bounds() {
    let mut session = Session::with_seed(
        RecordingSurface::new(640, 360),
        Config {
            speed: 2_000.0,
            ..Config::default()
        },
        0.0,
        3,
    );

    for i in 1..=600 {
        session.tick(f64::from(i) * FRAME_MS);
        let g = *session.geometry();
        for star in session.pool().stars() {
            assert!(!g.is_out_of_bounds(star.pos), "star at {:?} on tick {i}", star.pos);
            assert!((0.0..=1.0).contains(&star.z));
        }
    }
}

/// Test: constant frame time drives the FPS average monotonically to `1/dt`.
#[test]
fn test_fps_converges_under_constant_dt() {
    let mut session =
        Session::with_seed(RecordingSurface::new(200, 200), Config::default(), 0.0, 5);
    let dt = 20.0;
    let target = 1000.0 / dt;

    let mut prev = (session.fps() - target).abs();
    for i in 1..=120 {
        session.tick(f64::from(i) * dt);
        let err = (session.fps() - target).abs();
        assert!(err <= prev);
        prev = err;
    }
    assert!(prev < 0.1);
}

/// Test: a field that exactly meets coverage and spread reveals at the start
/// delay, not a millisecond earlier, and only once.
#[test]
fn test_reveal_fires_exactly_at_start_delay() {
    let geometry = Geometry::from_surface(1000, 1000);
    let config = Config {
        speed: 0.0,
        start_delay_ms: 300.0,
        reveal_radius_frac: 0.35,
        min_reveal_spread_ratio: 0.5,
        ..Config::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut pool = StarPool::default();
    pool.resize_to(8, &mut rng, &geometry, &config, SpawnMode::Hidden);

    // Four stars on the coverage margins (beyond the reveal radius), four at
    // the center: spread ratio 0.5 exactly.
    let positions = [
        Vec2::new(39.5, 500.0),
        Vec2::new(960.5, 500.0),
        Vec2::new(500.0, 39.5),
        Vec2::new(500.0, 960.5),
        Vec2::new(500.0, 500.0),
        Vec2::new(500.0, 500.0),
        Vec2::new(500.0, 500.0),
        Vec2::new(500.0, 500.0),
    ];
    for (star, pos) in pool.stars_mut().iter_mut().zip(positions) {
        star.pos = pos;
    }

    let mut gate = RevealGate::new(&config, 1_000.0);
    let params = StepParams {
        dt_sec: 0.016,
        scale: 1.0,
        track_spread: true,
        spawn_mode: SpawnMode::Hidden,
    };

    let mut fired = Vec::new();
    for now in [1_299.0, 1_300.0, 1_301.0, 1_400.0] {
        let outcome = physics::step(&mut pool, &geometry, &config, params, &mut rng, |_| {});
        let spread = outcome.spread.unwrap();
        assert_eq!(outcome.respawned, 0);
        assert!((spread.ratio() - 0.5).abs() < f32::EPSILON);
        if let Some(at) = gate.evaluate(&spread, &geometry, &config, now) {
            fired.push(at);
        }
    }

    assert_eq!(fired, vec![1_300.0]);
}

/// Test: respawns keep clear of the inner radius while hidden and may land
/// anywhere in the disc once visible.
#[test]
fn test_respawn_mode_follows_visibility() {
    let config = Config {
        speed: 900.0,
        start_delay_ms: 500.0,
        hidden_spawn_min_radius_frac: Some(0.3),
        ..Config::default()
    };
    let mut session = Session::with_seed(RecordingSurface::new(640, 480), config, 0.0, 17);
    let inner = 0.3 * session.geometry().min_dim();

    // A star sits at exactly z = 1 only on the tick it was respawned.
    let respawn_radii = |session: &Session<RecordingSurface>| -> Vec<f32> {
        let center = session.geometry().center();
        session
            .pool()
            .stars()
            .iter()
            .filter(|s| s.z == 1.0)
            .map(|s| s.pos.distance(center))
            .collect()
    };

    let mut now = 0.0;
    let mut hidden_respawns = 0;
    while !session.is_visible() {
        assert!(now < 10_000.0, "field never revealed");
        now += FRAME_MS;
        session.tick(now);
        for r in respawn_radii(&session) {
            assert!(r >= inner - 1e-2, "hidden respawn at r = {r}");
            hidden_respawns += 1;
        }
    }
    assert!(hidden_respawns > 0);

    let mut inside = 0;
    for _ in 0..300 {
        now += FRAME_MS;
        session.tick(now);
        inside += respawn_radii(&session).into_iter().filter(|&r| r < inner).count();
    }
    assert!(inside > 0, "visible respawns never used the inner disc");
}

/// Test: every star drawn lands in exactly one bin.
#[test]
fn test_rasterizer_conserves_segments() {
    let mut session =
        Session::with_seed(RecordingSurface::new(1600, 900), Config::default(), 0.0, 21);
    let mut now = run_until_visible(&mut session, 0.0);
    session.surface_mut().take_calls();

    for _ in 0..60 {
        now += FRAME_MS;
        let report = session.tick(now);
        let stars = session.pool().len();

        assert!(!report.held);
        assert_eq!(report.segments as usize, stars);
        assert_eq!(session.surface().segment_count(), stars);
        assert_eq!(session.surface().stroke_count(), report.draw_calls as usize);
        assert!(report.draw_calls <= 36);
        session.surface_mut().take_calls();
    }
}

/// Test: the software surface ends up with visible streaks, masked at the
/// vanishing point.
#[test]
fn test_pixel_surface_renders_streaks() {
    let mut session = Session::with_seed(PixelSurface::new(0, 0), Config::default(), 0.0, 8);
    session.resize(&ResizeRequest::centered(480.0, 270.0, 1.0)).unwrap();

    let now = run_until_visible(&mut session, 0.0);
    session.tick(now + FRAME_MS);

    let pixels = session.into_surface();
    assert_eq!(pixels.size(), (480, 270));
    assert!(pixels.lit_pixels() > 0);
    assert_eq!(pixels.pixel(240, 135).map(|p| p[3]), Some(0));
}

/// Test: sessions run behind a boxed trait object.
#[test]
fn test_boxed_surface_session() {
    let surface: Box<dyn RasterSurface> = Box::new(RecordingSurface::new(320, 240));
    let mut session = Session::with_seed(surface, Config::default(), 0.0, 2);
    run_until_visible(&mut session, 0.0);
    assert_eq!(session.surface().size(), (320, 240));
}
