use common::Camera3D;
use glam::{Vec2, Vec3};
use gravity_sandbox::config::{SimConfig, SpawnConfig, ThreeBodyConfig};
use gravity_sandbox::driver::{run_frames, FrameStep, SpawnScene, ThreeBodyScene};
use gravity_sandbox::physics_3d::{
    accumulate_forces, force_magnitude, pairwise_force, Body3D, GravityParams, Simulation3D,
};
use gravity_sandbox::spawner::{random_color, Spawner};
use gravity_sandbox::three_body::{step_three_body, three_body_forces};
use gravity_sandbox::trail::{Trail, TRAIL_LENGTH};
use gravity_sandbox::{ConfigError, SpawnError};
use rand::{rngs::StdRng, SeedableRng};

/// Two bodies at rest separated along the x-axis, centered on the origin
pub fn two_body_sim(dist: f32, params: GravityParams) -> Simulation3D {
    let mut sim = Simulation3D::new(params);
    sim.add_body(Body3D::at_rest(Vec3::new(-dist / 2.0, 0.0, 0.0)));
    sim.add_body(Body3D::at_rest(Vec3::new(dist / 2.0, 0.0, 0.0)));
    sim
}

/// Asymmetric three-body configuration that does not start in equilibrium
pub fn three_bodies() -> [Body3D; 3] {
    [
        Body3D::new(Vec3::new(3.0, 0.0, 0.5), Vec3::new(0.0, 0.6, 0.0)),
        Body3D::new(Vec3::new(-2.0, 2.5, 0.0), Vec3::new(-0.4, -0.2, 0.1)),
        Body3D::new(Vec3::new(-1.0, -3.0, -0.5), Vec3::new(0.5, -0.3, -0.1)),
    ]
}

pub fn spawn_camera() -> Camera3D {
    Camera3D::facing_xy_plane(1280.0 / 720.0, 50.0, 75.0)
}

pub fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

pub fn approx_vec(a: Vec3, b: Vec3, tol: f32) -> bool {
    (a - b).length() <= tol * b.length().max(1.0)
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn force_magnitude_matches_hand_values() {
    // G·m·m = 1 · 0.5 · 0.5 = 0.25
    let p = GravityParams::spawn();

    assert!(approx(force_magnitude(0.0, &p), 2.5, 1e-6));
    assert!(approx(force_magnitude(1.0, &p), 0.25 / 1.1, 1e-6));
    assert!(approx(force_magnitude(10.0, &p), 0.25 / 100.1, 1e-6));
}

#[test]
fn three_body_force_magnitude_matches_hand_values() {
    // G·m·m = 10 · 1 · 1 = 10
    let p = GravityParams::three_body();

    assert!(approx(force_magnitude(0.0, &p), 100.0, 1e-6));
    assert!(approx(force_magnitude(1.0, &p), 10.0 / 1.1, 1e-6));
    assert!(approx(force_magnitude(10.0, &p), 10.0 / 100.1, 1e-6));
}

#[test]
fn pairwise_force_points_toward_other_body() {
    let p = GravityParams::spawn();
    let f = pairwise_force(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), &p);

    assert!(approx_vec(f, Vec3::new(0.0, 0.25 / 100.1, 0.0), 1e-6), "f = {f:?}");
}

#[test]
fn coincident_bodies_exert_no_force() {
    let p = GravityParams::spawn();
    let at = Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(pairwise_force(at, at, &p), Vec3::ZERO);

    let mut sim = Simulation3D::new(p);
    sim.add_body(Body3D::at_rest(at));
    sim.add_body(Body3D::at_rest(at));
    sim.step();

    assert!(sim.bodies.iter().all(|b| b.velocity == Vec3::ZERO && b.position == at));
}

#[test]
fn coincident_bodies_without_softening_stay_finite() {
    let p = GravityParams {
        softening: 0.0,
        ..GravityParams::spawn()
    };
    assert_eq!(pairwise_force(Vec3::ONE, Vec3::ONE, &p), Vec3::ZERO);

    let mut sim = Simulation3D::new(p);
    sim.add_body(Body3D::at_rest(Vec3::ONE));
    sim.add_body(Body3D::at_rest(Vec3::ONE));
    sim.add_body(Body3D::at_rest(Vec3::new(4.0, 1.0, 1.0)));
    run_frames_sim(&mut sim, 2);

    assert!(sim
        .bodies
        .iter()
        .all(|b| b.position.is_finite() && b.velocity.is_finite()));
}

#[test]
fn gravity_newton_third_law() {
    let bodies = three_bodies();
    let mut forces = Vec::new();
    accumulate_forces(&bodies, &GravityParams::spawn(), &mut forces);

    let net: Vec3 = forces.iter().copied().sum();
    assert!(net.length() < 1e-6, "net force not zero: {net:?}");
}

#[test]
fn velocity_updates_before_position() {
    let p = GravityParams::spawn();
    let mut sim = two_body_sim(2.0, p);
    sim.bodies[0].velocity = Vec3::new(0.0, 1.0, 0.0);
    sim.bodies[1].velocity = Vec3::new(0.0, -1.0, 0.0);

    let start = sim.bodies[0].position;
    let v_old = sim.bodies[0].velocity;
    let force = Vec3::new(force_magnitude(2.0, &p), 0.0, 0.0);

    sim.step();

    let delta = sim.bodies[0].position - start;
    let semi_implicit = (v_old + force * p.dt) * p.dt;
    let explicit = v_old * p.dt;

    assert!(approx_vec(delta, semi_implicit, 1e-6), "delta = {delta:?}");
    assert!((delta - explicit).length() > 1e-5);
    assert!(approx_vec(sim.bodies[0].velocity, v_old + force * p.dt, 1e-6));
}

#[test]
fn two_bodies_attract() {
    let mut sim = two_body_sim(4.0, GravityParams::spawn());
    run_frames_sim(&mut sim, 10);

    let gap = sim.bodies[1].position.x - sim.bodies[0].position.x;
    assert!(gap < 4.0, "bodies did not approach: gap = {gap}");
    assert_eq!(sim.bodies[0].position.y, 0.0);
}

fn run_frames_sim(sim: &mut Simulation3D, steps: usize) {
    for _ in 0..steps {
        sim.step();
    }
}

#[test]
fn empty_store_steps_without_effect() {
    let mut sim = Simulation3D::new(GravityParams::spawn());
    run_frames_sim(&mut sim, 100);

    assert!(sim.bodies.is_empty());
    assert_eq!(sim.steps, 100);
}

#[test]
fn single_body_feels_no_force() {
    let p = GravityParams::spawn();
    let mut sim = Simulation3D::new(p);
    let velocity = Vec3::new(0.5, -0.25, 0.0);
    sim.add_body(Body3D::new(Vec3::ONE, velocity));

    let mut forces = Vec::new();
    accumulate_forces(&sim.bodies, &p, &mut forces);
    assert_eq!(forces, vec![Vec3::ZERO]);

    run_frames_sim(&mut sim, 1000);

    assert_eq!(sim.bodies[0].velocity, velocity);
    assert!(approx_vec(sim.bodies[0].position, Vec3::ONE + velocity * p.dt * 1000.0, 1e-3));
}

#[test]
fn resting_single_body_stays_put() {
    let mut sim = Simulation3D::new(GravityParams::three_body());
    sim.add_body(Body3D::at_rest(Vec3::new(4.0, 5.0, 6.0)));
    run_frames_sim(&mut sim, 500);

    assert_eq!(sim.bodies[0].position, Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(sim.bodies[0].velocity, Vec3::ZERO);
}

#[test]
fn step_advances_clock() {
    let mut sim = two_body_sim(1.0, GravityParams::spawn());
    run_frames_sim(&mut sim, 10);

    assert_eq!(sim.steps, 10);
    assert!(approx(sim.elapsed_time, 1.0, 1e-5));
}

#[test]
fn center_of_mass_is_mean_position() {
    let sim = two_body_sim(6.0, GravityParams::spawn());
    assert_eq!(sim.center_of_mass(), Vec3::ZERO);
}

#[test]
fn total_energy_uses_softened_potential() {
    let p = GravityParams::spawn();
    let sim = two_body_sim(1.0, p);

    // At rest: E = -G·m² / sqrt(1 + 0.1)
    let expected = -0.25 / 1.1f32.sqrt();
    assert!(approx(sim.total_energy(), expected, 1e-6));
}

// ==================================================================================
// Three-body tests
// ==================================================================================

#[test]
fn unrolled_forces_match_general_sum() {
    let p = GravityParams::three_body();
    let bodies = three_bodies();

    let unrolled = three_body_forces(&bodies, &p);
    let mut general = Vec::new();
    accumulate_forces(&bodies, &p, &mut general);

    for (a, b) in unrolled.iter().zip(&general) {
        assert!(approx_vec(*a, *b, 1e-6), "{a:?} != {b:?}");
    }
}

#[test]
fn unrolled_step_matches_general_step_for_100_steps() {
    let p = GravityParams::three_body();
    let mut unrolled = three_bodies();
    let mut general = Simulation3D::new(p);
    for body in three_bodies() {
        general.add_body(body);
    }

    for step in 0..100 {
        step_three_body(&mut unrolled, &p);
        general.step();

        for (a, b) in unrolled.iter().zip(&general.bodies) {
            assert!(
                approx_vec(a.position, b.position, 1e-4),
                "step {step}: {:?} != {:?}",
                a.position,
                b.position
            );
            assert!(approx_vec(a.velocity, b.velocity, 1e-4));
        }
    }
}

// ==================================================================================
// Trail tests
// ==================================================================================

#[test]
fn trail_keeps_first_k_frames_at_front() {
    let mut scene = ThreeBodyScene::from_bodies(three_bodies(), GravityParams::three_body(), TRAIL_LENGTH);
    run_frames(&mut scene, 10);

    let trail = &scene.trails.trails()[0];
    let flat = trail.flat();

    assert_eq!(trail.len(), 10);
    assert_eq!(flat.len(), 3 * TRAIL_LENGTH);
    assert!(flat[..30].chunks_exact(3).all(|p| p != [0.0, 0.0, 0.0]));
    assert!(flat[30..].iter().all(|v| *v == 0.0));
}

#[test]
fn trail_discards_oldest_once_full() {
    let mut trail = Trail::new(TRAIL_LENGTH);
    for i in 0..1500 {
        trail.push_front(Vec3::new(i as f32, 0.0, 0.0));
    }

    assert_eq!(trail.len(), TRAIL_LENGTH);
    assert_eq!(trail.get(0), Some(Vec3::new(1499.0, 0.0, 0.0)));
    assert_eq!(trail.get(TRAIL_LENGTH - 1), Some(Vec3::new(500.0, 0.0, 0.0)));
    assert_eq!(trail.get(TRAIL_LENGTH), None);

    let flat = trail.flat();
    assert_eq!(flat.len(), 3 * TRAIL_LENGTH);
    assert_eq!(&flat[..6], &[1499.0, 0.0, 0.0, 1498.0, 0.0, 0.0]);
    assert_eq!(flat[3 * TRAIL_LENGTH - 3], 500.0);
}

#[test]
fn trail_iterates_most_recent_first() {
    let mut trail = Trail::new(5);
    for i in 1..=3 {
        trail.push_front(Vec3::splat(i as f32));
    }

    let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![3.0, 2.0, 1.0]);
}

#[test]
fn trail_lags_body_by_one_frame() {
    let mut scene = ThreeBodyScene::from_bodies(three_bodies(), GravityParams::three_body(), TRAIL_LENGTH);
    run_frames(&mut scene, 5);

    let before = scene.bodies.map(|b| b.position);
    scene.tick();

    for (i, trail) in scene.trails.trails().iter().enumerate() {
        assert_eq!(trail.get(0), Some(before[i]));
        assert_ne!(trail.get(0), Some(scene.bodies[i].position));
    }
}

#[test]
fn first_trail_point_is_initial_position() {
    let bodies = three_bodies();
    let mut scene = ThreeBodyScene::from_bodies(bodies, GravityParams::three_body(), TRAIL_LENGTH);
    scene.tick();

    assert_eq!(scene.trails.trails()[1].get(0), Some(bodies[1].position));
}

#[test]
fn tick_marks_trails_dirty() {
    let mut scene = ThreeBodyScene::from_bodies(three_bodies(), GravityParams::three_body(), 8);
    assert!(!scene.trails.any_dirty());

    scene.tick();
    assert!(scene.trails.any_dirty());

    scene.trails.mark_clean();
    assert!(!scene.trails.any_dirty());
}

#[test]
fn reset_restores_bodies_and_clears_trails() {
    let bodies = three_bodies();
    let mut scene = ThreeBodyScene::from_bodies(bodies, GravityParams::three_body(), 16);
    run_frames(&mut scene, 20);
    scene.reset();

    assert_eq!(scene.bodies, bodies);
    assert_eq!(scene.steps(), 0);
    assert!(scene.trails.trails().iter().all(Trail::is_empty));
}

// ==================================================================================
// Spawner tests
// ==================================================================================

fn seeded() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn center_click_spawns_at_origin() {
    let mut sim = Simulation3D::new(GravityParams::spawn());
    let spawner = Spawner::new(10, 0.5);
    let viewport = Vec2::new(1280.0, 720.0);

    let index = spawner
        .spawn_at_cursor(&mut sim, &spawn_camera(), viewport / 2.0, viewport, &mut seeded())
        .unwrap();

    let body = sim.bodies[index];
    assert!(approx_vec(body.position, Vec3::ZERO, 1e-3), "spawned at {:?}", body.position);
    assert_eq!(body.position.z, 0.0);
    assert_eq!(body.velocity, Vec3::ZERO);
    assert_eq!(body.radius, 0.5);
    assert_eq!(body.color[3], 1.0);
}

#[test]
fn off_center_click_lands_in_matching_quadrant() {
    let mut sim = Simulation3D::new(GravityParams::spawn());
    let spawner = Spawner::new(10, 0.5);
    let viewport = Vec2::new(1280.0, 720.0);

    // Upper right quadrant of the window
    spawner
        .spawn_at_cursor(&mut sim, &spawn_camera(), Vec2::new(960.0, 180.0), viewport, &mut seeded())
        .unwrap();

    let position = sim.bodies[0].position;
    assert!(position.x > 0.0 && position.y > 0.0, "spawned at {position:?}");
    assert_eq!(position.z, 0.0);
}

#[test]
fn camera_facing_away_spawns_nothing() {
    let mut sim = Simulation3D::new(GravityParams::spawn());
    let spawner = Spawner::new(10, 0.5);

    let mut camera = spawn_camera();
    camera.position = Vec3::new(0.0, 0.0, 10.0);
    camera.target = Vec3::new(0.0, 0.0, 20.0);

    let result = spawner.spawn_at_ndc(&mut sim, &camera, Vec2::ZERO, &mut seeded());

    assert_eq!(result, Err(SpawnError::MissedPlane));
    assert!(sim.bodies.is_empty());
}

#[test]
fn full_store_spawns_nothing() {
    let mut sim = Simulation3D::new(GravityParams::spawn());
    let spawner = Spawner::new(2, 0.5);
    let camera = spawn_camera();
    let mut rng = seeded();

    assert_eq!(spawner.spawn_at_ndc(&mut sim, &camera, Vec2::ZERO, &mut rng), Ok(0));
    assert_eq!(spawner.spawn_at_ndc(&mut sim, &camera, Vec2::new(0.5, 0.0), &mut rng), Ok(1));
    assert_eq!(
        spawner.spawn_at_ndc(&mut sim, &camera, Vec2::new(-0.5, 0.0), &mut rng),
        Err(SpawnError::StoreFull { capacity: 2 })
    );
    assert_eq!(sim.bodies.len(), 2);
}

#[test]
fn zero_sized_viewport_spawns_nothing() {
    let mut sim = Simulation3D::new(GravityParams::spawn());
    let spawner = Spawner::new(10, 0.5);

    let result = spawner.spawn_at_cursor(&mut sim, &spawn_camera(), Vec2::ZERO, Vec2::ZERO, &mut seeded());

    assert_eq!(result, Err(SpawnError::EmptyViewport));
}

#[test]
fn random_color_is_opaque_and_seeded() {
    let a = random_color(&mut seeded());
    let b = random_color(&mut seeded());

    assert_eq!(a, b);
    assert_eq!(a[3], 1.0);
    assert!(a[..3].iter().all(|c| (0.0..=1.0).contains(c)));
}

#[test]
fn spawned_bodies_fall_together() {
    let mut scene = SpawnScene::with_rng(&SpawnConfig::default(), seeded());
    let viewport = Vec2::new(1280.0, 720.0);
    let camera = spawn_camera();

    scene.click(&camera, Vec2::new(400.0, 360.0), viewport).unwrap();
    scene.click(&camera, Vec2::new(880.0, 360.0), viewport).unwrap();

    let gap_before = scene.bodies()[1].position.x - scene.bodies()[0].position.x;
    run_frames(&mut scene, 20);
    let gap_after = scene.bodies()[1].position.x - scene.bodies()[0].position.x;

    assert!(gap_after < gap_before);
    assert_eq!(scene.steps(), 20);
}

#[test]
fn clear_empties_spawn_scene() {
    let mut scene = SpawnScene::with_rng(&SpawnConfig::default(), seeded());
    let viewport = Vec2::new(800.0, 600.0);
    scene.click(&spawn_camera(), Vec2::new(100.0, 100.0), viewport).unwrap();
    scene.tick();
    scene.reset();

    assert!(scene.bodies().is_empty());
    assert_eq!(scene.steps(), 0);
}

// ==================================================================================
// Config tests
// ==================================================================================

#[test]
fn default_config_uses_presets() {
    let config = SimConfig::default();

    assert_eq!(config.spawn.gravity, GravityParams::spawn());
    assert_eq!(config.three_body.gravity, GravityParams::three_body());
    assert_eq!(config.three_body.trail_length, TRAIL_LENGTH);
    assert_eq!(config.three_body.bodies.len(), 3);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_yaml_gives_defaults() {
    let config = SimConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, SimConfig::default());
}

#[test]
fn partial_yaml_overrides_only_given_fields() {
    let yaml = "
spawn:
  max_bodies: 10
three_body:
  trail_length: 250
";
    let config = SimConfig::from_yaml_str(yaml).unwrap();

    assert_eq!(config.spawn.max_bodies, 10);
    assert_eq!(config.spawn.gravity, GravityParams::spawn());
    assert_eq!(config.three_body.trail_length, 250);
    assert_eq!(config.three_body.bodies, ThreeBodyConfig::default().bodies);
}

#[test]
fn yaml_bodies_build_scene() {
    let yaml = "
three_body:
  bodies:
    - { position: [1.0, 0.0, 0.0], velocity: [0.0, 1.0, 0.0] }
    - { position: [-1.0, 0.0, 0.0], velocity: [0.0, -1.0, 0.0], color: [1.0, 0.0, 0.0, 1.0] }
    - { position: [0.0, 5.0, 0.0], velocity: [0.0, 0.0, 0.0] }
";
    let config = SimConfig::from_yaml_str(yaml).unwrap();
    let scene = ThreeBodyScene::new(&config.three_body).unwrap();

    assert_eq!(scene.bodies[0].position, Vec3::X);
    assert_eq!(scene.bodies[1].color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(scene.bodies[2].velocity, Vec3::ZERO);
}

#[test]
fn wrong_body_count_is_rejected() {
    let yaml = "
three_body:
  bodies:
    - { position: [1.0, 0.0, 0.0], velocity: [0.0, 1.0, 0.0] }
";
    let err = SimConfig::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn non_positive_dt_is_rejected() {
    let yaml = "
spawn:
  gravity: { g: 1.0, mass: 0.5, dt: 0.0, softening: 0.1 }
";
    let err = SimConfig::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn zero_softening_is_rejected() {
    let yaml = "
spawn:
  gravity: { g: 1.0, mass: 0.5, dt: 0.1, softening: 0.0 }
";
    let err = SimConfig::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn single_gravity_value_keeps_scene_preset() {
    let yaml = "
spawn:
  gravity: { dt: 0.05 }
three_body:
  gravity: { g: 2.0 }
";
    let config = SimConfig::from_yaml_str(yaml).unwrap();

    assert_eq!(
        config.spawn.gravity,
        GravityParams {
            dt: 0.05,
            ..GravityParams::spawn()
        }
    );
    assert_eq!(
        config.three_body.gravity,
        GravityParams {
            g: 2.0,
            ..GravityParams::three_body()
        }
    );
}

#[test]
fn zero_trail_length_is_rejected() {
    let mut config = SimConfig::default();
    config.three_body.trail_length = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = SimConfig::from_yaml_str("spawn: [not, a, map]").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::path::Path::new("/nonexistent/gravity_sandbox.yaml");
    let err = SimConfig::load(path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err}");
}

#[test]
fn no_path_loads_defaults() {
    let config = SimConfig::load_or_default(None).unwrap();
    assert_eq!(config, SimConfig::default());
}
