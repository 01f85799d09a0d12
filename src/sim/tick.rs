//! Fixed timestep simulation tick
//!
//! One tick, start to finish: every controller samples its keys and sends its
//! command, the engine steps once, then containment runs on every body.
//! Nothing is carried between ticks except the controllers themselves.

use super::containment::ContainedBody;
use super::vehicle::VehicleController;
use crate::input::KeySource;
use crate::physics::PhysicsBackend;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Controllers that sent a command
    pub commanded: usize,
    /// Controllers skipped because their body is not ready
    pub skipped: usize,
}

/// Drives every vehicle controller in registration order
#[derive(Debug, Clone, Default)]
pub struct SimulationDriver {
    controllers: Vec<VehicleController>,
    /// Uncontrolled dynamic bodies that still get containment
    bodies: Vec<ContainedBody>,
}

impl SimulationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller; returns its index
    pub fn add_controller(&mut self, controller: VehicleController) -> usize {
        self.controllers.push(controller);
        self.controllers.len() - 1
    }

    pub fn add_body(&mut self, body: ContainedBody) {
        self.bodies.push(body);
    }

    pub fn controllers(&self) -> &[VehicleController] {
        &self.controllers
    }

    pub fn controller_mut(&mut self, index: usize) -> Option<&mut VehicleController> {
        self.controllers.get_mut(index)
    }

    /// Advance the whole simulation by one step of `dt` seconds
    pub fn tick<P, K>(&mut self, keys: &K, world: &mut P, dt: f32) -> TickReport
    where
        P: PhysicsBackend + ?Sized,
        K: KeySource + ?Sized,
    {
        let mut report = TickReport::default();

        for controller in &mut self.controllers {
            let signals = controller.controls().sample(keys);
            match controller.advance(signals, world) {
                Some(_) => report.commanded += 1,
                None => report.skipped += 1,
            }
        }

        world.step(dt);

        for controller in &mut self.controllers {
            controller.contain(world);
        }
        for body in &self.bodies {
            body.containment.enforce(world, body.handle);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ControlMap, KeyCode, KeyboardState, ScriptedKeys};
    use crate::physics::ArcadeWorld;
    use crate::sim::{
        ArenaBounds, ArenaSpec, ColliderShape, Containment, DynamicBodyDesc, VehicleParams,
    };
    use glam::Vec3;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn car_desc(pos: Vec3, yaw: f32) -> DynamicBodyDesc {
        DynamicBodyDesc::new(
            "car",
            ColliderShape::Cuboid {
                half_extents: Vec3::new(2.0, 1.0, 4.0),
            },
        )
        .with_mass(100.0)
        .at(pos, yaw)
        .locked_rotations()
    }

    fn clamp_driver(world: &mut ArcadeWorld, yaw: f32, speed: f32) -> SimulationDriver {
        let bounds = ArenaBounds::from_half_extents(350.0, 490.0, 10.0);
        let params = VehicleParams {
            speed,
            rotation_speed: 0.05,
            initial_yaw: yaw,
            spawn: Vec3::ZERO,
        };
        let mut ctrl = VehicleController::new("p1", ControlMap::wasd(), params, Containment::Clamp(bounds));
        ctrl.attach(world.add_dynamic(&car_desc(Vec3::ZERO, yaw)));

        let mut driver = SimulationDriver::new();
        driver.add_controller(ctrl);
        driver
    }

    #[test]
    fn test_forward_clamped_at_far_end() {
        // Half extents (350, 490) less margin 10: x in [-340, 340], z in [-480, 480]
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let mut driver = clamp_driver(&mut world, 0.0, 1.0);

        let keys = [KeyCode::KeyW];
        for _ in 0..1000 {
            driver.tick(&keys, &mut world, 1.0);
        }
        let pos = driver.controllers()[0].state().position;
        assert!((pos.z - 480.0).abs() < 1e-3, "z = {}", pos.z);
        assert!(pos.x.abs() < 1e-3);
    }

    #[test]
    fn test_sideways_clamped_at_touchline() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let mut driver = clamp_driver(&mut world, FRAC_PI_2, 1.0);

        for _ in 0..1000 {
            driver.tick(&[KeyCode::KeyW], &mut world, 1.0);
        }
        let pos = driver.controllers()[0].state().position;
        assert!((pos.x - 340.0).abs() < 1e-3, "x = {}", pos.x);
    }

    #[test]
    fn test_idle_is_stable() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let mut driver = clamp_driver(&mut world, 0.4, 5.0);
        let handle = driver.controllers()[0].body().unwrap();
        world.set_linvel(handle, Vec3::new(0.0, -3.0, 0.0));

        let keys = KeyboardState::new();
        for _ in 0..100 {
            driver.tick(&keys, &mut world, 0.0);
            let state = driver.controllers()[0].state();
            assert_eq!(state.yaw, 0.4);
            assert_eq!(state.linear_velocity, Vec3::new(0.0, -3.0, 0.0));
        }
    }

    #[test]
    fn test_two_players_independent() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let mut driver = SimulationDriver::new();
        for (label, map, yaw, z) in [
            ("p1", ControlMap::wasd(), 0.0, -100.0),
            ("p2", ControlMap::arrows(), PI, 100.0),
        ] {
            let params = VehicleParams {
                speed: 30.0,
                rotation_speed: 0.05,
                initial_yaw: yaw,
                spawn: Vec3::new(0.0, 0.0, z),
            };
            let mut ctrl = VehicleController::new(label, map, params, Containment::Walls);
            ctrl.attach(world.add_dynamic(&car_desc(params.spawn, yaw)));
            driver.add_controller(ctrl);
        }

        let mut keys = KeyboardState::new();
        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::ArrowUp);
        let report = driver.tick(&keys, &mut world, 1.0 / 60.0);
        assert_eq!(report, TickReport { commanded: 2, skipped: 0 });

        let p1 = driver.controllers()[0].state();
        let p2 = driver.controllers()[1].state();
        assert_eq!(p1.yaw, 0.05);
        assert_eq!(p1.linear_velocity, Vec3::ZERO);
        assert_eq!(p2.yaw, PI);
        // Facing each other: p2 drives toward -Z
        assert!((p2.linear_velocity.z + 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_pending_controller_skipped() {
        let mut world = ArcadeWorld::new(Vec3::new(0.0, -15.0, 0.0));
        let mut driver = SimulationDriver::new();
        driver.add_controller(VehicleController::new(
            "loading",
            ControlMap::wasd(),
            VehicleParams::default(),
            Containment::Walls,
        ));

        let report = driver.tick(&[KeyCode::KeyW, KeyCode::KeyA], &mut world, 1.0 / 60.0);
        assert_eq!(report, TickReport { commanded: 0, skipped: 1 });
        assert_eq!(driver.controllers()[0].state().yaw, 0.0);

        // Asset arrives: next tick runs normally
        let handle = world.add_dynamic(&car_desc(Vec3::new(0.0, 10.0, 0.0), 0.0));
        driver.controller_mut(0).unwrap().attach(handle);
        let report = driver.tick(&[KeyCode::KeyW], &mut world, 1.0 / 60.0);
        assert_eq!(report.commanded, 1);
    }

    #[test]
    fn test_uncontrolled_body_clamped() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let ball = world.add_dynamic(
            &DynamicBodyDesc::new("ball", ColliderShape::Ball { radius: 1.0 })
                .at(Vec3::new(330.0, 0.0, 0.0), 0.0),
        );
        world.set_linvel(ball, Vec3::new(600.0, 0.0, 0.0));

        let mut driver = SimulationDriver::new();
        driver.add_body(ContainedBody {
            handle: ball,
            containment: Containment::Clamp(ArenaBounds::from_half_extents(350.0, 490.0, 10.0)),
        });
        driver.tick(&KeyboardState::new(), &mut world, 1.0);
        assert_eq!(world.translation(ball).unwrap().x, 340.0);
    }

    #[test]
    fn test_walls_contain_cars_in_arena() {
        let arena = ArenaSpec::default();
        let mut world = ArcadeWorld::new(Vec3::new(0.0, -15.0, 0.0));
        for body in arena.static_bodies() {
            world.add_static(&body);
        }
        let mut driver = SimulationDriver::new();
        let params = VehicleParams {
            speed: 120.0,
            rotation_speed: 0.05,
            initial_yaw: 0.7,
            spawn: Vec3::new(0.0, 1.0, 0.0),
        };
        let mut ctrl = VehicleController::new("p1", ControlMap::wasd(), params, Containment::Walls);
        ctrl.attach(world.add_dynamic(&car_desc(params.spawn, params.initial_yaw)));
        driver.add_controller(ctrl);

        let mut keys = ScriptedKeys::hold(&[KeyCode::KeyW], 2000);
        for _ in 0..2000 {
            driver.tick(&keys, &mut world, 1.0 / 60.0);
            keys.advance();
            let p = driver.controllers()[0].state().position;
            // Inner wall faces at 355 / 495; one tick of travel is 2 units
            assert!(p.x.abs() < 355.0 && p.z.abs() < 495.0, "escaped to {p}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_clamp_never_escapes(
            seed in any::<u64>(),
            yaw in -PI..PI,
            speed in 1.0f32..400.0,
        ) {
            let mut world = ArcadeWorld::new(Vec3::ZERO);
            let mut driver = clamp_driver(&mut world, yaw, speed);
            let pool = [KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD];
            let mut keys = ScriptedKeys::random(seed, &pool, 300);

            while !keys.is_finished() {
                driver.tick(&keys, &mut world, 0.5);
                keys.advance();
                let handle = driver.controllers()[0].body().unwrap();
                let p = world.translation(handle).unwrap();
                prop_assert!(p.x.abs() <= 340.0 && p.z.abs() <= 480.0, "escaped to {}", p);
            }
        }
    }
}
