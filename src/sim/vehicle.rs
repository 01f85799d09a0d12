//! Vehicle controller
//!
//! One controller per car. Each tick it turns the four control signals into
//! a horizontal velocity along the car's heading plus an absolute yaw
//! orientation, and writes both to the engine:
//! - Velocity, not force: the car stops the tick a key is released
//! - Orientation is set directly, never read back from the engine, so
//!   contact-induced spin cannot feed into the heading
//! - Vertical velocity belongs to the engine (gravity, bounces) and is kept

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::containment::Containment;
use super::state::BodyHandle;
use crate::input::{ControlMap, ControlSignals};
use crate::physics::PhysicsBackend;
use crate::{forward_axis, yaw_rotation};

/// Fixed tuning for one car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    /// Drive speed (units/s)
    pub speed: f32,
    /// Heading change per tick while turning (radians)
    pub rotation_speed: f32,
    /// Heading at spawn (radians)
    pub initial_yaw: f32,
    pub spawn: Vec3,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            speed: crate::consts::VEHICLE_SPEED,
            rotation_speed: crate::consts::VEHICLE_ROTATION_SPEED,
            initial_yaw: 0.0,
            spawn: Vec3::ZERO,
        }
    }
}

/// Controller-owned per-car state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// Last known position (synced from the engine after containment)
    pub position: Vec3,
    /// Unbounded heading accumulator, never wrapped
    pub yaw: f32,
    /// Last velocity command sent
    pub linear_velocity: Vec3,
}

/// What the controller wrote to the engine this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleCommand {
    pub linear_velocity: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone)]
pub struct VehicleController {
    label: String,
    controls: ControlMap,
    params: VehicleParams,
    containment: Containment,
    state: VehicleState,
    /// `None` until the car's model has loaded and its body exists
    body: Option<BodyHandle>,
}

impl VehicleController {
    pub fn new(
        label: impl Into<String>,
        controls: ControlMap,
        params: VehicleParams,
        containment: Containment,
    ) -> Self {
        Self {
            label: label.into(),
            controls,
            params,
            containment,
            state: VehicleState {
                position: params.spawn,
                yaw: params.initial_yaw,
                linear_velocity: Vec3::ZERO,
            },
            body: None,
        }
    }

    /// Bind to the engine body once it exists
    pub fn attach(&mut self, handle: BodyHandle) {
        log::debug!("{} attached to body {:?}", self.label, handle);
        self.body = Some(handle);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn controls(&self) -> &ControlMap {
        &self.controls
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    pub fn containment(&self) -> Containment {
        self.containment
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn is_ready(&self) -> bool {
        self.body.is_some()
    }

    /// Advance one tick and send the command to the engine.
    ///
    /// Returns `None` (and changes nothing) while the body is not available.
    pub fn advance<P: PhysicsBackend + ?Sized>(
        &mut self,
        signals: ControlSignals,
        world: &mut P,
    ) -> Option<VehicleCommand> {
        let handle = self.body?;
        let vertical = world.linvel(handle)?.y;

        // Drive along the heading held at the start of the tick
        let horizontal = forward_axis(self.state.yaw) * (self.params.speed * signals.throttle());
        self.state.yaw += self.params.rotation_speed * signals.steer();

        let command = VehicleCommand {
            linear_velocity: Vec3::new(horizontal.x, vertical, horizontal.z),
            rotation: yaw_rotation(self.state.yaw),
        };
        world.set_linvel(handle, command.linear_velocity);
        world.set_rotation(handle, command.rotation);
        self.state.linear_velocity = command.linear_velocity;

        log::trace!(
            "{}: yaw={:.3} vel={}",
            self.label,
            self.state.yaw,
            command.linear_velocity
        );
        Some(command)
    }

    /// Post-step containment and position sync
    pub fn contain<P: PhysicsBackend + ?Sized>(&mut self, world: &mut P) {
        let Some(handle) = self.body else {
            return;
        };
        if let Some(position) = self.containment.enforce(world, handle) {
            self.state.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ArcadeWorld;
    use crate::sim::state::{ColliderShape, DynamicBodyDesc};
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const SPEED: f32 = 10.0;
    const TURN: f32 = 0.1;

    fn car(yaw: f32) -> (ArcadeWorld, VehicleController) {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let handle = world.add_dynamic(&DynamicBodyDesc::new(
            "car",
            ColliderShape::Cuboid {
                half_extents: Vec3::new(2.0, 1.0, 4.0),
            },
        ));
        let params = VehicleParams {
            speed: SPEED,
            rotation_speed: TURN,
            initial_yaw: yaw,
            spawn: Vec3::ZERO,
        };
        let mut ctrl = VehicleController::new("car", ControlMap::wasd(), params, Containment::Walls);
        ctrl.attach(handle);
        (world, ctrl)
    }

    fn signals(forward: bool, backward: bool, left: bool, right: bool) -> ControlSignals {
        ControlSignals {
            forward,
            backward,
            left,
            right,
        }
    }

    #[test]
    fn test_forward_at_zero_yaw_is_plus_z() {
        let (mut world, mut ctrl) = car(0.0);
        let cmd = ctrl.advance(signals(true, false, false, false), &mut world).unwrap();
        assert!(cmd.linear_velocity.x.abs() < 1e-5);
        assert!((cmd.linear_velocity.z - SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_forward_at_quarter_turn_is_plus_x() {
        let (mut world, mut ctrl) = car(FRAC_PI_2);
        let cmd = ctrl.advance(signals(true, false, false, false), &mut world).unwrap();
        assert!((cmd.linear_velocity.x - SPEED).abs() < 1e-5);
        assert!(cmd.linear_velocity.z.abs() < 1e-5);
    }

    #[test]
    fn test_backward_reverses() {
        let (mut world, mut ctrl) = car(PI);
        let cmd = ctrl.advance(signals(false, true, false, false), &mut world).unwrap();
        // Facing -Z, reversing moves +Z
        assert!((cmd.linear_velocity.z - SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_turn_uses_heading_from_start_of_tick() {
        let (mut world, mut ctrl) = car(0.0);
        let cmd = ctrl.advance(signals(true, false, true, false), &mut world).unwrap();
        // Velocity still along +Z, orientation already turned
        assert!(cmd.linear_velocity.x.abs() < 1e-6);
        assert_eq!(ctrl.state().yaw, TURN);
        assert!(cmd.rotation.abs_diff_eq(Quat::from_rotation_y(TURN), 1e-6));
    }

    #[test]
    fn test_command_reaches_engine() {
        let (mut world, mut ctrl) = car(0.0);
        let handle = ctrl.body().unwrap();
        ctrl.advance(signals(false, false, false, true), &mut world);
        let pose = world.transform(handle).unwrap();
        assert!(pose.rotation.abs_diff_eq(Quat::from_rotation_y(-TURN), 1e-6));
    }

    #[test]
    fn test_vertical_velocity_preserved() {
        let (mut world, mut ctrl) = car(0.3);
        let handle = ctrl.body().unwrap();
        world.set_linvel(handle, Vec3::new(5.0, -7.25, 5.0));

        let cmd = ctrl.advance(signals(true, false, true, false), &mut world).unwrap();
        assert_eq!(cmd.linear_velocity.y, -7.25);
        assert_eq!(world.linvel(handle).unwrap().y, -7.25);
    }

    #[test]
    fn test_idle_zeroes_horizontal_only() {
        let (mut world, mut ctrl) = car(1.0);
        let handle = ctrl.body().unwrap();
        world.set_linvel(handle, Vec3::new(3.0, 2.0, 1.0));

        for _ in 0..50 {
            let cmd = ctrl.advance(ControlSignals::default(), &mut world).unwrap();
            assert_eq!(cmd.linear_velocity, Vec3::new(0.0, 2.0, 0.0));
        }
        assert_eq!(ctrl.state().yaw, 1.0);
    }

    #[test]
    fn test_pending_body_is_noop() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let mut ctrl = VehicleController::new(
            "late",
            ControlMap::arrows(),
            VehicleParams {
                initial_yaw: PI,
                ..Default::default()
            },
            Containment::Walls,
        );
        let before = *ctrl.state();

        let cmd = ctrl.advance(signals(true, false, true, false), &mut world);
        ctrl.contain(&mut world);
        assert!(cmd.is_none());
        assert_eq!(*ctrl.state(), before);
        assert!(!ctrl.is_ready());
    }

    #[test]
    fn test_unknown_handle_is_noop() {
        let mut world = ArcadeWorld::new(Vec3::ZERO);
        let mut ctrl =
            VehicleController::new("ghost", ControlMap::wasd(), VehicleParams::default(), Containment::Walls);
        ctrl.attach(BodyHandle(99));
        let before = *ctrl.state();
        assert!(ctrl.advance(signals(true, false, false, true), &mut world).is_none());
        assert_eq!(*ctrl.state(), before);
    }

    proptest! {
        #[test]
        fn prop_yaw_accumulates_per_tick(n in 0usize..500, left in any::<bool>()) {
            let (mut world, mut ctrl) = car(0.0);
            let s = signals(false, false, left, !left);
            for _ in 0..n {
                ctrl.advance(s, &mut world);
            }
            let expected = if left { 1.0 } else { -1.0 } * n as f32 * TURN;
            prop_assert!((ctrl.state().yaw - expected).abs() <= 1e-3 * (1.0 + n as f32 * TURN));
        }

        #[test]
        fn prop_left_right_cancel(n in 0usize..300, yaw in -10.0f32..10.0, fwd in any::<bool>()) {
            let (mut world, mut ctrl) = car(yaw);
            for _ in 0..n {
                ctrl.advance(signals(fwd, false, true, true), &mut world);
            }
            prop_assert_eq!(ctrl.state().yaw, yaw);
        }

        #[test]
        fn prop_command_speed_bounded(yaw in -20.0f32..20.0, f in any::<bool>(), b in any::<bool>()) {
            let (mut world, mut ctrl) = car(yaw);
            let cmd = ctrl.advance(signals(f, b, false, false), &mut world).unwrap();
            let horizontal = Vec3::new(cmd.linear_velocity.x, 0.0, cmd.linear_velocity.z);
            let expected = if f != b { SPEED } else { 0.0 };
            prop_assert!((horizontal.length() - expected).abs() < 1e-3);
        }
    }
}
