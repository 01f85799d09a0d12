//! Scene composition
//!
//! Builds a running session from [`SessionSettings`]: the arena is registered
//! with the physics engine and the renderer up front, the two cars and the
//! ball wait for their models, and [`Scene::frame`] runs the fixed-timestep
//! loop and hands the renderer one instance per live body.

use glam::{Mat4, Vec3};

use crate::assets::{AssetStatus, AssetTracker, Model, ModelKey};
use crate::consts::*;
use crate::input::KeySource;
use crate::physics::PhysicsBackend;
use crate::renderer::vertex::colors;
use crate::renderer::{BodyInstance, CameraRig, DrawableDesc, RenderSink};
use crate::settings::SessionSettings;
use crate::sim::{
    ArenaBounds, ArenaSpec, BodyHandle, ColliderShape, ContainedBody, Containment,
    DynamicBodyDesc, SimulationDriver, TickReport, VehicleController,
};

/// What a spawned body becomes once it exists
#[derive(Debug, Clone, Copy)]
enum SpawnRole {
    /// Controller index in the driver
    Vehicle(usize),
    Ball(Containment),
}

/// A dynamic body waiting on its model
#[derive(Debug, Clone)]
struct PendingSpawn {
    role: SpawnRole,
    desc: DynamicBodyDesc,
    /// Vehicles collide with their (scaled) mesh; the ball keeps its sphere
    mesh_collider: bool,
    drawable: DrawableDesc,
}

pub struct Scene<P: PhysicsBackend> {
    world: P,
    driver: SimulationDriver,
    arena: ArenaSpec,
    camera: CameraRig,
    assets: AssetTracker,
    pending: Vec<PendingSpawn>,
    statics: Vec<BodyHandle>,
    drawables: Vec<(BodyHandle, DrawableDesc)>,
    ball: Option<BodyHandle>,
    accumulator: f32,
    ticks: u64,
}

impl<P: PhysicsBackend> Scene<P> {
    /// Register the arena and queue the dynamic bodies.
    ///
    /// Static bodies go to the engine and the renderer from the same list, so
    /// what is drawn and what collides never disagree.
    pub fn new(settings: &SessionSettings, mut world: P, renderer: &mut impl RenderSink) -> Self {
        for warning in settings.validate() {
            log::warn!("{}", warning);
        }

        let arena = settings.arena.clone();
        let bounds = arena.bounds();

        let mut statics = Vec::new();
        for body in arena.static_bodies() {
            statics.push(world.add_static(&body));
            renderer.register_static(&body);
        }
        log::info!("Arena registered: {} static bodies", statics.len());

        let camera = CameraRig::looking_at(
            Vec3::from_array(settings.camera.position),
            Vec3::from_array(settings.camera.target),
            settings.camera.fov_degrees,
            settings.camera.orbit_damping,
        );
        renderer.set_camera(&camera);

        let mut scene = Self {
            world,
            driver: SimulationDriver::new(),
            arena,
            camera,
            assets: AssetTracker::new(),
            pending: Vec::new(),
            statics,
            drawables: Vec::new(),
            ball: None,
            accumulator: 0.0,
            ticks: 0,
        };

        for player in &settings.players {
            let params = player.vehicle_params();
            let controller = VehicleController::new(
                player.label.clone(),
                player.controls.clone(),
                params,
                player.containment.resolve(bounds),
            );
            let index = scene.driver.add_controller(controller);
            let desc = DynamicBodyDesc::new(
                player.label.clone(),
                ColliderShape::Cuboid {
                    half_extents: Vec3::from_array(player.model_size) * player.scale * 0.5,
                },
            )
            .with_mass(player.mass)
            .with_material(player.restitution, player.friction)
            .at(params.spawn, params.initial_yaw)
            .locked_rotations();
            scene.queue(PendingSpawn {
                role: SpawnRole::Vehicle(index),
                desc,
                mesh_collider: true,
                drawable: DrawableDesc {
                    label: player.label.clone(),
                    model: ModelKey::new(player.model.clone()),
                    scale: player.scale,
                    tint: player.tint,
                },
            });
        }

        let ball = &settings.ball;
        scene.queue(PendingSpawn {
            role: SpawnRole::Ball(ball.containment.resolve(bounds)),
            desc: DynamicBodyDesc::new("ball", ColliderShape::Ball { radius: ball.radius })
                .with_mass(ball.mass)
                .with_material(ball.restitution, ball.friction)
                .at(Vec3::from_array(ball.spawn), 0.0),
            mesh_collider: false,
            drawable: DrawableDesc {
                label: "ball".to_string(),
                model: ModelKey::new(ball.model.clone()),
                scale: 1.0,
                tint: colors::BALL,
            },
        });

        scene
    }

    fn queue(&mut self, spawn: PendingSpawn) {
        self.assets.request(spawn.drawable.model.clone());
        self.pending.push(spawn);
    }

    /// A model finished loading: create every body waiting on it.
    ///
    /// Returns how many bodies were spawned (0 for unknown or repeated keys).
    pub fn asset_loaded(
        &mut self,
        key: &ModelKey,
        model: &Model,
        renderer: &mut impl RenderSink,
    ) -> usize {
        if !self.assets.mark_ready(key) {
            log::warn!("Ignoring model {:?}: not requested or already loaded", key.0);
            return 0;
        }

        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|spawn| spawn.drawable.model == *key);
        self.pending = waiting;

        for spawn in &ready {
            let mut desc = spawn.desc.clone();
            if spawn.mesh_collider {
                desc.shape = model.scaled(spawn.drawable.scale).collider();
            }
            let handle = self.world.add_dynamic(&desc);
            match spawn.role {
                SpawnRole::Vehicle(index) => {
                    if let Some(controller) = self.driver.controller_mut(index) {
                        controller.attach(handle);
                    }
                }
                SpawnRole::Ball(containment) => {
                    self.driver.add_body(ContainedBody { handle, containment });
                    self.ball = Some(handle);
                }
            }
            renderer.register_dynamic(handle, &spawn.drawable);
            self.drawables.push((handle, spawn.drawable.clone()));
            log::info!(
                "Spawned {} ({} triangles) as {:?}",
                spawn.drawable.label,
                model.triangle_count(),
                handle
            );
        }
        ready.len()
    }

    /// One fixed simulation tick
    pub fn tick(&mut self, keys: &(impl KeySource + ?Sized)) -> TickReport {
        self.ticks += 1;
        self.driver.tick(keys, &mut self.world, SIM_DT)
    }

    /// Advance by a frame's worth of wall-clock time, then draw.
    ///
    /// Returns the number of ticks run.
    pub fn frame(
        &mut self,
        keys: &(impl KeySource + ?Sized),
        frame_dt: f32,
        renderer: &mut impl RenderSink,
    ) -> u32 {
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(keys);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.camera.update();
        renderer.set_camera(&self.camera);
        renderer.draw(&self.instances());
        substeps
    }

    /// Instance data for every body that exists, in spawn order
    pub fn instances(&self) -> Vec<(BodyHandle, BodyInstance)> {
        self.drawables
            .iter()
            .filter_map(|(handle, drawable)| {
                let transform = self.world.transform(*handle)?;
                let model = transform.matrix() * Mat4::from_scale(Vec3::splat(drawable.scale));
                Some((*handle, BodyInstance::new(model, drawable.tint)))
            })
            .collect()
    }

    pub fn model_status(&self, key: &ModelKey) -> Option<AssetStatus> {
        self.assets.status(key)
    }

    /// Models still being waited on
    pub fn pending_models(&self) -> Vec<ModelKey> {
        self.assets.pending().cloned().collect()
    }

    pub fn is_ready(&self) -> bool {
        self.assets.all_ready()
    }

    pub fn world(&self) -> &P {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut P {
        &mut self.world
    }

    pub fn driver(&self) -> &SimulationDriver {
        &self.driver
    }

    pub fn arena(&self) -> &ArenaSpec {
        &self.arena
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.arena.bounds()
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn static_handles(&self) -> &[BodyHandle] {
        &self.statics
    }

    pub fn ball(&self) -> Option<BodyHandle> {
        self.ball
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
