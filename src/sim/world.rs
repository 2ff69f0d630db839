//! Rigid body world
//!
//! Thin wrapper over the rapier2d pipeline exposing the handful of operations
//! gameplay needs: create bodies and shapes, read/write transforms and
//! velocities, step, and destroy. Everything here is in simulation units.
//! Engine types stay behind this module; callers only see `glam` vectors and
//! `BodyHandle`s.

use glam::Vec2;
use rapier2d::prelude::*;

/// Non-owning reference to a body in the world
///
/// `BodyHandle::NULL` marks a body that was never created or already destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodyHandle(Option<RigidBodyHandle>);

impl BodyHandle {
    pub const NULL: BodyHandle = BodyHandle(None);

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

/// How the engine moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves (walls, bricks)
    Static,
    /// Moved by the velocity game logic sets (paddle)
    Kinematic,
    /// Integrated and pushed around by contacts (ball)
    Dynamic,
}

/// Body creation parameters
#[derive(Debug, Clone, Copy)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub rotation: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Continuous collision detection, for fast small bodies
    pub ccd: bool,
}

impl BodyDef {
    pub fn new(kind: BodyKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            rotation: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            ccd: false,
        }
    }
}

/// Collision geometry attached to a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { half_extents: Vec2 },
    Circle { radius: f32 },
}

/// Surface response of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub friction: f32,
    pub restitution: f32,
}

impl Material {
    /// Frictionless, perfectly elastic
    pub const BOUNCY: Material = Material {
        friction: 0.0,
        restitution: 1.0,
    };
}

/// Position and rotation of a body, always read and written together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
}

impl Transform {
    /// Position with identity rotation
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }
}

/// Owns every simulated body and the engine state needed to step them
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(gravity: Vec2) -> Self {
        log::debug!("Creating physics world (gravity {gravity})");
        Self {
            gravity: vector![gravity.x, gravity.y],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Whether the handle refers to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        handle
            .0
            .is_some_and(|h| self.rigid_body_set.contains(h))
    }

    /// Insert a body and return its handle
    pub fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let builder = match def.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let body = builder
            .translation(vector![def.position.x, def.position.y])
            .rotation(def.rotation)
            .linear_damping(def.linear_damping)
            .angular_damping(def.angular_damping)
            .ccd_enabled(def.ccd)
            .build();

        BodyHandle(Some(self.rigid_body_set.insert(body)))
    }

    /// Attach a collision shape to a body. Returns false for a dead handle.
    pub fn attach_shape(&mut self, handle: BodyHandle, shape: Shape, material: Material) -> bool {
        let Some(parent) = handle.0.filter(|h| self.rigid_body_set.contains(*h)) else {
            log::warn!("attach_shape on missing body {handle:?}");
            return false;
        };
        let builder = match shape {
            Shape::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
        };
        let collider = builder
            .friction(material.friction)
            .restitution(material.restitution)
            // Bouncier surface wins, so a 1.2 paddle actually speeds the ball up
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .build();
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set);
        true
    }

    /// Current transform, or `None` for a dead handle
    pub fn transform(&self, handle: BodyHandle) -> Option<Transform> {
        let body = self.rigid_body_set.get(handle.0?)?;
        let t = body.translation();
        Some(Transform {
            position: Vec2::new(t.x, t.y),
            rotation: body.rotation().angle(),
        })
    }

    /// Teleport a body (position and rotation together)
    pub fn set_transform(&mut self, handle: BodyHandle, transform: Transform) {
        if let Some(body) = handle.0.and_then(|h| self.rigid_body_set.get_mut(h)) {
            body.set_position(
                Isometry::new(
                    vector![transform.position.x, transform.position.y],
                    transform.rotation,
                ),
                true,
            );
        }
    }

    /// Current linear velocity, or `None` for a dead handle
    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        let body = self.rigid_body_set.get(handle.0?)?;
        let v = body.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = handle.0.and_then(|h| self.rigid_body_set.get_mut(h)) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    /// Set transform and velocity in one call, with spin cleared.
    /// No step can run between the two writes.
    pub fn place_body(&mut self, handle: BodyHandle, transform: Transform, velocity: Vec2) {
        if let Some(body) = handle.0.and_then(|h| self.rigid_body_set.get_mut(h)) {
            body.set_position(
                Isometry::new(
                    vector![transform.position.x, transform.position.y],
                    transform.rotation,
                ),
                true,
            );
            body.set_linvel(vector![velocity.x, velocity.y], true);
            body.set_angvel(0.0, true);
        }
    }

    /// Advance the world by `dt` seconds using `iterations` solver iterations
    pub fn step(&mut self, dt: f32, iterations: usize) {
        self.integration_parameters.dt = dt;
        self.integration_parameters.max_velocity_iterations = iterations.max(1);

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Remove a body and its shapes, nulling the handle.
    ///
    /// A null or stale handle is skipped and reported as `false`, so calling
    /// this twice on the same handle is harmless.
    pub fn destroy_body(&mut self, handle: &mut BodyHandle) -> bool {
        let Some(h) = handle.0.take() else {
            return false;
        };
        self.rigid_body_set
            .remove(
                h,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    /// Remove any bodies still alive. Called last, after gameplay has released its handles.
    pub fn destroy(&mut self) {
        let leftover: Vec<RigidBodyHandle> = self.rigid_body_set.iter().map(|(h, _)| h).collect();
        if !leftover.is_empty() {
            log::warn!("{} bodies still alive at world teardown", leftover.len());
        }
        for h in leftover {
            let mut handle = BodyHandle(Some(h));
            self.destroy_body(&mut handle);
        }
        log::debug!("Physics world destroyed");
    }
}
