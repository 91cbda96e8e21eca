use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Planar vector in world units (the pendulum scenes use pixels).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar (z component of the) cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Rotate counter-clockwise by `angle` radians.
    #[must_use]
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A rigid body in the plane.
///
/// `mass` and `inertia` may be `f64::INFINITY`, which makes the body immovable
/// along that degree of freedom. Velocities are not integrated directly: after
/// each substep they are derived from the change in pose, so they always agree
/// with what the constraint pass left behind.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    pub mass: f64,
    pub inertia: f64,
    pub pos: Vec2,
    pub angle: f64,
    pub vel: Vec2,
    pub angular_vel: f64,
    pub prev_pos: Vec2,
    pub prev_angle: f64,
    /// Force accumulated for the next step, applied at the centre of mass.
    pub force: Vec2,
}

impl RigidBody {
    #[must_use]
    pub fn new(mass: f64, inertia: f64, pos: Vec2) -> Self {
        Self {
            mass,
            inertia,
            pos,
            angle: 0.0,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            prev_pos: pos,
            prev_angle: 0.0,
            force: Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn inv_mass(&self) -> f64 {
        inverse(self.mass)
    }

    #[must_use]
    pub fn inv_inertia(&self) -> f64 {
        inverse(self.inertia)
    }

    /// Offset of a body-local point from the centre of mass, in world axes.
    #[must_use]
    pub fn world_offset(&self, local: Vec2) -> Vec2 {
        local.rotate(self.angle)
    }

    #[must_use]
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.pos + self.world_offset(local)
    }

    #[must_use]
    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        (world - self.pos).rotate(-self.angle)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite()
            && self.vel.is_finite()
            && self.angle.is_finite()
            && self.angular_vel.is_finite()
    }
}

fn inverse(value: f64) -> f64 {
    if value.is_infinite() {
        0.0
    } else {
        1.0 / value
    }
}

/// Moment of inertia of a solid `width` x `height` rectangle about its centre.
#[must_use]
pub fn moment_for_box(mass: f64, width: f64, height: f64) -> f64 {
    mass * (width * width + height * height) / 12.0
}

/// Keeps a body-local anchor on a world-fixed segment (a groove).
///
/// The body may slide freely between `groove_a` and `groove_b`; the segment
/// ends act as hard stops.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SliderJoint {
    pub body: usize,
    pub groove_a: Vec2,
    pub groove_b: Vec2,
    pub anchor: Vec2,
}

/// Pins a point of `body_a` to a point of `body_b`. Anchors are body-local.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PivotJoint {
    pub body_a: usize,
    pub body_b: usize,
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
}

/// Global stepping parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysParams {
    pub gravity: Vec2,
    /// Substeps per call to [`crate::PhysicsSim::step`].
    pub substeps: usize,
    /// Constraint passes per substep.
    pub iterations: usize,
}

impl Default for PhysParams {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -900.0),
            substeps: 8,
            iterations: 4,
        }
    }
}
