//! Cameras, projections and picking rays.
//!
//! A [`Camera`] is a position looking at a target through a perspective or
//! orthographic [`Projection`]. Sketches call [`Camera::resize`] from their
//! resize hook; it only depends on the viewport, so repeated calls with the
//! same size leave the camera unchanged.

use std::f32::consts::{PI, TAU};

use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector2, Vector3, Vector4,
};

/// Maps OpenGL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective {
        fovy: Deg<f32>,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Bounds are `±zoom * aspect` horizontally and `±zoom` vertically.
    Orthographic {
        zoom: f32,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub projection: Projection,
}

impl Camera {
    pub fn perspective(fovy: f32, near: f32, far: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 1.0),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            projection: Projection::Perspective {
                fovy: Deg(fovy),
                aspect: 1.0,
                near,
                far,
            },
        }
    }

    /// An orthographic camera at `(zoom, zoom, zoom)` looking at the origin,
    /// with near/far at -100/100 so nothing in a unit scene is clipped.
    pub fn orthographic(zoom: f32) -> Self {
        let mut camera = Self {
            position: Point3::new(zoom, zoom, zoom),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            projection: Projection::Orthographic {
                zoom,
                left: -zoom,
                right: zoom,
                top: zoom,
                bottom: -zoom,
                near: -100.0,
                far: 100.0,
            },
        };
        camera.resize(1, 1);
        camera
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Re-derive aspect (and orthographic bounds) from the viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        match &mut self.projection {
            Projection::Perspective { aspect: a, .. } => *a = aspect,
            Projection::Orthographic {
                zoom,
                left,
                right,
                top,
                bottom,
                ..
            } => {
                *left = -*zoom * aspect;
                *right = *zoom * aspect;
                *top = *zoom;
                *bottom = -*zoom;
            }
        }
    }

    pub fn aspect(&self) -> f32 {
        match self.projection {
            Projection::Perspective { aspect, .. } => aspect,
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                ..
            } => (right - left) / (top - bottom),
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        let dir = self.target - self.position;
        if dir.magnitude2() > 0.0 {
            dir.normalize()
        } else {
            -Vector3::unit_z()
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Projection in OpenGL clip conventions.
    fn gl_projection(&self) -> Matrix4<f32> {
        match self.projection {
            Projection::Perspective {
                fovy,
                aspect,
                near,
                far,
            } => cgmath::perspective(fovy, aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
                ..
            } => cgmath::ortho(left, right, bottom, top, near, far),
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.gl_projection()
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space point for NDC `(x, y)` at OpenGL depth `z` in `[-1, 1]`.
    pub fn unproject(&self, x: f32, y: f32, z: f32) -> Option<Point3<f32>> {
        let inverse = (self.gl_projection() * self.view_matrix()).invert()?;
        let p = inverse * Vector4::new(x, y, z, 1.0);
        if p.w.abs() <= f32::EPSILON {
            return None;
        }
        Some(Point3::new(p.x / p.w, p.y / p.w, p.z / p.w))
    }

    /// Ray through normalized device coordinates. Perspective rays start at
    /// the eye; orthographic rays start on the near plane and run parallel to
    /// the view direction.
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Option<Ray> {
        match self.projection {
            Projection::Perspective { .. } => {
                let through = self.unproject(ndc.x, ndc.y, 0.5)?;
                let direction = through - self.position;
                if direction.magnitude2() <= 0.0 {
                    return None;
                }
                Some(Ray {
                    origin: self.position,
                    direction: direction.normalize(),
                })
            }
            Projection::Orthographic { .. } => Some(Ray {
                origin: self.unproject(ndc.x, ndc.y, -1.0)?,
                direction: self.forward(),
            }),
        }
    }
}

/// Pixel coordinates (origin top-left) to NDC (origin center, +y up).
pub fn pixel_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Vector2<f32> {
    Vector2::new(
        (x / width.max(1) as f64 * 2.0 - 1.0) as f32,
        (1.0 - y / height.max(1) as f64 * 2.0) as f32,
    )
}

/// Points `p` with `normal · p + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub constant: f32,
}

impl Plane {
    pub fn new(normal: Vector3<f32>, constant: f32) -> Self {
        Self {
            normal: normal.normalize(),
            constant,
        }
    }

    /// The y = 0 ground plane.
    pub fn ground() -> Self {
        Self::new(Vector3::unit_y(), 0.0)
    }

    pub fn distance_to_point(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(point.to_vec()) + self.constant
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// First intersection in front of the origin. A ray lying in the plane
    /// hits at its origin; a parallel ray off the plane misses.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Point3<f32>> {
        let denominator = plane.normal.dot(self.direction);
        if denominator.abs() <= f32::EPSILON {
            return (plane.distance_to_point(self.origin).abs() <= f32::EPSILON)
                .then_some(self.origin);
        }
        let t = -(self.origin.to_vec().dot(plane.normal) + plane.constant) / denominator;
        (t >= 0.0).then(|| self.at(t))
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.view_proj().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Drag-to-orbit and wheel-to-dolly around a target.
///
/// Input accumulates between frames and is applied by [`OrbitControls::update`].
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    dragging: Option<Vector2<f32>>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            dragging: None,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, pixel: Vector2<f32>) {
        if self.enabled {
            self.dragging = Some(pixel);
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = None;
    }

    /// Drag by pixels; a full viewport height turns the camera once around.
    pub fn pointer_move(&mut self, pixel: Vector2<f32>, viewport_height: u32) {
        let Some(last) = self.dragging else {
            return;
        };
        let delta = pixel - last;
        let height = viewport_height.max(1) as f32;
        self.rotate_left(TAU * delta.x / height * self.rotate_speed);
        self.rotate_up(TAU * delta.y / height * self.rotate_speed);
        self.dragging = Some(pixel);
    }

    pub fn wheel(&mut self, delta: f32) {
        if !self.enabled || delta == 0.0 {
            return;
        }
        let factor = 0.95f32.powf(self.zoom_speed);
        if delta > 0.0 {
            self.scale /= factor;
        } else {
            self.scale *= factor;
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// Apply accumulated input to the camera. Without input the camera is unchanged.
    pub fn update(&mut self, camera: &mut Camera) {
        if self.theta_delta == 0.0 && self.phi_delta == 0.0 && self.scale == 1.0 {
            return;
        }
        let offset = camera.position - camera.target;
        let radius = offset.magnitude();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };
        theta += self.theta_delta;
        phi = (phi + self.phi_delta).clamp(1e-6, PI - 1e-6);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = camera.target + offset;

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
    }
}
