use glam::{Mat4, Vec3};
use ridgeline_core::math::{chunk_to_world, world_to_chunk};
use ridgeline_core::types::ChunkCoord;

pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 10_000.0;
pub const DEFAULT_FOV_DEG: f32 = 70.0;
pub const PITCH_LIMIT_DEG: f32 = 89.9;

/// Movement axis relative to the camera basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Front,
    Back,
    Left,
    Right,
    Up,
    Down,
}

/// First-person fly camera. Angles are in degrees; yaw -90 looks down -Z.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    fov_deg: f32,
    aspect: f32,
    direction: Vec3,
    right: Vec3,
    up: Vec3,
}

impl FlyCamera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            fov_deg: DEFAULT_FOV_DEG,
            aspect,
            direction: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Accumulate rotation; takes effect on the next `update`.
    pub fn rotate(&mut self, yaw_diff: f32, pitch_diff: f32) {
        self.yaw += yaw_diff;
        self.pitch = (self.pitch + pitch_diff).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Recompute the orthonormal basis from yaw and pitch.
    pub fn update(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.direction = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.direction.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.direction).normalize();
    }

    pub fn move_dir(&mut self, direction: Direction, distance: f32) {
        let axis = match direction {
            Direction::Front => self.direction,
            Direction::Back => -self.direction,
            Direction::Left => -self.right,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => -self.up,
        };
        self.position += axis * distance;
    }

    /// Chunk the camera is standing over.
    pub fn chunk_position(&self) -> ChunkCoord {
        world_to_chunk(self.position)
    }

    /// Camera position expressed relative to the first vertex of `center`,
    /// the same frame the pool's vertex data uses.
    pub fn relative_position(&self, center: ChunkCoord) -> Vec3 {
        let origin = chunk_to_world(center);
        self.position - Vec3::new(origin.x, 0.0, origin.y)
    }

    /// View matrix in absolute world space.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    /// View matrix in the frame of `center`; keeps the matrix well conditioned
    /// far from the world origin.
    pub fn view_relative_to(&self, center: ChunkCoord) -> Mat4 {
        let eye = self.relative_position(center);
        Mat4::look_at_rh(eye, eye + self.direction, self.up)
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, Z_NEAR, Z_FAR)
    }
}
