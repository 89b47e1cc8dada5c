use serde::{Deserialize, Serialize};

use crate::{
    animation::step::{CameraParam, CameraTarget},
    foundation::math::Vec3,
    scene::room::RoomDimensions,
};

/// Vertical field of view of the room camera, in degrees.
pub const CAMERA_FOV_Y_DEG: f64 = 75.0;
/// Distance the camera backs away from the front wall per unit of zoom.
const ZOOM_OFFSET: f64 = 1.0;
/// Vertical travel per unit of `tan(tilt)`.
const TILT_HEIGHT_FACTOR: f64 = 5.0;

/// User-facing camera controls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub pan: f64,
    pub zoom: f64,
    pub tilt_deg: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            pan: CameraParam::Pan.baseline(),
            zoom: CameraParam::Zoom.baseline(),
            tilt_deg: CameraParam::Tilt.baseline(),
        }
    }
}

impl CameraParams {
    pub fn get(&self, param: CameraParam) -> f64 {
        match param {
            CameraParam::Pan => self.pan,
            CameraParam::Zoom => self.zoom,
            CameraParam::Tilt => self.tilt_deg,
        }
    }

    pub fn set(&mut self, param: CameraParam, value: f64) {
        match param {
            CameraParam::Pan => self.pan = value,
            CameraParam::Zoom => self.zoom = value,
            CameraParam::Tilt => self.tilt_deg = value,
        }
    }

    /// Camera placement inside a room centred on the origin.
    ///
    /// Pan slides the eye and its target sideways together; zoom walks forward from the front
    /// wall; tilt lifts the eye and raises the target on the back wall.
    pub fn pose(&self, room: RoomDimensions) -> CameraPose {
        let tan_tilt = self.tilt_deg.to_radians().tan();
        let half_length = room.length / 2.0;
        CameraPose {
            position: Vec3::new(
                self.pan,
                tan_tilt * ZOOM_OFFSET * TILT_HEIGHT_FACTOR,
                half_length - self.zoom * ZOOM_OFFSET,
            ),
            look_at: Vec3::new(self.pan, tan_tilt * half_length * 0.5, -half_length),
            fov_y_deg: CAMERA_FOV_Y_DEG,
        }
    }
}

/// Eye position, target and lens of a perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_y_deg: f64,
}

impl CameraPose {
    /// Orthonormal `(forward, right, up)` basis of the view.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.look_at - self.position).normalized();
        let right = forward.cross(Vec3::UP).normalized();
        let up = right.cross(forward);
        (forward, right, up)
    }
}

/// Camera parameters bound to a room, usable as an animation target.
///
/// Render requests are counted rather than executed; the owner decides when to draw.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub params: CameraParams,
    pub room: RoomDimensions,
    render_requests: u64,
}

impl CameraRig {
    pub fn new(room: RoomDimensions, params: CameraParams) -> Self {
        Self {
            params,
            room,
            render_requests: 0,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.params.pose(self.room)
    }

    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    /// Return and clear the pending render request count.
    pub fn take_render_requests(&mut self) -> u64 {
        std::mem::take(&mut self.render_requests)
    }
}

impl CameraTarget for CameraRig {
    fn set_param(&mut self, param: CameraParam, value: f64) {
        self.params.set(param, value);
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
