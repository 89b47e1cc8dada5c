use rayon::prelude::*;

use crate::{
    foundation::core::Rgba8,
    foundation::error::TilewallResult,
    foundation::math::{Vec3, over_premul},
    render::backend::{FrameRGBA, RenderSettings, RoomRenderer},
    scene::camera::CameraPose,
    scene::room::{FaceMaterial, Lighting, RoomDimensions, RoomFace, SceneSink},
};

/// CPU ray-caster for the textured room box.
///
/// Holds whatever materials were last applied through [`SceneSink`]. Faces without a material
/// show the background color.
#[derive(Clone, Debug)]
pub struct SoftwareRoomRenderer {
    settings: RenderSettings,
    room: RoomDimensions,
    faces: [Option<FaceMaterial>; 6],
    lighting: Lighting,
    background: Rgba8,
}

impl SoftwareRoomRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            room: RoomDimensions::default(),
            faces: Default::default(),
            lighting: Lighting::default(),
            background: Rgba8::from_hex_u32(0x404040),
        }
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    pub fn face(&self, face: RoomFace) -> Option<&FaceMaterial> {
        self.faces[face.index()].as_ref()
    }

    fn shade_ray(&self, origin: Vec3, dir: Vec3) -> [u8; 4] {
        let bg = self.background.to_premul();
        let half = self.room.half_extents();
        let Some((t, face)) = exit_face(origin, dir, half) else {
            return bg;
        };
        let Some(material) = self.faces[face.index()].as_ref() else {
            return bg;
        };

        let p = origin + dir * t;
        let texel = match material {
            FaceMaterial::Color(c) => c.to_premul(),
            FaceMaterial::Texture(tex) => {
                let (u, v) = face_uv(face, p, half);
                tex.texture
                    .sample_wrapped(u * tex.repeat_u, v * tex.repeat_v)
            }
        };

        let to_light = (self.lighting.point_position - p).normalized();
        let diffuse = face.inward_normal().dot(to_light).max(0.0);
        let k = (self.lighting.ambient + self.lighting.point * diffuse).clamp(0.0, 1.0);
        let lit = [
            (f64::from(texel[0]) * k).round() as u8,
            (f64::from(texel[1]) * k).round() as u8,
            (f64::from(texel[2]) * k).round() as u8,
            texel[3],
        ];
        over_premul(bg, lit)
    }
}

impl Default for SoftwareRoomRenderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl SceneSink for SoftwareRoomRenderer {
    fn release_face(&mut self, face: RoomFace) {
        self.faces[face.index()] = None;
    }

    fn apply_face(&mut self, face: RoomFace, material: &FaceMaterial) {
        self.faces[face.index()] = Some(material.clone());
    }

    fn set_room(&mut self, room: RoomDimensions) {
        self.room = room;
    }

    fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = lighting;
    }

    fn set_background(&mut self, color: Rgba8) {
        self.background = color;
    }
}

impl RoomRenderer for SoftwareRoomRenderer {
    fn settings(&self) -> RenderSettings {
        self.settings
    }

    fn render_frame(&self, pose: &CameraPose) -> TilewallResult<FrameRGBA> {
        self.settings.validate()?;
        let RenderSettings { width, height } = self.settings;

        let (forward, right, up) = pose.basis();
        let half_h = (pose.fov_y_deg.to_radians() / 2.0).tan();
        let half_w = half_h * f64::from(width) / f64::from(height);
        let origin = pose.position;

        let mut data = vec![0u8; width as usize * height as usize * 4];
        data.par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let sy = 1.0 - 2.0 * (y as f64 + 0.5) / f64::from(height);
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let sx = 2.0 * (x as f64 + 0.5) / f64::from(width) - 1.0;
                    let dir = (forward + right * (sx * half_w) + up * (sy * half_h)).normalized();
                    px.copy_from_slice(&self.shade_ray(origin, dir));
                }
            });

        Ok(FrameRGBA {
            width,
            height,
            data,
            premultiplied: true,
        })
    }
}

/// Face through which a ray leaves the box `[-half, half]`, with its distance.
///
/// Works for eyes inside the room and for eyes outside looking through it (only inner sides are
/// visible).
fn exit_face(origin: Vec3, dir: Vec3, half: Vec3) -> Option<(f64, RoomFace)> {
    let axes = [
        (origin.x, dir.x, half.x, RoomFace::Right, RoomFace::Left),
        (origin.y, dir.y, half.y, RoomFace::Ceiling, RoomFace::Floor),
        (origin.z, dir.z, half.z, RoomFace::Front, RoomFace::Back),
    ];

    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;
    let mut far_face = None;
    for (o, d, h, positive, negative) in axes {
        if d.abs() < 1e-12 {
            if o.abs() > h {
                return None;
            }
            continue;
        }
        let t_pos = (h - o) / d;
        let t_neg = (-h - o) / d;
        let (near, far, face) = if d > 0.0 {
            (t_neg, t_pos, positive)
        } else {
            (t_pos, t_neg, negative)
        };
        t_near = t_near.max(near);
        if far < t_far {
            t_far = far;
            far_face = Some(face);
        }
    }

    if t_far <= 0.0 || t_near > t_far {
        return None;
    }
    far_face.map(|face| (t_far, face))
}

/// Texture coordinates of `p` on `face`, as seen from inside the room (`v = 0` at the top).
fn face_uv(face: RoomFace, p: Vec3, half: Vec3) -> (f64, f64) {
    let w = 2.0 * half.x;
    let h = 2.0 * half.y;
    let l = 2.0 * half.z;
    let wall_v = (half.y - p.y) / h;
    match face {
        RoomFace::Back => ((p.x + half.x) / w, wall_v),
        RoomFace::Front => ((half.x - p.x) / w, wall_v),
        RoomFace::Left => ((half.z - p.z) / l, wall_v),
        RoomFace::Right => ((p.z + half.z) / l, wall_v),
        RoomFace::Floor => ((p.x + half.x) / w, (p.z + half.z) / l),
        RoomFace::Ceiling => ((p.x + half.x) / w, (half.z - p.z) / l),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
