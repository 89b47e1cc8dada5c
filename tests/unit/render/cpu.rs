use std::sync::Arc;

use super::*;
use crate::{
    compose::canvas::RasterTexture,
    scene::camera::CameraParams,
    scene::room::{FaceTexture, RoomPalette},
};

fn plain_renderer(size: u32) -> SoftwareRoomRenderer {
    let palette = RoomPalette::default();
    let mut r = SoftwareRoomRenderer::new(RenderSettings::square(size));
    for face in RoomFace::ALL {
        let color = match face {
            RoomFace::Ceiling => palette.ceiling,
            RoomFace::Floor => palette.floor,
            _ => palette.wall,
        };
        r.apply_face(face, &FaceMaterial::Color(color));
    }
    r
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn exit_face_from_room_centre() {
    let half = RoomDimensions::default().half_extents();
    let o = Vec3::new(0.0, 0.0, 3.0);
    assert_eq!(
        exit_face(o, Vec3::new(0.0, 0.0, -1.0), half),
        Some((7.0, RoomFace::Back))
    );
    assert_eq!(
        exit_face(o, Vec3::new(0.0, -1.0, 0.0), half).map(|h| h.1),
        Some(RoomFace::Floor)
    );
    assert_eq!(
        exit_face(o, Vec3::new(1.0, 0.0, 0.0), half).map(|h| h.1),
        Some(RoomFace::Right)
    );
    // Outside the room looking away from it.
    assert_eq!(
        exit_face(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0), half),
        None
    );
}

#[test]
fn wall_uv_runs_left_to_right_top_to_bottom() {
    let half = RoomDimensions::default().half_extents();
    let (u, v) = face_uv(RoomFace::Back, Vec3::new(-3.0, 3.5, -4.0), half);
    assert_eq!((u, v), (0.0, 0.0));
    let (u, v) = face_uv(RoomFace::Back, Vec3::new(3.0, -3.5, -4.0), half);
    assert_eq!((u, v), (1.0, 1.0));
}

#[test]
fn default_view_sees_back_wall_ceiling_and_floor() {
    let r = plain_renderer(64);
    let pose = CameraParams::default().pose(RoomDimensions::default());
    let frame = r.render_frame(&pose).unwrap();
    assert_eq!((frame.width, frame.height), (64, 64));
    assert!(frame.data.chunks_exact(4).all(|p| p[3] == 255));

    // Back wall is fully lit: ambient + point saturates.
    assert_eq!(px(&frame, 32, 32), [0xcc, 0xcc, 0xcc, 255]);

    let ceiling = px(&frame, 32, 0);
    assert_eq!(ceiling[0], ceiling[1]);
    assert!(ceiling[0] > 200 && ceiling[0] < 255);

    let floor = px(&frame, 32, 63);
    assert!(floor[2] > floor[0]);
}

#[test]
fn unapplied_faces_show_background() {
    let r = SoftwareRoomRenderer::new(RenderSettings::square(8));
    let frame = r
        .render_frame(&CameraParams::default().pose(RoomDimensions::default()))
        .unwrap();
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|p| p == [0x40, 0x40, 0x40, 255])
    );
}

#[test]
fn textured_back_wall_is_sampled() {
    let mut r = plain_renderer(32);
    let tex = RasterTexture::solid(4, 4, Rgba8::opaque(0, 200, 0));
    r.apply_face(
        RoomFace::Back,
        &FaceMaterial::Texture(FaceTexture {
            texture: Arc::new(tex),
            repeat_u: 1.0,
            repeat_v: 1.0,
        }),
    );
    let frame = r
        .render_frame(&CameraParams::default().pose(RoomDimensions::default()))
        .unwrap();
    assert_eq!(px(&frame, 16, 16), [0, 200, 0, 255]);
}

#[test]
fn rendering_is_deterministic() {
    let r = plain_renderer(24);
    let pose = CameraParams {
        pan: -1.0,
        zoom: 2.0,
        tilt_deg: 10.0,
    }
    .pose(RoomDimensions::default());
    assert_eq!(r.render_frame(&pose).unwrap(), r.render_frame(&pose).unwrap());
}

#[test]
fn zero_size_is_rejected() {
    let r = SoftwareRoomRenderer::new(RenderSettings {
        width: 0,
        height: 4,
    });
    assert!(
        r.render_frame(&CameraParams::default().pose(RoomDimensions::default()))
            .is_err()
    );
}
