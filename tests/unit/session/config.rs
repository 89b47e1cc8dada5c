use super::*;
use crate::{animation::step::CameraParam, foundation::core::Rgba8};

#[test]
fn empty_object_gives_defaults() {
    let cfg = RoomConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, RoomConfig::default());
    assert_eq!(cfg.grout_gap_px, 1);
    assert_eq!(cfg.room.length, 8.0);
    assert_eq!(cfg.animation_steps(), default_sequence());
}

#[test]
fn parses_full_config() {
    let cfg = RoomConfig::from_json_str(
        r##"{
            "room": { "width": 4, "height": 3 },
            "wall_tiles": [
                { "image": "a.png", "rows": 2 },
                { "image": "b.png", "flipped": true },
                {}
            ],
            "grout_gap_px": 6,
            "palette": { "wall": "#112233", "ceiling": "#fafafaff" },
            "floor": { "image": "floor.jpg", "tile_size": 0.5 },
            "brightness": 1.5,
            "camera": { "zoom": 2.0 },
            "animation": [ { "param": "tilt", "from": 0, "to": 20, "duration_ms": 500 } ]
        }"##,
    )
    .unwrap();

    assert_eq!(cfg.room.width, 4.0);
    assert_eq!(cfg.room.length, 8.0);
    assert_eq!(cfg.wall_tiles.len(), 3);
    assert_eq!(cfg.wall_tiles[1].rows, 1);
    assert!(cfg.wall_tiles[1].flipped);
    assert_eq!(cfg.wall_tiles[2].image, None);
    assert_eq!(cfg.palette.wall, Rgba8::opaque(0x11, 0x22, 0x33));
    assert_eq!(cfg.palette.floor, RoomPalette::default().floor);
    assert_eq!(cfg.camera.zoom, 2.0);
    assert_eq!(cfg.camera.pan, 0.0);
    assert_eq!(cfg.animation_steps()[0].param, CameraParam::Tilt);
}

#[test]
fn bad_json_is_a_serde_error() {
    let err = RoomConfig::from_json_str(r#"{ "grout_gap_px": -1 }"#).unwrap_err();
    assert!(matches!(err, TilewallError::Serde(_)));
    let err = RoomConfig::from_json_str(r##"{ "palette": { "wall": "#12" } }"##).unwrap_err();
    assert!(matches!(err, TilewallError::Serde(_)));
}

#[test]
fn relative_paths_resolve_against_base() {
    let mut cfg = RoomConfig::default();
    cfg.wall_tiles.push(TileRowConfig {
        image: Some(PathBuf::from("tiles/a.png")),
        ..TileRowConfig::default()
    });
    let abs = std::env::temp_dir().join("abs.png");
    cfg.floor.image = Some(abs.clone());

    let base = std::env::temp_dir().join("rooms");
    cfg.resolve_paths(&base);
    assert_eq!(cfg.wall_tiles[0].image, Some(base.join("tiles/a.png")));
    assert_eq!(cfg.floor.image, Some(abs));
}

#[test]
fn pretty_json_round_trips() {
    let mut cfg = RoomConfig::default();
    cfg.brightness = 0.75;
    let text = cfg.to_json_pretty().unwrap();
    assert_eq!(RoomConfig::from_json_str(&text).unwrap(), cfg);
}
