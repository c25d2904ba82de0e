use super::*;
use serde_json::json;

#[test]
fn visibility_window_is_half_open() {
    let e = Element::video("a", "m", 2.0, 3.0);
    assert!(!e.is_visible_at(1.999));
    assert!(e.is_visible_at(2.0));
    assert!(e.is_visible_at(4.999));
    assert!(!e.is_visible_at(5.0));
    assert_eq!(e.end_time(), 5.0);
}

#[test]
fn main_track_requires_video_kind() {
    assert!(Track::main("t").is_main_track());
    let mut text = Track::new("t2", TrackKind::Text);
    text.is_main = true;
    assert!(!text.is_main_track());
}

#[test]
fn deserializes_editor_snapshot() {
    let track: Track = serde_json::from_value(json!({
        "id": "track-1",
        "name": "Main",
        "type": "video",
        "isMain": true,
        "elements": [
            {
                "id": "clip-1",
                "type": "video",
                "mediaId": "m1",
                "startTime": 0.0,
                "duration": 5.0,
                "trimStart": 1.5,
                "transform": { "position": { "x": 10.0, "y": -4.0 }, "scale": 1.5, "rotate": 30.0 },
                "playbackRate": 2.0
            },
            {
                "id": "txt",
                "type": "text",
                "startTime": 1.0,
                "duration": 2.0,
                "content": "hello",
                "fontSize": 64.0,
                "backgroundColor": "#000000"
            },
            { "id": "a1", "type": "audio", "startTime": 0.0, "duration": 1.0 }
        ],
        "transitions": [
            { "id": "t1", "type": "wipe-left", "duration": 1.0, "fromElementId": "clip-1", "toElementId": "clip-2" }
        ]
    }))
    .unwrap();

    assert!(track.is_main_track());
    assert_eq!(track.elements.len(), 3);

    let clip = track.element("clip-1").unwrap();
    assert_eq!(clip.trim_start, 1.5);
    assert_eq!(clip.media_id(), Some("m1"));
    let t = clip.transform().unwrap();
    assert_eq!(t.position, Vec2::new(10.0, -4.0));
    assert_eq!(t.scale, 1.5);
    assert_eq!(t.rotate, 30.0);
    match &clip.content {
        ElementContent::Video {
            playback_rate,
            opacity,
            ..
        } => {
            assert_eq!(*playback_rate, 2.0);
            assert_eq!(*opacity, 1.0);
        }
        other => panic!("expected video, got {other:?}"),
    }

    let txt = track.element("txt").unwrap();
    let ElementContent::Text(text) = &txt.content else {
        panic!("expected text");
    };
    assert_eq!(text.content, "hello");
    assert_eq!(text.font_size, 64.0);
    assert_eq!(text.color, "#ffffff");
    assert_eq!(text.background_color, "#000000");
    assert_eq!(text.transform, Transform::default());

    assert!(!track.element("a1").unwrap().is_visual());
    assert_eq!(track.transitions[0].kind, TransitionKind::WipeLeft);
}

#[test]
fn background_is_tagged_by_type() {
    let b: Background = serde_json::from_value(json!({ "type": "blur", "blurIntensity": 12.0 })).unwrap();
    assert_eq!(
        b,
        Background::Blur {
            blur_intensity: Some(12.0)
        }
    );
    let b: Background = serde_json::from_value(json!({ "type": "color", "color": "#ff0000" })).unwrap();
    assert_eq!(
        b,
        Background::Color {
            color: "#ff0000".to_string()
        }
    );
    let b: Background = serde_json::from_value(json!({ "type": "blur" })).unwrap();
    assert_eq!(
        b,
        Background::Blur {
            blur_intensity: None
        }
    );
}

#[test]
fn media_asset_source_is_not_serialized() {
    let a = MediaAsset::new("m", MediaKind::Image, 0, 0);
    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(v, json!({ "id": "m", "type": "image", "width": 0, "height": 0 }));
    assert!(format!("{a:?}").contains("resolved: false"));
}

#[test]
fn generated_transition_ids_are_unique() {
    let a = Transition::new(TransitionKind::Fade, 0.5, "x", "y");
    let b = Transition::new(TransitionKind::Fade, 0.5, "x", "y");
    assert_ne!(a.id, b.id);
    assert!(a.links("x", "y"));
    assert!(!a.links("y", "x"));
}

#[test]
fn with_transform_is_noop_for_audio() {
    let e = Element::audio("a", 0.0, 1.0).with_transform(Transform::at(5.0, 5.0));
    assert!(e.transform().is_none());
    let e = Element::sticker("s", "star", 0.0, 1.0).with_transform(Transform::at(5.0, 5.0));
    assert_eq!(e.transform().unwrap().position, Vec2::new(5.0, 5.0));
}
