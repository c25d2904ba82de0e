use super::*;
use crate::assets::media::{MediaFrame, StillImage};
use crate::foundation::core::Rgba8Premul;
use crate::timeline::model::{MediaKind, TextContent, TrackKind};

fn canvas() -> Canvas {
    Canvas::new(1920, 1080)
}

fn asset(id: &str, kind: MediaKind, width: u32, height: u32) -> MediaAsset {
    let frame = MediaFrame::solid(Rgba8Premul::from_straight_rgba(9, 9, 9, 255), 1, 1).unwrap();
    MediaAsset::new(id, kind, width, height).with_source(StillImage::shared(frame))
}

#[test]
fn misses_on_empty_timeline() {
    assert!(hit_test(Point::new(960.0, 540.0), &[], &[], canvas(), 0.0).is_none());
}

#[test]
fn later_element_on_same_track_wins() {
    let tracks = vec![Track::new("v", TrackKind::Video).with_elements([
        Element::image("late", "m", 1.0, 5.0),
        Element::image("early", "m", 0.0, 5.0),
    ])];
    let media = [asset("m", MediaKind::Image, 1920, 1080)];
    let hit = hit_test(Point::new(960.0, 540.0), &tracks, &media, canvas(), 2.0).unwrap();
    assert_eq!(hit.element_id, "late");
    assert_eq!(hit.track_id, "v");

    let hit = hit_test(Point::new(960.0, 540.0), &tracks, &media, canvas(), 0.5).unwrap();
    assert_eq!(hit.element_id, "early");
}

#[test]
fn main_track_is_hit_last() {
    let tracks = vec![
        Track::main("main").with_elements([Element::image("bg", "m", 0.0, 5.0)]),
        Track::new("overlay", TrackKind::Video).with_elements([Element::image("fg", "m", 0.0, 5.0)]),
    ];
    let media = [asset("m", MediaKind::Image, 0, 0)];
    let hit = hit_test(Point::new(10.0, 10.0), &tracks, &media, canvas(), 1.0).unwrap();
    assert_eq!(hit.element_id, "fg");

    let reordered = vec![tracks[1].clone(), tracks[0].clone()];
    let hit = hit_test(Point::new(10.0, 10.0), &reordered, &media, canvas(), 1.0).unwrap();
    assert_eq!(hit.element_id, "fg");
}

#[test]
fn hidden_audio_and_invisible_are_excluded() {
    let mut hidden_track = Track::new("hidden", TrackKind::Text);
    hidden_track.hidden = true;
    hidden_track
        .elements
        .push(Element::text("ht", TextContent::new("xxxxxxxxxx"), 0.0, 5.0));
    let tracks = vec![
        Track::new("music", TrackKind::Audio).with_elements([Element::audio("a", 0.0, 5.0)]),
        Track::new("titles", TrackKind::Text).with_elements([
            Element::text("gone", TextContent::new("xxxxxxxxxx"), 0.0, 5.0).hidden(true),
            Element::text("later", TextContent::new("xxxxxxxxxx"), 5.0, 5.0),
        ]),
        hidden_track,
    ];
    assert!(hit_test(Point::new(960.0, 540.0), &tracks, &[], canvas(), 1.0).is_none());
    let hit = hit_test(Point::new(960.0, 540.0), &tracks, &[], canvas(), 5.0).unwrap();
    assert_eq!(hit.element_id, "later");
}

#[test]
fn rotation_is_honored() {
    let sticker = |rotate: f64| {
        let el = Element::sticker("s", "mdi:heart", 0.0, 1.0).with_transform(Transform {
            rotate,
            ..Transform::default()
        });
        vec![Track::new("st", TrackKind::Sticker).with_elements([el])]
    };
    // Sticker edge = 200 * min(200/200, 100/200) = 100, so half extents are 50.
    let canvas = Canvas::new(200, 100);
    let p = Point::new(160.0, 50.0);
    assert!(hit_test(p, &sticker(0.0), &[], canvas, 0.5).is_none());
    // Rotated 45 degrees the box reaches 50 * sqrt(2) along the x axis.
    assert!(hit_test(p, &sticker(45.0), &[], canvas, 0.5).is_some());
    assert!(hit_test(Point::new(100.0, 100.0), &sticker(0.0), &[], canvas, 0.5).is_some());
    assert!(hit_test(Point::new(100.0, 100.0), &sticker(45.0), &[], canvas, 0.5).is_some());
    assert!(hit_test(Point::new(150.0, 100.0), &sticker(45.0), &[], canvas, 0.5).is_none());
}

#[test]
fn transform_is_reported() {
    let t = Transform {
        position: crate::Vec2::new(100.0, -50.0),
        scale: 0.5,
        rotate: 15.0,
    };
    let tracks = vec![Track::new("v", TrackKind::Video)
        .with_elements([Element::image("i", "m", 0.0, 1.0).with_transform(t)])];
    let media = [asset("m", MediaKind::Image, 1920, 1080)];
    let hit = hit_test(Point::new(1060.0, 490.0), &tracks, &media, canvas(), 0.0).unwrap();
    assert_eq!(hit.transform, t);
    assert_eq!(hit.element.id, "i");
}

#[test]
fn undrawable_media_is_not_selectable() {
    let tracks = vec![
        Track::main("main").with_elements([Element::image("under", "ok", 0.0, 5.0)]),
        Track::new("overlay", TrackKind::Video).with_elements([
            Element::image("missing", "nowhere", 0.0, 5.0),
            Element::video("pending", "unresolved", 0.0, 5.0),
            Element::video("sound", "music", 0.0, 5.0),
        ]),
    ];
    let media = [
        asset("ok", MediaKind::Image, 1920, 1080),
        MediaAsset::new("unresolved", MediaKind::Video, 1920, 1080),
        asset("music", MediaKind::Audio, 0, 0),
    ];
    let hit = hit_test(Point::new(960.0, 540.0), &tracks, &media, canvas(), 1.0).unwrap();
    assert_eq!(hit.element_id, "under");

    let drawable_only = [asset("ok", MediaKind::Image, 1920, 1080)];
    let only_overlay = vec![tracks[1].clone()];
    assert!(hit_test(Point::new(960.0, 540.0), &only_overlay, &drawable_only, canvas(), 1.0).is_none());
}
