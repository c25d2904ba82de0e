use super::*;
use crate::assets::media::{MediaFrame, StillImage};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::ClipstackError;
use std::sync::Mutex;

fn red_asset(id: &str, w: u32, h: u32) -> MediaAsset {
    let frame = MediaFrame::solid(Rgba8Premul::from_straight_rgba(255, 0, 0, 255), 2, 2).unwrap();
    MediaAsset::new(id, MediaKind::Image, w, h).with_source(StillImage::shared(frame))
}

#[test]
fn unresolved_or_non_media_yields_no_node() {
    let canvas = Canvas::new(10, 10);
    let unresolved = MediaAsset::new("m", MediaKind::Video, 10, 10);
    assert!(MediaNode::new(&Element::video("v", "m", 0.0, 1.0), &unresolved, canvas).is_none());

    let asset = red_asset("m", 10, 10);
    assert!(MediaNode::new(&Element::audio("a", 0.0, 1.0), &asset, canvas).is_none());
}

#[test]
fn video_source_time_honors_trim_and_rate() {
    let canvas = Canvas::new(10, 10);
    let mut el = Element::video("v", "m", 2.0, 4.0);
    el.trim_start = 1.0;
    if let ElementContent::Video { playback_rate, .. } = &mut el.content {
        *playback_rate = 2.0;
    }
    let asset = red_asset("m", 10, 10);
    let asset = MediaAsset {
        kind: MediaKind::Video,
        ..asset
    };
    let node = MediaNode::new(&el, &asset, canvas).unwrap();
    assert!((node.source_time(3.5) - 4.0).abs() < 1e-12);
    assert!((node.source_time(2.0) - 1.0).abs() < 1e-12);
}

#[test]
fn draws_only_inside_visible_window() {
    let canvas = Canvas::new(10, 10);
    let node = MediaNode::new(&Element::image("i", "m", 1.0, 1.0), &red_asset("m", 10, 10), canvas)
        .unwrap();
    let mut renderer = Renderer::new();
    let mut target = Surface::new(10, 10).unwrap();

    node.render(&mut renderer, &mut target, 2.0).unwrap();
    assert_eq!(target.pixel(5, 5), Some([0, 0, 0, 0]));

    node.render(&mut renderer, &mut target, 1.0).unwrap();
    assert_eq!(target.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(target.pixel(9, 9), Some([255, 0, 0, 255]));
}

#[test]
fn contain_fit_letterboxes_wide_media() {
    let canvas = Canvas::new(10, 10);
    let node = MediaNode::new(&Element::image("i", "m", 0.0, 1.0), &red_asset("m", 20, 10), canvas)
        .unwrap();
    let mut renderer = Renderer::new();
    let mut target = Surface::new(10, 10).unwrap();
    node.render(&mut renderer, &mut target, 0.0).unwrap();

    // 20x10 fits as 10x5, centered vertically.
    assert_eq!(target.pixel(5, 1), Some([0, 0, 0, 0]));
    assert_eq!(target.pixel(5, 3), Some([255, 0, 0, 255]));
    assert_eq!(target.pixel(5, 6), Some([255, 0, 0, 255]));
    assert_eq!(target.pixel(5, 8), Some([0, 0, 0, 0]));
}

#[test]
fn pending_frames_draw_nothing_and_errors_propagate() {
    let canvas = Canvas::new(4, 4);
    let requested = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requested);
    let pending = MediaAsset::new("p", MediaKind::Video, 4, 4).with_source(Arc::new(
        move |t: f64| -> ClipstackResult<Option<MediaFrame>> {
            seen.lock().unwrap().push(t);
            Ok(None)
        },
    ));
    let failing = MediaAsset::new("f", MediaKind::Video, 4, 4).with_source(Arc::new(
        |_t: f64| -> ClipstackResult<Option<MediaFrame>> {
            Err(ClipstackError::media("decoder gone"))
        },
    ));

    let mut renderer = Renderer::new();
    let mut target = Surface::new(4, 4).unwrap();
    let node = MediaNode::new(&Element::video("v", "p", 0.0, 2.0), &pending, canvas).unwrap();
    node.render(&mut renderer, &mut target, 0.5).unwrap();
    assert_eq!(*requested.lock().unwrap(), vec![0.5]);
    assert!(target.data().iter().all(|&b| b == 0));

    let node = MediaNode::new(&Element::video("v", "f", 0.0, 2.0), &failing, canvas).unwrap();
    let err = node.render(&mut renderer, &mut target, 0.5).unwrap_err();
    assert!(matches!(err, ClipstackError::Media(_)));
}
