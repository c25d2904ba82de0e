use super::*;
use crate::assets::media::{MediaFrame, StillImage};
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::scene::media::MediaNode;
use crate::timeline::model::{Element, MediaAsset, MediaKind};

fn clip(id: &str, start: f64, dur: f64, rgb: [u8; 3]) -> Arc<SceneNode> {
    let frame =
        MediaFrame::solid(Rgba8Premul::from_straight_rgba(rgb[0], rgb[1], rgb[2], 255), 2, 2).unwrap();
    let asset = MediaAsset::new(id, MediaKind::Video, 0, 0).with_source(StillImage::shared(frame));
    let el = Element::video(id, id, start, dur);
    Arc::new(SceneNode::Media(
        MediaNode::new(&el, &asset, Canvas::new(8, 8)).unwrap(),
    ))
}

fn fade_node() -> TransitionNode {
    TransitionNode::new(
        TransitionKind::Fade,
        TransitionTiming {
            duration: 1.0,
            transition_start: 4.5,
            outgoing_end_time: 5.0,
            incoming_start_time: 5.0,
            outgoing_clamp_epsilon: 0.001,
        },
        clip("a", 0.0, 5.0, [255, 0, 0]),
        clip("b", 5.0, 3.0, [0, 0, 255]),
    )
}

fn render_at(node: &TransitionNode, time: f64) -> [u8; 4] {
    let mut renderer = Renderer::new();
    let mut target = Surface::new(8, 8).unwrap();
    node.render(&mut renderer, &mut target, time).unwrap();
    target.pixel(4, 4).unwrap()
}

#[test]
fn timing_clamps_each_side_into_its_own_window() {
    let t = fade_node().timing();
    assert_eq!(t.progress(4.4), None);
    assert_eq!(t.progress(4.5), Some(0.0));
    assert_eq!(t.progress(5.5), None);
    assert!((t.outgoing_time(5.2) - 4.999).abs() < 1e-12);
    assert_eq!(t.outgoing_time(4.7), 4.7);
    assert_eq!(t.incoming_time(4.7), 5.0);
    assert_eq!(t.incoming_time(5.2), 5.2);
}

#[test]
fn window_edges_pass_through() {
    let node = fade_node();
    assert_eq!(render_at(&node, 4.5), [255, 0, 0, 255]);
    assert_eq!(render_at(&node, 4.0), [255, 0, 0, 255]);
    assert_eq!(render_at(&node, 5.5), [0, 0, 255, 255]);
}

#[test]
fn midpoint_blends_both_sides() {
    let px = render_at(&fade_node(), 5.0);
    assert!((i32::from(px[0]) - 64).abs() <= 1, "{px:?}");
    assert_eq!(px[1], 0);
    assert!((i32::from(px[2]) - 128).abs() <= 1, "{px:?}");
    assert!((i32::from(px[3]) - 192).abs() <= 1, "{px:?}");
}

#[test]
fn buffers_are_reused_until_dimensions_change() {
    let node = fade_node();
    let mut renderer = Renderer::new();

    let mut target = Surface::new(8, 8).unwrap();
    node.render(&mut renderer, &mut target, 4.8).unwrap();
    let first = node.buffers.lock().unwrap().as_ref().unwrap().a.data().as_ptr();
    node.render(&mut renderer, &mut target, 4.9).unwrap();
    let second = node.buffers.lock().unwrap().as_ref().unwrap().a.data().as_ptr();
    assert_eq!(first, second);

    let mut smaller = Surface::new(4, 4).unwrap();
    node.render(&mut renderer, &mut smaller, 4.9).unwrap();
    assert!(node.buffers.lock().unwrap().as_ref().unwrap().matches(4, 4));
}

#[test]
fn outside_window_never_allocates_buffers() {
    let node = fade_node();
    render_at(&node, 2.0);
    assert!(node.buffers.lock().unwrap().is_none());
}
