use super::*;

fn config(reference: f64) -> SceneConfig {
    SceneConfig {
        text_reference_height: reference,
        ..SceneConfig::default()
    }
}

fn text_element(content: &str) -> Element {
    Element::text("t", TextContent::new(content), 0.0, 5.0)
}

#[test]
fn font_size_scales_with_canvas_height() {
    let node = TextNode::new(&text_element("hello"), Canvas::new(960, 540), &config(1080.0)).unwrap();
    assert!((node.font_size() - 24.0).abs() < 1e-12);
    let (w, h) = node.box_size();
    assert!((w - 5.0 * 24.0 * 0.6).abs() < 1e-9);
    assert!((h - 24.0 * 1.4).abs() < 1e-9);
}

#[test]
fn non_text_elements_are_rejected() {
    let el = Element::sticker("s", "mdi:heart", 0.0, 1.0);
    assert!(TextNode::new(&el, Canvas::new(10, 10), &config(1080.0)).is_none());
}

#[test]
fn svg_escapes_content_and_skips_transparent_box() {
    let node = TextNode::new(&text_element("a < b & c"), Canvas::new(100, 100), &config(100.0)).unwrap();
    let svg = node.svg();
    assert!(svg.contains("a &lt; b &amp; c"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(!svg.contains("<rect"));
}

#[test]
fn background_box_is_drawn_at_estimated_bounds() {
    let mut text = TextContent::new("  ");
    text.background_color = "#0000ff".to_owned();
    let el = Element::text("t", text, 0.0, 5.0);
    let node = TextNode::new(&el, Canvas::new(200, 100), &config(100.0)).unwrap();
    assert!(node.svg().contains("<rect"));

    let mut renderer = Renderer::new();
    let mut target = Surface::new(200, 100).unwrap();
    node.render(&mut renderer, &mut target, 1.0).unwrap();

    // Box is 57.6 x 67.2 centered on (100, 50).
    assert_eq!(target.pixel(75, 20), Some([0, 0, 255, 255]));
    assert_eq!(target.pixel(60, 50), Some([0, 0, 0, 0]));
    assert_eq!(target.pixel(100, 10), Some([0, 0, 0, 0]));

    // Outside the visible window nothing is drawn.
    let mut later = Surface::new(200, 100).unwrap();
    node.render(&mut renderer, &mut later, 5.0).unwrap();
    assert!(later.data().iter().all(|&b| b == 0));
}
