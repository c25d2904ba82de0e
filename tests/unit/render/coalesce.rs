use super::*;
use std::cell::RefCell;

#[test]
fn state_machine_transitions() {
    let mut c = RenderCoalescer::new();
    assert_eq!(c.state(), RenderState::Idle);
    assert_eq!(c.request(), RenderRequest::Start);
    assert_eq!(c.state(), RenderState::Rendering);
    assert_eq!(c.request(), RenderRequest::Coalesced);
    assert_eq!(c.request(), RenderRequest::Coalesced);
    assert_eq!(c.state(), RenderState::RenderingPendingRetrigger);

    // Many missed requests produce exactly one follow-up.
    assert_eq!(c.finish(), RenderFinish::RenderAgain);
    assert_eq!(c.state(), RenderState::Rendering);
    assert_eq!(c.finish(), RenderFinish::Idle);
    assert_eq!(c.state(), RenderState::Idle);
}

#[test]
fn single_request_renders_once() {
    let layer = LayerSurface::new();
    let seen = RefCell::new(Vec::new());
    let out = layer
        .request_render(1.5_f64, |t| {
            seen.borrow_mut().push(*t);
            Ok(())
        })
        .unwrap();
    assert_eq!(out, RenderPass::Rendered { passes: 1 });
    assert_eq!(seen.into_inner(), vec![1.5]);
    assert_eq!(layer.state(), RenderState::Idle);
}

#[test]
fn reentrant_requests_coalesce_to_latest_input() {
    let layer: LayerSurface<u32> = LayerSurface::new();
    let seen = RefCell::new(Vec::new());
    let out = layer
        .request_render(0, |t| {
            seen.borrow_mut().push(*t);
            if *t == 0 {
                for n in 1..=5 {
                    let inner = layer.request_render(n, |_| Ok(())).unwrap();
                    assert_eq!(inner, RenderPass::Coalesced);
                }
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(out, RenderPass::Rendered { passes: 2 });
    assert_eq!(seen.into_inner(), vec![0, 5]);
}

#[test]
fn render_error_returns_gate_to_idle() {
    let layer: LayerSurface<u8> = LayerSurface::new();
    let err = layer
        .request_render(1, |_| Err(crate::ClipstackError::media("decode failed")))
        .unwrap_err();
    assert!(err.to_string().contains("decode failed"));
    assert_eq!(layer.state(), RenderState::Idle);

    let out = layer.request_render(2, |_| Ok(())).unwrap();
    assert_eq!(out, RenderPass::Rendered { passes: 1 });
}

#[test]
fn render_panic_returns_gate_to_idle() {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    let layer: LayerSurface<u8> = LayerSurface::new();
    let unwound = catch_unwind(AssertUnwindSafe(|| {
        layer.request_render(1, |_| panic!("decoder crashed"))
    }));
    assert!(unwound.is_err());
    assert_eq!(layer.state(), RenderState::Idle);

    let mut ran = Vec::new();
    let out = layer
        .request_render(2, |&v| {
            ran.push(v);
            Ok(())
        })
        .unwrap();
    assert_eq!(out, RenderPass::Rendered { passes: 1 });
    assert_eq!(ran, vec![2]);
}

#[test]
fn panic_in_follow_up_pass_also_resets() {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    let layer: LayerSurface<u8> = LayerSurface::new();
    let unwound = catch_unwind(AssertUnwindSafe(|| {
        layer.request_render(1, |&v| {
            if v == 1 {
                let pass = layer.request_render(9, |_| Ok(())).unwrap();
                assert_eq!(pass, RenderPass::Coalesced);
                return Ok(());
            }
            panic!("second pass crashed")
        })
    }));
    assert!(unwound.is_err());
    assert_eq!(layer.state(), RenderState::Idle);
}
