use super::*;

#[test]
fn mul_div255_is_exact_at_extremes() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(200, 255), 200);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn smoothstep_hits_endpoints_and_midpoint() {
    assert_eq!(smoothstep01(0.0), 0.0);
    assert_eq!(smoothstep01(1.0), 1.0);
    assert!((smoothstep01(0.5) - 0.5).abs() < 1e-12);
    assert!((smoothstep01(0.25) - 0.15625).abs() < 1e-12);
    assert_eq!(smoothstep01(-3.0), 0.0);
}

#[test]
fn opacity_quantization_clamps() {
    assert_eq!(opacity_to_u8(0.0), 0);
    assert_eq!(opacity_to_u8(1.0), 255);
    assert_eq!(opacity_to_u8(2.0), 255);
    assert_eq!(opacity_to_u8(0.5), 128);
}
