use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ClipstackError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ClipstackError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        ClipstackError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(ClipstackError::media("x").to_string().contains("media error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ClipstackError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_converts_through_question_mark() {
    fn fails() -> ClipstackResult<()> {
        Err(anyhow::anyhow!("decoder stalled"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, ClipstackError::Other(_)));
    assert!(err.to_string().contains("decoder stalled"));
}

#[test]
fn every_variant_has_a_producer() {
    let all = [
        ClipstackError::validation("v"),
        ClipstackError::evaluation("e"),
        ClipstackError::surface("s"),
        ClipstackError::media("m"),
        ClipstackError::from(anyhow::anyhow!("o")),
    ];
    for err in &all {
        match err {
            ClipstackError::Validation(_)
            | ClipstackError::Evaluation(_)
            | ClipstackError::Surface(_)
            | ClipstackError::Media(_)
            | ClipstackError::Other(_) => {}
        }
    }
    assert_eq!(all.len(), 5);
}
