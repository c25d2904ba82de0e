use super::*;
use crate::effects::transitions::TransitionKind;

fn clip(id: &str, start: f64, dur: f64) -> Element {
    Element::video(id, "m", start, dur)
}

fn track(elements: Vec<Element>) -> Track {
    Track::main("v").with_elements(elements)
}

fn ids(pairs: &[AdjacentPair<'_>]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|p| (p.from.id.clone(), p.to.id.clone()))
        .collect()
}

#[test]
fn pairs_ignore_input_order() {
    let a = clip("a", 0.0, 5.0);
    let b = clip("b", 5.0, 3.0);
    let c = clip("c", 8.02, 1.0);
    let forward = track(vec![a.clone(), b.clone(), c.clone()]);
    let shuffled = track(vec![c, a, b]);
    assert_eq!(
        ids(&find_adjacent_pairs(&forward)),
        ids(&find_adjacent_pairs(&shuffled))
    );
    assert_eq!(
        ids(&find_adjacent_pairs(&forward)),
        vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string())
        ]
    );
}

#[test]
fn gap_at_epsilon_is_not_adjacent() {
    let t = track(vec![clip("a", 0.0, 1.0), clip("b", 1.0 + 0.0625, 1.0)]);
    assert!(find_adjacent_pairs(&t).is_empty());

    let t = track(vec![clip("a", 0.0, 1.0), clip("b", 1.04, 1.0)]);
    assert_eq!(find_adjacent_pairs(&t).len(), 1);
}

#[test]
fn exact_epsilon_gap_excluded_with_representable_values() {
    // 0.25 + 0.25 == 0.5 exactly, so the gap equals epsilon with no rounding.
    let t = track(vec![clip("a", 0.0, 0.25), clip("b", 0.5, 1.0)]);
    assert!(find_adjacent_pairs_with(&t, 0.25).is_empty());
    assert_eq!(find_adjacent_pairs_with(&t, 0.25 + 1e-6).len(), 1);
}

#[test]
fn decimal_gap_at_epsilon_is_not_adjacent_anywhere_on_the_timeline() {
    // 5.05 - 5.0 evaluates to 0.04999999999999982 in f64.
    for end in [1.0, 5.0, 12.3, 3600.0] {
        let a = clip("a", end - 1.0, 1.0);
        let at_epsilon = clip("b", end + 0.05, 1.0);
        let inside = clip("b", end + 0.049, 1.0);
        assert!(
            !are_elements_adjacent(&a, &at_epsilon, ADJACENCY_EPSILON),
            "gap of exactly epsilon after {end}"
        );
        assert!(are_elements_adjacent(&a, &inside, ADJACENCY_EPSILON), "gap 0.049 after {end}");
    }
}

#[test]
fn cleanup_drops_transition_at_exact_epsilon_gap() {
    let t = track(vec![clip("a", 0.0, 5.0), clip("b", 5.05, 1.0)]);
    let t = add_transition_to_track(
        &t,
        Transition::new(TransitionKind::Fade, 0.5, "a", "b").with_id("t"),
    );
    assert!(find_adjacent_pairs(&t).is_empty());
    assert!(cleanup_transitions(&t).transitions.is_empty());
}

#[test]
fn overlap_within_epsilon_counts_as_adjacent() {
    let t = track(vec![clip("a", 0.0, 1.0), clip("b", 0.98, 1.0)]);
    assert_eq!(find_adjacent_pairs(&t).len(), 1);
}

#[test]
fn start_ties_break_by_id() {
    let t = track(vec![clip("z", 0.0, 1.0), clip("a", 0.0, 1.0), clip("n", 1.0, 1.0)]);
    assert_eq!(
        ids(&find_adjacent_pairs(&t)),
        vec![("z".to_string(), "n".to_string())]
    );
}

#[test]
fn audio_elements_do_not_pair() {
    let t = track(vec![
        clip("a", 0.0, 1.0),
        Element::audio("snd", 1.0, 1.0),
        clip("b", 2.0, 1.0),
    ]);
    assert!(find_adjacent_pairs(&t).is_empty());
}

#[test]
fn add_upserts_by_pair() {
    let t = track(vec![clip("a", 0.0, 1.0), clip("b", 1.0, 1.0)]);
    let t1 = add_transition_to_track(
        &t,
        Transition::new(TransitionKind::Fade, 0.5, "a", "b").with_id("t1"),
    );
    let t2 = add_transition_to_track(
        &t1,
        Transition::new(TransitionKind::ZoomIn, 1.0, "a", "b").with_id("t2"),
    );
    assert!(t.transitions.is_empty());
    assert_eq!(t1.transitions.len(), 1);
    assert_eq!(t2.transitions.len(), 1);
    let found = get_transition_for_pair(&t2, "a", "b").unwrap();
    assert_eq!(found.id, "t2");
    assert_eq!(found.kind, TransitionKind::ZoomIn);
    assert!(get_transition_for_pair(&t2, "b", "a").is_none());
}

#[test]
fn remove_by_id() {
    let t = track(vec![clip("a", 0.0, 1.0), clip("b", 1.0, 1.0)]).with_transitions([
        Transition::new(TransitionKind::Fade, 0.5, "a", "b").with_id("t1"),
    ]);
    let out = remove_transition_from_track(&t, "t1");
    assert!(out.transitions.is_empty());
    assert_eq!(t.transitions.len(), 1);
    assert_eq!(remove_transition_from_track(&t, "nope"), t);
}

#[test]
fn cleanup_drops_dangling_and_separated_pairs() {
    let t = track(vec![clip("a", 0.0, 1.0), clip("b", 1.0, 1.0), clip("c", 3.0, 1.0)])
        .with_transitions([
            Transition::new(TransitionKind::Fade, 0.5, "a", "b").with_id("keep"),
            Transition::new(TransitionKind::Fade, 0.5, "b", "c").with_id("apart"),
            Transition::new(TransitionKind::Fade, 0.5, "c", "gone").with_id("dangling"),
        ]);
    let cleaned = cleanup_transitions(&t);
    assert!(matches!(cleaned, Cow::Owned(_)));
    let kept: Vec<_> = cleaned.transitions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(kept, vec!["keep"]);
}

#[test]
fn cleanup_is_idempotent_and_borrows_clean_tracks() {
    let t = track(vec![clip("a", 0.0, 1.0), clip("b", 1.0, 1.0)]).with_transitions([
        Transition::new(TransitionKind::Fade, 0.5, "a", "b"),
        Transition::new(TransitionKind::Fade, 0.5, "b", "a"),
    ]);
    let once = cleanup_transitions(&t).into_owned();
    let twice = cleanup_transitions(&once);
    assert!(matches!(twice, Cow::Borrowed(_)));
    assert_eq!(*twice, once);

    let clean = cleanup_transitions(&once);
    assert!(std::ptr::eq(clean.as_ref(), &once));
}
