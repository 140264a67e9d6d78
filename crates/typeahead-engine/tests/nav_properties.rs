//! Property tests for the navigation invariant: no key sequence can drive
//! the active index outside `{-1} ∪ [0, len-1]`, and the open flag never
//! survives a commit or dismissal.

use proptest::prelude::*;
use typeahead_engine::{CandidateSource, Key, Typeahead, TypeaheadConfig};
use web_time::Instant;

fn arbitrary_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Enter),
        Just(Key::Escape),
        Just(Key::ArrowUp),
        Just(Key::ArrowDown),
        Just(Key::Tab),
        Just(Key::Backspace),
        prop::char::range('a', 'z').prop_map(Key::Char),
    ]
}

proptest! {
    #[test]
    fn active_index_stays_in_bounds(
        candidate_count in 0usize..8,
        preselect in any::<bool>(),
        keys in prop::collection::vec(arbitrary_key(), 0..40),
    ) {
        let candidates: Vec<String> = (0..candidate_count)
            .map(|i| format!("item {i}"))
            .collect();
        let engine = Typeahead::new(
            TypeaheadConfig::new()
                .with_preselect(preselect)
                .with_empty_presentation(true),
        )
        .with_source(CandidateSource::Static(candidates));
        engine.input_changed("item", Instant::now()).unwrap();

        for key in keys {
            engine.handle_key(key);
            let view = engine.view();
            let len = view.items.len() as isize;
            prop_assert!(view.active_index >= -1);
            prop_assert!(view.active_index < len.max(1));
            if view.active_index >= 0 {
                prop_assert!(view.active_index < len);
            }
        }
    }

    #[test]
    fn enter_and_escape_always_close(
        candidate_count in 1usize..8,
        arrows in prop::collection::vec(
            prop_oneof![Just(Key::ArrowUp), Just(Key::ArrowDown)],
            0..10,
        ),
        closer in prop_oneof![Just(Key::Enter), Just(Key::Escape)],
    ) {
        let candidates: Vec<String> = (0..candidate_count)
            .map(|i| format!("item {i}"))
            .collect();
        let engine = Typeahead::new(TypeaheadConfig::new())
            .with_source(CandidateSource::Static(candidates));
        engine.input_changed("item", Instant::now()).unwrap();
        prop_assert!(engine.is_open());

        for key in arrows {
            engine.handle_key(key);
        }
        engine.handle_key(closer);
        prop_assert!(!engine.is_open());
    }
}
