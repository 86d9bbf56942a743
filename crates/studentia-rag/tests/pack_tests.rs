use proptest::prelude::*;

use studentia_core::error::Error;
use studentia_core::types::{DocumentSection, RankedCandidate, SectionKey};
use studentia_rag::{ContextPacker, PromptBuilder, DEFAULT_HEADER};
use studentia_store::CorpusStore;

fn section(title: &str, heading: &str, content: &str, token_count: usize) -> DocumentSection {
    DocumentSection { key: SectionKey::new(title, heading), content: content.to_string(), token_count }
}

fn candidate(score: f32, title: &str, heading: &str) -> RankedCandidate {
    RankedCandidate { score, key: SectionKey::new(title, heading) }
}

fn cats_and_dogs() -> (CorpusStore, Vec<RankedCandidate>) {
    let corpus = CorpusStore::from_sections(vec![
        section("T1", "H1", "cats are mammals", 5),
        section("T2", "H2", "dogs are mammals", 5),
    ])
    .unwrap();
    let ranked = vec![candidate(0.9, "T1", "H1"), candidate(0.1, "T2", "H2")];
    (corpus, ranked)
}

#[test]
fn budget_ten_keeps_only_the_top_section() {
    let (corpus, ranked) = cats_and_dogs();
    let packer = ContextPacker::new("\n* ", 2);

    let packed = packer.pack(&ranked, &corpus, 10).expect("pack");

    assert_eq!(packed.snippets, vec!["\n* cats are mammals".to_string()]);
    assert_eq!(packed.keys, vec![SectionKey::new("T1", "H1")]);
    assert_eq!(packed.token_total, 7);
}

#[test]
fn budget_below_first_cost_yields_empty_context() {
    let (corpus, ranked) = cats_and_dogs();
    let packer = ContextPacker::new("\n* ", 2);

    let packed = packer.pack(&ranked, &corpus, 6).expect("empty context is not an error");

    assert!(packed.is_empty());
    assert!(packed.keys.is_empty());
    assert_eq!(packed.token_total, 0);
}

#[test]
fn exact_fit_is_included() {
    let (corpus, ranked) = cats_and_dogs();
    let packed = ContextPacker::new("\n* ", 2).pack(&ranked, &corpus, 14).unwrap();
    assert_eq!(packed.keys.len(), 2);
    assert_eq!(packed.token_total, 14);
}

#[test]
fn packing_halts_at_first_overflow_even_if_later_sections_fit() {
    let corpus = CorpusStore::from_sections(vec![
        section("A", "a", "short", 3),
        section("B", "b", "very long section", 50),
        section("C", "c", "tiny", 1),
    ])
    .unwrap();
    let ranked = vec![candidate(0.9, "A", "a"), candidate(0.8, "B", "b"), candidate(0.7, "C", "c")];

    let packed = ContextPacker::new("\n* ", 3).pack(&ranked, &corpus, 20).unwrap();

    assert_eq!(packed.keys, vec![SectionKey::new("A", "a")], "C would fit but comes after the overflow");
}

#[test]
fn newlines_in_content_are_flattened() {
    let corpus = CorpusStore::from_sections(vec![section("T", "H", "line one\nline two", 4)]).unwrap();
    let packed = ContextPacker::new("\n* ", 3).pack(&[candidate(1.0, "T", "H")], &corpus, 100).unwrap();
    assert_eq!(packed.snippets, vec!["\n* line one line two".to_string()]);
}

#[test]
fn unknown_ranked_key_is_propagated_as_not_found() {
    let (corpus, _) = cats_and_dogs();
    let ranked = vec![candidate(0.9, "T1", "H1"), candidate(0.5, "T9", "H9")];
    let err = ContextPacker::new("\n* ", 2).pack(&ranked, &corpus, 100).expect_err("missing key");
    assert!(matches!(err, Error::NotFound(ref k) if k == &SectionKey::new("T9", "H9")), "got {err}");
}

#[test]
fn prompt_with_empty_context_keeps_header_question_and_suffix() {
    let (corpus, _) = cats_and_dogs();
    let packed = ContextPacker::new("\n* ", 2).pack(&[], &corpus, 300).unwrap();
    let prompt = PromptBuilder::new().build("Where is the main gate?", &packed);

    assert!(prompt.starts_with(DEFAULT_HEADER));
    assert!(prompt.contains("Where is the main gate?"));
    assert!(prompt.ends_with("\n A:"));
    assert_eq!(prompt, format!("{DEFAULT_HEADER}\n\n Q: Where is the main gate?\n A:"));
}

#[test]
fn prompt_concatenates_header_snippets_and_question_in_order() {
    let (corpus, ranked) = cats_and_dogs();
    let packed = ContextPacker::new("\n* ", 2).pack(&ranked, &corpus, 100).unwrap();
    let prompt = PromptBuilder::with_header("Context:\n").build("Are cats mammals?", &packed);
    assert_eq!(prompt, "Context:\n\n* cats are mammals\n* dogs are mammals\n\n Q: Are cats mammals?\n A:");
}

#[test]
fn default_header_carries_fallback_referral() {
    assert!(DEFAULT_HEADER.contains("Sorry, I don't have that information."));
    assert!(DEFAULT_HEADER.contains("https://www.ewha.ac.kr/ewhaen/index.do"));
    assert!(DEFAULT_HEADER.ends_with("Context:\n"));
}

fn arb_sections() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..60, 1..25)
}

fn fixture(costs: &[usize]) -> (CorpusStore, Vec<RankedCandidate>) {
    let sections = costs
        .iter()
        .enumerate()
        .map(|(i, &tokens)| section(&format!("T{i:02}"), "H", &format!("section {i}"), tokens));
    let corpus = CorpusStore::from_sections(sections).unwrap();
    let ranked = (0..costs.len()).map(|i| candidate(1.0 - i as f32 * 0.01, &format!("T{i:02}"), "H")).collect();
    (corpus, ranked)
}

proptest! {
    #[test]
    fn proptest_pack_respects_budget(costs in arb_sections(), sep in 0usize..5, budget in 0usize..400) {
        let (corpus, ranked) = fixture(&costs);
        let packed = ContextPacker::new("\n* ", sep).pack(&ranked, &corpus, budget).unwrap();
        let spent: usize = packed.keys.iter().map(|k| corpus.lookup_section(k).unwrap().token_count + sep).sum();
        prop_assert_eq!(spent, packed.token_total);
        prop_assert!(packed.token_total <= budget);
    }

    #[test]
    fn proptest_pack_is_a_prefix_of_the_ranking(costs in arb_sections(), budget in 0usize..400) {
        let (corpus, ranked) = fixture(&costs);
        let packed = ContextPacker::new("\n* ", 3).pack(&ranked, &corpus, budget).unwrap();
        let prefix: Vec<SectionKey> = ranked.iter().take(packed.keys.len()).map(|c| c.key.clone()).collect();
        prop_assert_eq!(&packed.keys, &prefix);
        if let Some(next) = ranked.get(packed.keys.len()) {
            let cost = corpus.lookup_section(&next.key).unwrap().token_count + 3;
            prop_assert!(packed.token_total + cost > budget, "stopped although the next candidate fits");
        }
    }

    #[test]
    fn proptest_pack_is_idempotent(costs in arb_sections(), budget in 0usize..400) {
        let (corpus, ranked) = fixture(&costs);
        let packer = ContextPacker::new("\n* ", 3);
        let first = packer.pack(&ranked, &corpus, budget).unwrap();
        let second = packer.pack(&ranked, &corpus, budget).unwrap();
        prop_assert_eq!(first.render(), second.render());
        prop_assert_eq!(first, second);
    }
}
