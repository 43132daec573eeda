use super::*;
use std::time::Duration;

#[test]
fn test_two_terms_intersect() {
    let index = abc_index();
    let (results, _) = index.search("alpha beta");
    assert_eq!(ids(&results), set(&["A"]));
}

#[test]
fn test_single_term_returns_all_holders() {
    let index = abc_index();
    let (results, _) = index.search("alpha");
    assert_eq!(ids(&results), set(&["A", "B"]));
}

#[test]
fn test_unknown_term_is_empty() {
    let index = abc_index();
    let (results, _) = index.search("delta");
    assert!(results.is_empty());
}

#[test]
fn test_unknown_term_anywhere_short_circuits() {
    let index = abc_index();
    assert!(index.search("alpha delta").0.is_empty());
    assert!(index.search("delta alpha").0.is_empty());
}

#[test]
fn test_disjoint_terms_are_empty() {
    let index = abc_index();
    let (results, _) = index.search("alpha beta gamma");
    assert!(results.is_empty());
}

#[test]
fn test_case_and_punctuation_normalized() {
    let index = SearchIndex::new();
    index.index_document(Document::new("1", "Alpha Beta"));
    index.index_document(Document::new("2", "ERROR: connection-refused (port=443)"));

    assert_eq!(ids(&index.search("alpha").0), set(&["1"]));
    assert_eq!(ids(&index.search("BETA, alpha!").0), set(&["1"]));
    assert_eq!(ids(&index.search("connection refused 443").0), set(&["2"]));
    assert_eq!(ids(&index.search("error:").0), set(&["2"]));
}

#[test]
fn test_repeated_query_terms() {
    let index = abc_index();
    assert_eq!(ids(&index.search("alpha alpha ALPHA").0), set(&["A", "B"]));
}

#[test]
fn test_empty_query() {
    let index = abc_index();
    let (results, elapsed) = index.search("");
    assert!(results.is_empty());
    assert!(elapsed >= Duration::ZERO);
    assert!(elapsed < Duration::from_secs(1));

    assert!(index.search("   ...  ").0.is_empty());
}

#[test]
fn test_search_on_empty_index() {
    let index = SearchIndex::new();
    assert!(index.is_empty());
    assert!(index.search("anything").0.is_empty());
}

#[test]
fn test_only_tokenizable_fields_are_searchable() {
    let index = SearchIndex::new();
    index.index_document(Document {
        id: "x".into(),
        message: "body".into(),
        tag: "tagword".into(),
        sender: "senderword".into(),
        event: "eventword".into(),
        message_raw: "rawword".into(),
        structured_data: "structword".into(),
        groupings: "groupword".into(),
        event_id: "eventidword".into(),
        namespace: "nsword".into(),
        timestamp: 1,
    });

    for term in ["body", "tagword", "senderword", "eventword"] {
        assert_eq!(ids(&index.search(term).0), set(&["x"]), "term {term}");
    }
    for term in ["rawword", "structword", "groupword", "eventidword", "nsword"] {
        assert!(index.search(term).0.is_empty(), "term {term} should not be indexed");
    }

    // Terms from different fields combine under AND
    assert_eq!(ids(&index.search("tagword eventword").0), set(&["x"]));
}

#[test]
fn test_idempotent_read() {
    let index = abc_index();
    let (first, _) = index.search("gamma");
    let (second, _) = index.search("gamma");
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(ids(&first), set(&["B", "C"]));
}

#[test]
fn test_results_carry_full_documents() {
    let index = SearchIndex::new();
    let mut doc = Document::new("7", "payload search");
    doc.timestamp = 1_700_000_000_000_000_000;
    doc.namespace = "prod".into();
    index.index_document(doc.clone());

    let (results, _) = index.search("payload");
    assert_eq!(results.len(), 1);
    assert_eq!(*results[0], doc);
}
