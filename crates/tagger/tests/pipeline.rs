// ABOUTME: End-to-end tests for the Tagger over precomputed annotation fixtures.
// ABOUTME: Covers keyword relevance across sentences, article segmentation and similarity.

use std::sync::Arc;

use lexis_tagger::{
    AnalysisRequest, AnnotationTable, ArticleRequest, Competitor, CompetitorAnalysisRequest,
    FunctionalType, InformativeType, SentenceInput, SimilarityBatchRequest, SimilarityRequest,
    Tagger, TaggerOptions,
};
use pretty_assertions::assert_eq;

const CONLLU: &str = include_str!("fixtures/refund.conllu");
const TABLE: &str = include_str!("fixtures/refund_table.json");

fn table() -> Arc<AnnotationTable> {
    let mut table = AnnotationTable::from_json(TABLE).unwrap();
    table.load_conllu(CONLLU).unwrap();
    Arc::new(table)
}

fn tagger() -> Tagger {
    let t = table();
    Tagger::builder().annotator(t.clone()).embedder(t).build().unwrap()
}

fn analyze(texts: &[&str]) -> lexis_tagger::AnalysisResponse {
    tagger()
        .analyze(&AnalysisRequest {
            sentences: texts.iter().map(|t| SentenceInput::new("", *t)).collect(),
            primary_keyword: "Refund".to_string(),
        })
        .unwrap()
}

#[test]
fn keyword_focus_carries_through_pronouns_and_drops_on_new_subject() {
    let response = analyze(&[
        "Our refund policy is simple.",
        "It applies to all orders.",
        "Shipping costs extra.",
        "It ships in two days.",
    ]);
    let flags: Vec<bool> = response.sentences.iter().map(|r| r.is_answer()).collect();
    assert_eq!(flags, vec![true, true, false, false]);
    assert_eq!(response.answer_position_index.as_deref(), Some("S1"));

    // Low similarity, answered by context alone.
    assert!(response.sentences[1].relevance_score < 0.6);
    // Pronoun opener after the keyword lost focus.
    assert!(!response.sentences[3].is_self_contained);
    assert!(response.sentences[1].is_self_contained);
}

#[test]
fn question_is_interrogative_and_not_an_answer() {
    let response = analyze(&["Is this correct?"]);
    let record = &response.sentences[0];
    assert_eq!(record.functional_type, FunctionalType::Interrogative);
    assert_eq!(record.informative_type, InformativeType::Question);
    assert!(!record.is_answer());
    assert!(response.answer_position_index.is_none());
}

#[test]
fn classification_is_deterministic() {
    let texts = ["Our refund policy is simple.", "Shipping costs extra."];
    assert_eq!(analyze(&texts), analyze(&texts));
}

#[test]
fn article_is_segmented_deduplicated_and_tagged() {
    let html = r#"<html><body>
        <h1>Refund policy</h1>
        <p>Our refund policy is simple. It applies to all orders.</p>
        <p>Our refund policy is simple. It applies to all orders.</p>
        <ul><li>i. Request a refund online.</li></ul>
    </body></html>"#;
    let response = tagger()
        .process_article(&ArticleRequest {
            html_content: html.to_string(),
            primary_keyword: "refund".to_string(),
        })
        .unwrap();

    let rows: Vec<(&str, &str, &str)> = response
        .sentences
        .iter()
        .map(|r| {
            (
                r.sentence_id.as_str(),
                r.html_tag.as_deref().unwrap_or(""),
                r.paragraph_id.as_deref().unwrap_or(""),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("S1", "h1", "P1"),
            ("S2", "p", "P2"),
            ("S3", "p", "P2"),
            ("S4", "li", "P3"),
        ]
    );
    assert_eq!(response.sentences[3].sentence, "i. Request a refund online.");
    assert_eq!(response.sentences[0].informative_type, InformativeType::Filler);
    assert!(!response.sentences[0].is_answer());
    assert_eq!(response.answer_position_index.as_deref(), Some("S2"));
}

#[test]
fn records_serialize_with_null_placement_for_flat_input() {
    let response = analyze(&["Shipping costs extra."]);
    let json = serde_json::to_value(&response).unwrap();
    assert!(json["sentences"][0]["HtmlTag"].is_null());
    assert_eq!(json["sentences"][0]["SentenceId"], "S1");
    assert!(json["answerPositionIndex"].is_null());
}

#[test]
fn similarity_is_symmetric_and_zero_without_vectors() {
    let t = tagger();
    let pair = |a: &str, b: &str| SimilarityRequest {
        text1: a.to_string(),
        text2: b.to_string(),
    };
    let ab = t.similarity(&pair("refund", "Refund policy")).unwrap();
    let ba = t.similarity(&pair("Refund policy", "refund")).unwrap();
    assert_eq!(ab.similarity, ba.similarity);
    assert_eq!(ab.similarity, 0.9762);

    let mut table = AnnotationTable::from_json(TABLE).unwrap();
    table
        .load_conllu("# text = Oh.\n1 Oh oh INTJ UH _ 0 ROOT _ Vector=No\n2 . . PUNCT . _ 1 punct _ _\n")
        .unwrap();
    table.load_conllu(CONLLU).unwrap();
    let table = Arc::new(table);
    let t = Tagger::builder()
        .annotator(table.clone())
        .embedder(table)
        .build()
        .unwrap();
    assert_eq!(t.similarity(&pair("Oh.", "refund")).unwrap().similarity, 0.0);

    let batch = t
        .similarity_batch(&SimilarityBatchRequest {
            items: vec![pair("Oh.", "refund"), pair("refund", "Refund policy")],
        })
        .unwrap();
    assert_eq!(batch.similarities, vec![0.0, 0.9762]);
}

#[test]
fn subtopics_need_enough_distinct_sources() {
    let table = AnnotationTable::new()
        .with_embedding("How to file taxes", vec![1.0, 0.1, 0.0])
        .with_embedding("Filing taxes guide", vec![0.9, 0.2, 0.0])
        .with_embedding("Best restaurants", vec![0.0, 0.0, 1.0]);
    let table = Arc::new(table);
    let request = CompetitorAnalysisRequest {
        data: ["How to file taxes", "Filing taxes guide", "Best restaurants"]
            .iter()
            .enumerate()
            .map(|(i, h)| Competitor {
                url: format!("https://site{}.example", i),
                headings: vec![h.to_string()],
                intent: 0,
            })
            .collect(),
    };

    let two_sources = Tagger::builder()
        .annotator(table.clone())
        .embedder(table.clone())
        .options(TaggerOptions {
            subtopic_min_sources: 2,
            ..TaggerOptions::default()
        })
        .build()
        .unwrap();
    assert_eq!(
        two_sources.subtopics(&request).unwrap(),
        vec!["Filing taxes guide".to_string()]
    );

    let default = Tagger::builder()
        .annotator(table.clone())
        .embedder(table)
        .build()
        .unwrap();
    assert!(default.subtopics(&request).unwrap().is_empty());
}
