// ABOUTME: Section-level keyword analysis: merges content items into heading-led sections and scores them.
// ABOUTME: Produces per-section relevance, provenance and answer flags plus an answer-block density score.

use serde::{Deserialize, Serialize};

use crate::annotation::{embed_all, AnnotatedSentence, Annotator, Embedder};
use crate::classify::SourceType;
use crate::error::Result;
use crate::options::CompiledOptions;
use crate::similarity::{cosine, round4, round_to};

/// One extracted content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub s_id: i64,
    pub text: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequest {
    pub keyword: String,
    pub content: Vec<ContentItem>,
}

/// Consecutive items led by a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub text: String,
    /// Tag of the first item.
    pub tag: String,
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub section_id: usize,
    pub html_tag: String,
    pub text: String,
    pub source: SourceType,
    pub relevance: f32,
    pub is_answer: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub keyword: String,
    pub answer_block_density_score: f32,
    pub total_sections_analyzed: usize,
    pub results: Vec<SectionResult>,
}

/// `h1`..`h6` and any other `h<digits>` tag.
pub fn is_heading_tag(tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    match tag.strip_prefix('h') {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Merge items into sections; a heading closes the section before it.
pub fn logical_sections(content: &[ContentItem]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Vec<&ContentItem> = Vec::new();
    for item in content {
        if is_heading_tag(&item.tag) && !current.is_empty() {
            sections.push(merge_items(&current));
            current.clear();
        }
        current.push(item);
    }
    if !current.is_empty() {
        sections.push(merge_items(&current));
    }
    sections
}

fn merge_items(items: &[&ContentItem]) -> Section {
    Section {
        text: items
            .iter()
            .map(|i| i.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        tag: items[0].tag.clone(),
        ids: items.iter().map(|i| i.s_id).collect(),
    }
}

/// Provenance of a whole section.
///
/// Regulatory wording without a first-person subject is ThirdParty; brand
/// wording or a `we` subject is FirstParty.
pub fn section_source(sentence: &AnnotatedSentence, opts: &CompiledOptions) -> SourceType {
    let lex = &opts.lexicon;
    let lower = sentence.text.to_lowercase();
    let subjects: Vec<String> = sentence
        .tokens
        .iter()
        .filter(|t| t.dep.is_subject())
        .map(|t| t.lower())
        .collect();

    let first_person = subjects
        .iter()
        .any(|s| lex.first_person_markers.contains(s) || opts.brand_terms.contains(s));
    if lex.regulatory_keywords.is_match(&lower) && !first_person {
        return SourceType::ThirdParty;
    }

    let brand = lex.brand_phrases.is_match(&lower)
        || opts.brand_terms.iter().any(|b| lower.contains(b.as_str()));
    if brand || subjects.iter().any(|s| s == "we") {
        return SourceType::FirstParty;
    }
    SourceType::Unknown
}

/// Density of answer blocks by the position of the first one, scaled by 3.
pub fn answer_block_density(first_answer: Option<usize>) -> f32 {
    let base = match first_answer {
        None => 0.0,
        Some(i) if i <= 2 => 3.33,
        Some(i) if i <= 5 => 2.0,
        Some(_) => 1.0,
    };
    round_to(base * 3.0, 2)
}

/// Score every logical section against `keyword`.
///
/// `keyword` is expected already validated. All vectors not carried by the
/// annotations go to the embedder in one batch.
pub fn analyze_sections(
    annotator: &dyn Annotator,
    embedder: &dyn Embedder,
    request: &SectionRequest,
    keyword: &str,
    opts: &CompiledOptions,
) -> Result<SectionReport> {
    let sections = logical_sections(&request.content);
    let keyword_doc = annotator.annotate(keyword)?;
    let annotated = sections
        .iter()
        .map(|s| annotator.annotate(&s.text))
        .collect::<Result<Vec<_>>>()?;

    let needs = |doc: &AnnotatedSentence| doc.has_usable_vectors() && doc.embedding.is_none();
    let mut missing: Vec<&str> = Vec::new();
    if needs(&keyword_doc) {
        missing.push(keyword);
    }
    for (section, doc) in sections.iter().zip(&annotated) {
        if needs(doc) {
            missing.push(&section.text);
        }
    }
    let mut fetched = embed_all(embedder, &missing, keyword)?.into_iter();

    let mut pick = |doc: &AnnotatedSentence| -> Option<Vec<f32>> {
        if !doc.has_usable_vectors() {
            return None;
        }
        match &doc.embedding {
            Some(v) => Some(v.clone()),
            None => fetched.next(),
        }
    };
    let keyword_vec = pick(&keyword_doc);

    let mut results = Vec::with_capacity(sections.len());
    let mut first_answer = None;
    for (idx, (section, doc)) in sections.iter().zip(&annotated).enumerate() {
        let relevance = match (pick(doc), &keyword_vec) {
            (Some(vector), Some(keyword_vec)) => cosine(&vector, keyword_vec),
            _ => 0.0,
        };

        let is_answer = relevance > opts.raw.answer_threshold && !section.text.ends_with('?');
        if is_answer && first_answer.is_none() {
            first_answer = Some(idx);
        }
        results.push(SectionResult {
            section_id: idx,
            html_tag: section.tag.clone(),
            text: section.text.clone(),
            source: section_source(doc, opts),
            relevance: round4(relevance),
            is_answer: u8::from(is_answer),
        });
    }

    tracing::debug!(
        sections = results.len(),
        first_answer = ?first_answer,
        "analyzed sections"
    );
    Ok(SectionReport {
        keyword: request.keyword.clone(),
        answer_block_density_score: answer_block_density(first_answer),
        total_sections_analyzed: results.len(),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::table::AnnotationTable;
    use crate::annotation::test_embedders::ShortBatch;
    use pretty_assertions::assert_eq;

    fn item(id: i64, tag: &str, text: &str) -> ContentItem {
        ContentItem {
            s_id: id,
            text: text.to_string(),
            tag: tag.to_string(),
        }
    }

    #[test]
    fn headings_open_new_sections() {
        let content = vec![
            item(1, "p", "Intro line."),
            item(2, "h2", "Deadlines"),
            item(3, "p", "File by April."),
            item(4, "li", "Pay quarterly."),
            item(5, "h3", "Penalties"),
        ];
        let sections = logical_sections(&content);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].text, "Intro line.");
        assert_eq!(sections[1].text, "Deadlines File by April. Pay quarterly.");
        assert_eq!(sections[1].tag, "h2");
        assert_eq!(sections[1].ids, vec![2, 3, 4]);
        assert_eq!(sections[2].ids, vec![5]);
    }

    #[test]
    fn leading_heading_does_not_emit_empty_section() {
        let sections = logical_sections(&[item(1, "h1", "Title"), item(2, "p", "Body.")]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text, "Title Body.");
        assert!(logical_sections(&[]).is_empty());
    }

    #[test]
    fn heading_tag_detection() {
        assert!(is_heading_tag("h2"));
        assert!(is_heading_tag("H6"));
        assert!(!is_heading_tag("hr"));
        assert!(!is_heading_tag("header"));
        assert!(!is_heading_tag("p"));
    }

    #[test]
    fn density_tiers() {
        assert_eq!(answer_block_density(None), 0.0);
        assert_eq!(answer_block_density(Some(0)), 9.99);
        assert_eq!(answer_block_density(Some(2)), 9.99);
        assert_eq!(answer_block_density(Some(5)), 6.0);
        assert_eq!(answer_block_density(Some(6)), 3.0);
    }

    fn conllu(src: &str) -> AnnotatedSentence {
        crate::annotation::conll::parse_sentence(src).unwrap()
    }

    #[test]
    fn source_follows_regulatory_and_brand_wording() {
        let opts = CompiledOptions::default();
        let irs = conllu(
            "# text = The IRS sets the deadline.\n1 The the DET DT _ 2 det _ _\n2 IRS irs PROPN NNP _ 3 nsubj _ NE=ORG\n3 sets set VERB VBZ _ 0 ROOT _ _\n4 the the DET DT _ 5 det _ _\n5 deadline deadline NOUN NN _ 3 dobj _ _\n6 . . PUNCT . _ 3 punct _ _\n",
        );
        assert_eq!(section_source(&irs, &opts), SourceType::ThirdParty);

        let we = conllu(
            "# text = We file the tax form.\n1 We we PRON PRP _ 2 nsubj _ _\n2 file file VERB VBP _ 0 ROOT _ _\n3 the the DET DT _ 5 det _ _\n4 tax tax NOUN NN _ 5 compound _ _\n5 form form NOUN NN _ 2 dobj _ _\n6 . . PUNCT . _ 2 punct _ _\n",
        );
        assert_eq!(section_source(&we, &opts), SourceType::FirstParty);

        let plain = conllu("# text = Lunch is ready.\n1 Lunch lunch NOUN NN _ 2 nsubj _ _\n2 is be AUX VBZ _ 0 ROOT _ _\n3 ready ready ADJ JJ _ 2 acomp _ _\n4 . . PUNCT . _ 2 punct _ _\n");
        assert_eq!(section_source(&plain, &opts), SourceType::Unknown);
    }

    #[test]
    fn report_scores_sections_against_keyword() {
        let opts = CompiledOptions::default();
        let mut table = AnnotationTable::new();
        table
            .load_conllu(
                "# text = refund\n1 refund refund NOUN NN _ 0 ROOT _ _\n\n\
                 # text = Refunds Refunds arrive fast.\n1 Refunds refund NOUN NNS _ 0 ROOT _ _\n2 Refunds refund NOUN NNS _ 3 nsubj _ _\n3 arrive arrive VERB VBP _ 1 dep _ _\n4 fast fast ADV RB _ 3 advmod _ _\n5 . . PUNCT . _ 3 punct _ _\n\n\
                 # text = Shipping Why wait?\n1 Shipping shipping NOUN NN _ 0 ROOT _ _\n2 Why why ADV WRB _ 3 advmod _ _\n3 wait wait VERB VB _ 1 dep _ _\n4 ? ? PUNCT . _ 3 punct _ _\n",
            )
            .unwrap();
        table.insert_embedding("refund", vec![1.0, 0.0]);
        table.insert_embedding("Refunds Refunds arrive fast.", vec![0.9, 0.1]);
        table.insert_embedding("Shipping Why wait?", vec![1.0, 0.0]);

        let request = SectionRequest {
            keyword: "refund".to_string(),
            content: vec![
                item(1, "h2", "Refunds"),
                item(2, "p", "Refunds arrive fast."),
                item(3, "h2", "Shipping"),
                item(4, "p", "Why wait?"),
            ],
        };
        let report = analyze_sections(&table, &table, &request, "refund", &opts).unwrap();
        assert_eq!(report.total_sections_analyzed, 2);
        assert_eq!(report.results[0].is_answer, 1);
        assert!(report.results[0].relevance > 0.99);
        // Similar enough, but a question.
        assert_eq!(report.results[1].is_answer, 0);
        assert_eq!(report.results[1].relevance, 1.0);
        assert_eq!(report.answer_block_density_score, 9.99);
    }

    fn plain_table() -> AnnotationTable {
        let mut table = AnnotationTable::new();
        table
            .load_conllu(
                "# text = refund\n1 refund refund NOUN NN _ 0 ROOT _ _\n\n\
                 # text = Refunds arrive fast.\n1 Refunds refund NOUN NNS _ 2 nsubj _ _\n2 arrive arrive VERB VBP _ 0 ROOT _ _\n3 fast fast ADV RB _ 2 advmod _ _\n4 . . PUNCT . _ 2 punct _ _\n",
            )
            .unwrap();
        table
    }

    #[test]
    fn short_embedding_batch_fails_the_request() {
        let opts = CompiledOptions::default();
        let table = plain_table();
        let request = SectionRequest {
            keyword: "refund".to_string(),
            content: vec![item(1, "p", "Refunds arrive fast.")],
        };
        let err = analyze_sections(&table, &ShortBatch { keep: 0 }, &request, "refund", &opts)
            .unwrap_err();
        assert!(err.is_embedding());
    }

    #[test]
    fn keyword_without_vectors_is_not_embedded() {
        let opts = CompiledOptions::default();
        let mut table = plain_table();
        table
            .load_conllu("# text = the\n1 the the DET DT _ 0 ROOT _ Stop=Yes\n")
            .unwrap();
        let request = SectionRequest {
            keyword: "the".to_string(),
            content: vec![item(1, "p", "Refunds arrive fast.")],
        };
        // Only the section text reaches the embedder, so one vector is enough.
        let report =
            analyze_sections(&table, &ShortBatch { keep: 1 }, &request, "the", &opts).unwrap();
        assert_eq!(report.results[0].relevance, 0.0);
        assert_eq!(report.results[0].is_answer, 0);
    }
}
