// ABOUTME: Per-sentence ClassificationRecord plus the request and response shapes of the tagger.
// ABOUTME: Field names follow the service wire format (PascalCase records, camelCase envelopes).

use serde::{Deserialize, Serialize};

use crate::classify::{
    ClarityType, EntitySummary, FunctionalType, InfoQuality, InformativeType, SentenceLabels,
    SourceType, Structure, Voice,
};

/// Salient entities found in a sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMentionFlag {
    pub value: u8,
    pub entity_count: usize,
    pub entities: Vec<String>,
}

impl From<&EntitySummary> for EntityMentionFlag {
    fn from(summary: &EntitySummary) -> Self {
        Self {
            value: u8::from(summary.is_mentioned()),
            entity_count: summary.count(),
            entities: summary.entities.clone(),
        }
    }
}

/// Every label the tagger assigns to one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClassificationRecord {
    pub sentence_id: String,
    pub sentence: String,
    pub html_tag: Option<String>,
    pub paragraph_id: Option<String>,
    pub functional_type: FunctionalType,
    pub informative_type: InformativeType,
    pub structure: Structure,
    pub voice: Voice,
    pub info_quality: InfoQuality,
    #[serde(rename = "ClaritySynthesisType")]
    pub clarity: ClarityType,
    pub claims_citation: bool,
    pub is_grammatically_correct: bool,
    pub has_pronoun: bool,
    pub is_self_contained: bool,
    pub entity_count: usize,
    pub relevance_score: f32,
    pub source_type: SourceType,
    #[serde(rename = "answerSentenceFlag")]
    pub answer_sentence_flag: u8,
    #[serde(rename = "entityMentionFlag")]
    pub entity_mention_flag: EntityMentionFlag,
    #[serde(rename = "entityConfidenceFlag")]
    pub entity_confidence_flag: u8,
}

/// Where a sentence sits in its source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub sentence_id: String,
    pub html_tag: Option<String>,
    pub paragraph_id: Option<String>,
}

impl ClassificationRecord {
    /// Assemble a record from classifier output and the keyword decisions.
    pub fn new(
        placement: Placement,
        text: &str,
        labels: &SentenceLabels,
        relevance_score: f32,
        is_answer: bool,
    ) -> Self {
        Self {
            sentence_id: placement.sentence_id,
            sentence: text.to_string(),
            html_tag: placement.html_tag,
            paragraph_id: placement.paragraph_id,
            functional_type: labels.functional,
            informative_type: labels.informative,
            structure: labels.structure,
            voice: labels.voice,
            info_quality: labels.info_quality,
            clarity: labels.clarity,
            claims_citation: labels.claims_citation,
            is_grammatically_correct: labels.grammatical,
            has_pronoun: labels.has_pronoun,
            is_self_contained: labels.self_contained,
            entity_count: labels.entities.count(),
            relevance_score,
            source_type: labels.source_type,
            answer_sentence_flag: u8::from(is_answer),
            entity_mention_flag: EntityMentionFlag::from(&labels.entities),
            entity_confidence_flag: u8::from(labels.entities.confident),
        }
    }

    pub fn is_answer(&self) -> bool {
        self.answer_sentence_flag == 1
    }
}

/// One caller-supplied sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceInput {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Text")]
    pub text: String,
}

impl SentenceInput {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Flat sentence list to classify against a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub sentences: Vec<SentenceInput>,
    #[serde(rename = "primaryKeyword")]
    pub primary_keyword: String,
}

/// Raw HTML document to segment and classify against a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRequest {
    #[serde(rename = "htmlContent")]
    pub html_content: String,
    #[serde(rename = "primaryKeyword")]
    pub primary_keyword: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub sentences: Vec<ClassificationRecord>,
    /// Id of the first answer sentence, if any.
    #[serde(rename = "answerPositionIndex")]
    pub answer_position_index: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityRequest {
    pub text1: String,
    pub text2: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResponse {
    pub similarity: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityBatchRequest {
    pub items: Vec<SimilarityRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBatchResponse {
    pub similarities: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::EntitySummary;

    fn labels() -> SentenceLabels {
        SentenceLabels {
            functional: FunctionalType::Declarative,
            structure: Structure::Simple,
            voice: Voice::Active,
            informative: InformativeType::Fact,
            info_quality: InfoQuality::WellKnown,
            clarity: ClarityType::Focused,
            claims_citation: false,
            grammatical: true,
            has_pronoun: false,
            self_contained: true,
            source_type: SourceType::ThirdParty,
            entities: EntitySummary {
                entities: vec!["IRS".to_string()],
                confident: true,
            },
        }
    }

    #[test]
    fn record_serializes_with_service_field_names() {
        let record = ClassificationRecord::new(
            Placement {
                sentence_id: "S1".to_string(),
                html_tag: Some("p".to_string()),
                paragraph_id: Some("P1".to_string()),
            },
            "The IRS sets deadlines.",
            &labels(),
            0.7312,
            true,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["SentenceId"], "S1");
        assert_eq!(json["HtmlTag"], "p");
        assert_eq!(json["ClaritySynthesisType"], "Focused");
        assert_eq!(json["IsGrammaticallyCorrect"], true);
        assert_eq!(json["answerSentenceFlag"], 1);
        assert_eq!(json["entityMentionFlag"]["entity_count"], 1);
        assert_eq!(json["entityMentionFlag"]["value"], 1);
        assert_eq!(json["entityConfidenceFlag"], 1);
        assert_eq!(json["SourceType"], "ThirdParty");
    }

    #[test]
    fn missing_placement_serializes_as_null() {
        let record = ClassificationRecord::new(
            Placement {
                sentence_id: "a".to_string(),
                ..Placement::default()
            },
            "x",
            &labels(),
            0.0,
            false,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["HtmlTag"].is_null());
        assert!(json["ParagraphId"].is_null());
        assert!(!record.is_answer());
    }

    #[test]
    fn requests_parse_wire_names() {
        let req: AnalysisRequest = serde_json::from_str(
            r#"{"sentences":[{"Id":"S1","Text":"Hi."},{"Text":"Bye."}],"primaryKeyword":"Refund"}"#,
        )
        .unwrap();
        assert_eq!(req.sentences[1].id, "");
        assert_eq!(req.primary_keyword, "Refund");

        let req: ArticleRequest =
            serde_json::from_str(r#"{"htmlContent":"<p>x</p>","primaryKeyword":"k"}"#).unwrap();
        assert_eq!(req.html_content, "<p>x</p>");
    }
}
