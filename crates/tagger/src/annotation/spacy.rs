// ABOUTME: Maps spaCy-style JSON documents into the tagger's internal annotation model.
// ABOUTME: The only place that knows spaCy's POS, dependency, entity and morphology labels.

use serde::{Deserialize, Serialize};

use super::{
    compute_depths, AnnotatedSentence, AnnotatedToken, DepRole, EntityKind, EntitySpan,
    GrammaticalNumber, Morphology, PartOfSpeech,
};

/// A token as serialized by a spaCy pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpacyToken {
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub dep: String,
    #[serde(default)]
    pub head: usize,
    #[serde(default)]
    pub is_stop: bool,
    #[serde(default)]
    pub is_punct: bool,
    #[serde(default)]
    pub ent_type: String,
    /// Feature string such as `Number=Sing|Person=3`.
    #[serde(default)]
    pub morph: String,
    #[serde(default)]
    pub has_vector: bool,
}

/// An entity span as serialized by spaCy (token offsets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacyEntity {
    pub start: usize,
    pub end: usize,
    pub label: String,
    #[serde(default)]
    pub text: String,
}

/// A single-sentence spaCy document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpacyDoc {
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<SpacyToken>,
    #[serde(default)]
    pub ents: Vec<SpacyEntity>,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
}

impl SpacyDoc {
    /// Convert into the internal model. Depths are derived from head links.
    pub fn into_sentence(self) -> AnnotatedSentence {
        let mut tokens: Vec<AnnotatedToken> = self
            .tokens
            .into_iter()
            .map(|t| AnnotatedToken {
                pos: map_pos(&t.pos),
                dep: map_dep(&t.dep),
                entity: map_entity(&t.ent_type),
                morph: parse_morph(&t.morph),
                lemma: if t.lemma.is_empty() {
                    t.text.to_lowercase()
                } else {
                    t.lemma
                },
                text: t.text,
                tag: t.tag,
                head: t.head,
                is_stop: t.is_stop,
                is_punct: t.is_punct,
                depth: 0,
                has_vector: t.has_vector,
            })
            .collect();
        compute_depths(&mut tokens);

        let entities = self
            .ents
            .into_iter()
            .filter_map(|e| {
                let label = map_entity(&e.label)?;
                let text = if e.text.is_empty() {
                    span_text(&tokens, e.start, e.end)
                } else {
                    e.text
                };
                Some(EntitySpan {
                    start: e.start,
                    end: e.end,
                    label,
                    text,
                })
            })
            .collect();

        // Vectors of all zeros are spaCy's way of saying "no vector".
        let embedding = self
            .vector
            .filter(|v| !v.is_empty() && v.iter().any(|x| *x != 0.0));

        AnnotatedSentence {
            text: self.text,
            tokens,
            entities,
            embedding,
        }
    }
}

fn span_text(tokens: &[AnnotatedToken], start: usize, end: usize) -> String {
    tokens
        .get(start..end.min(tokens.len()))
        .unwrap_or_default()
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a Universal Dependencies POS label.
pub fn map_pos(label: &str) -> PartOfSpeech {
    match label.to_uppercase().as_str() {
        "ADJ" => PartOfSpeech::Adjective,
        "ADP" => PartOfSpeech::Adposition,
        "ADV" => PartOfSpeech::Adverb,
        "AUX" => PartOfSpeech::Auxiliary,
        "CCONJ" | "CONJ" => PartOfSpeech::CoordinatingConjunction,
        "DET" => PartOfSpeech::Determiner,
        "INTJ" => PartOfSpeech::Interjection,
        "NOUN" => PartOfSpeech::Noun,
        "NUM" => PartOfSpeech::Numeral,
        "PART" => PartOfSpeech::Particle,
        "PRON" => PartOfSpeech::Pronoun,
        "PROPN" => PartOfSpeech::ProperNoun,
        "PUNCT" => PartOfSpeech::Punctuation,
        "SCONJ" => PartOfSpeech::SubordinatingConjunction,
        "SYM" => PartOfSpeech::Symbol,
        "VERB" => PartOfSpeech::Verb,
        "SPACE" => PartOfSpeech::Space,
        _ => PartOfSpeech::Other,
    }
}

/// Map a ClearNLP/spaCy dependency label.
pub fn map_dep(label: &str) -> DepRole {
    match label {
        "ROOT" | "root" => DepRole::Root,
        "nsubj" => DepRole::NominalSubject,
        "nsubjpass" | "nsubj:pass" => DepRole::PassiveNominalSubject,
        "csubj" => DepRole::ClausalSubject,
        "csubjpass" | "csubj:pass" => DepRole::PassiveClausalSubject,
        "expl" => DepRole::Expletive,
        "dobj" | "obj" => DepRole::DirectObject,
        "iobj" => DepRole::IndirectObject,
        "dative" => DepRole::Dative,
        "pobj" => DepRole::PrepositionalObject,
        "attr" => DepRole::Attribute,
        "acomp" => DepRole::AdjectivalComplement,
        "aux" => DepRole::Auxiliary,
        "auxpass" | "aux:pass" => DepRole::PassiveAuxiliary,
        "conj" => DepRole::Conjunct,
        "cc" => DepRole::CoordinatingConjunction,
        "advcl" => DepRole::AdverbialClause,
        "relcl" | "acl:relcl" => DepRole::RelativeClause,
        "ccomp" => DepRole::ClausalComplement,
        "xcomp" => DepRole::OpenClausalComplement,
        "acl" => DepRole::AdnominalClause,
        "mark" => DepRole::Marker,
        "amod" => DepRole::AdjectivalModifier,
        "advmod" => DepRole::AdverbialModifier,
        "compound" => DepRole::Compound,
        "poss" | "nmod:poss" => DepRole::Possessive,
        "nmod" => DepRole::NominalModifier,
        "nummod" => DepRole::NumericModifier,
        "appos" => DepRole::Appositional,
        "det" => DepRole::Determiner,
        "prep" | "case" => DepRole::Preposition,
        "neg" => DepRole::Negation,
        "discourse" | "intj" => DepRole::Discourse,
        "parataxis" => DepRole::Parataxis,
        "punct" => DepRole::Punctuation,
        _ => DepRole::Other,
    }
}

/// Map an OntoNotes entity label. Empty labels mean "not an entity".
pub fn map_entity(label: &str) -> Option<EntityKind> {
    let kind = match label.to_uppercase().as_str() {
        "" => return None,
        "PERSON" | "PER" => EntityKind::Person,
        "NORP" => EntityKind::Norp,
        "FAC" => EntityKind::Facility,
        "ORG" => EntityKind::Organization,
        "GPE" => EntityKind::GeopoliticalEntity,
        "LOC" => EntityKind::Location,
        "PRODUCT" => EntityKind::Product,
        "EVENT" => EntityKind::Event,
        "WORK_OF_ART" => EntityKind::WorkOfArt,
        "LAW" => EntityKind::Law,
        "LANGUAGE" => EntityKind::Language,
        "DATE" => EntityKind::Date,
        "TIME" => EntityKind::Time,
        "PERCENT" => EntityKind::Percent,
        "MONEY" => EntityKind::Money,
        "QUANTITY" => EntityKind::Quantity,
        "ORDINAL" => EntityKind::Ordinal,
        "CARDINAL" => EntityKind::Cardinal,
        _ => EntityKind::Other,
    };
    Some(kind)
}

/// Parse the `Key=Value|Key=Value` morphology string.
pub fn parse_morph(morph: &str) -> Morphology {
    let mut out = Morphology::default();
    for feature in morph.split('|') {
        let Some((key, value)) = feature.split_once('=') else {
            continue;
        };
        match key.trim() {
            "Number" => {
                out.number = match value.trim() {
                    "Sing" => Some(GrammaticalNumber::Singular),
                    "Plur" => Some(GrammaticalNumber::Plural),
                    _ => None,
                }
            }
            "Person" => out.person = value.trim().parse().ok(),
            _ => {}
        }
    }
    out
}
