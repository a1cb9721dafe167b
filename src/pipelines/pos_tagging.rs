// Copyright 2026 The pos-tagger Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Part Of Speech pipeline
//! Extracts Part of Speech tags (Noun, Verb, Adjective...) from text and formats them as
//! `<token>_<tag>` units.
//!
//! The tagging core is independent of where the model comes from: anything implementing
//! `TokenTagger` can be formatted with `tag_text`. `POSModel` is the production implementation,
//! a MobileBERT token classification model fine-tuned on English Penn Treebank labels, loaded
//! from local files (see `pipelines::environment` to obtain them).
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use pos_tagger::common::config::TaggerConfig;
//! use pos_tagger::pipelines::environment::prepare_model;
//! use pos_tagger::pipelines::pos_tagging::tag_text;
//!
//! let pos_model = prepare_model(&TaggerConfig::default())?;
//! let output = tag_text("My name is Amélie. How are you?", &pos_model)?;
//! # Ok(())
//! # }
//! ```
//! Output: \
//! ```no_run
//! # let output =
//! "My_PRON name_NOUN is_VERB Amélie_PROPN ._PUNCT How_ADV are_VERB you_NOUN ?_PUNCT"
//! # ;
//! ```

use crate::common::error::PosTaggerError;
use lazy_static::lazy_static;
use rust_bert::pipelines::common::ModelType;
use rust_bert::pipelines::token_classification::{
    LabelAggregationOption, Token, TokenClassificationConfig, TokenClassificationModel,
};
use rust_bert::resources::LocalResource as ModelFile;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tch::Device;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// # Part of speech tag
pub struct POSTag {
    /// String representation of the word
    pub word: String,
    /// Confidence score
    pub score: f64,
    /// Part-of-speech label (e.g. NOUN, VERB...)
    pub label: String,
}

/// # Label set used for the printed tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagSet {
    /// Universal Dependencies coarse labels (NOUN, VERB, ADP...)
    Universal,
    /// Penn Treebank labels as predicted by the model (NN, VBZ, IN...)
    Penn,
}

lazy_static! {
    static ref PENN_TO_UNIVERSAL: HashMap<&'static str, &'static str> = HashMap::from([
        (".", "PUNCT"),
        (",", "PUNCT"),
        (":", "PUNCT"),
        ("``", "PUNCT"),
        ("''", "PUNCT"),
        ("-LRB-", "PUNCT"),
        ("-RRB-", "PUNCT"),
        ("(", "PUNCT"),
        (")", "PUNCT"),
        ("HYPH", "PUNCT"),
        ("NFP", "PUNCT"),
        ("$", "SYM"),
        ("#", "SYM"),
        ("SYM", "SYM"),
        ("ADD", "X"),
        ("AFX", "ADJ"),
        ("CC", "CCONJ"),
        ("CD", "NUM"),
        ("DT", "DET"),
        ("EX", "PRON"),
        ("FW", "X"),
        ("GW", "X"),
        ("IN", "ADP"),
        ("JJ", "ADJ"),
        ("JJR", "ADJ"),
        ("JJS", "ADJ"),
        ("LS", "X"),
        ("MD", "AUX"),
        ("NIL", "X"),
        ("NN", "NOUN"),
        ("NNS", "NOUN"),
        ("NNP", "PROPN"),
        ("NNPS", "PROPN"),
        ("PDT", "DET"),
        ("POS", "PART"),
        ("PRP", "PRON"),
        ("PRP$", "PRON"),
        ("RB", "ADV"),
        ("RBR", "ADV"),
        ("RBS", "ADV"),
        ("RP", "ADP"),
        ("TO", "PART"),
        ("UH", "INTJ"),
        ("VB", "VERB"),
        ("VBD", "VERB"),
        ("VBG", "VERB"),
        ("VBN", "VERB"),
        ("VBP", "VERB"),
        ("VBZ", "VERB"),
        ("WDT", "DET"),
        ("WP", "PRON"),
        ("WP$", "PRON"),
        ("WRB", "ADV"),
        ("XX", "X"),
        ("_SP", "SPACE"),
    ]);
    static ref UNIVERSAL_TAGS: HashSet<&'static str> = HashSet::from([
        "ADJ", "ADP", "ADV", "AUX", "CCONJ", "DET", "INTJ", "NOUN", "NUM", "PART", "PRON",
        "PROPN", "PUNCT", "SCONJ", "SYM", "VERB", "X", "SPACE",
    ]);
}

/// Maps a Penn Treebank label to its Universal Dependencies counterpart.
///
/// Labels that already belong to the universal tag set are returned unchanged, anything else
/// maps to `X`.
pub fn universal_tag(label: &str) -> &'static str {
    if let Some(universal) = PENN_TO_UNIVERSAL.get(label) {
        return *universal;
    }
    UNIVERSAL_TAGS.get(label).copied().unwrap_or("X")
}

/// # Model handle turning raw text into part-of-speech tags
pub trait TokenTagger {
    /// Tags a text. Tags are returned in order of appearance, one per model token.
    fn tag(&self, text: &str) -> Result<Vec<POSTag>, PosTaggerError>;
}

/// Formats tags as space-separated `<word>_<label>` units.
pub fn format_tags(tags: &[POSTag]) -> String {
    tags.iter()
        .map(|tag| format!("{}_{}", tag.word, tag.label))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Tags a text with the given model and formats the result as a single line.
///
/// # Arguments
///
/// * `text` - input text, may be empty
/// * `model` - model handle used for tagging
///
/// # Example
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use pos_tagger::common::config::TaggerConfig;
/// use pos_tagger::pipelines::environment::prepare_model;
/// use pos_tagger::pipelines::pos_tagging::tag_text;
///
/// let pos_model = prepare_model(&TaggerConfig::default())?;
/// let line = tag_text("The cat sat.", &pos_model)?;
/// # Ok(())
/// # }
/// ```
pub fn tag_text<M>(text: &str, model: &M) -> Result<String, PosTaggerError>
where
    M: TokenTagger + ?Sized,
{
    let tags = model.tag(text)?;
    Ok(format_tags(&tags))
}

/// # Configuration for POSModel
/// Local model files, tokenizer settings and device placement.
pub struct POSConfig {
    /// Model weights (`rust_model.ot`)
    pub model_path: PathBuf,
    /// Model configuration (`config.json`)
    pub config_path: PathBuf,
    /// Tokenizer vocabulary (`vocab.txt`)
    pub vocab_path: PathBuf,
    /// Automatically lower case all input upon tokenization
    pub lower_case: bool,
    /// Strip accents upon tokenization
    pub strip_accents: Option<bool>,
    /// Device to place the model on
    pub device: Device,
    /// Label set of the returned tags
    pub tagset: TagSet,
}

impl From<POSConfig> for TokenClassificationConfig {
    fn from(pos_config: POSConfig) -> Self {
        let mut config = TokenClassificationConfig::new(
            ModelType::MobileBert,
            ModelFile {
                local_path: pos_config.model_path,
            },
            ModelFile {
                local_path: pos_config.config_path,
            },
            ModelFile {
                local_path: pos_config.vocab_path,
            },
            None,
            pos_config.lower_case,
            pos_config.strip_accents,
            None,
            LabelAggregationOption::First,
        );
        config.device = pos_config.device;
        config
    }
}

/// # POSModel to extract Part of Speech tags
pub struct POSModel {
    token_classification_model: TokenClassificationModel,
    tagset: TagSet,
}

impl POSModel {
    /// Build a new `POSModel`
    ///
    /// # Arguments
    ///
    /// * `pos_config` - `POSConfig` object containing the model file locations and device placement (CPU/GPU)
    pub fn new(pos_config: POSConfig) -> Result<POSModel, PosTaggerError> {
        let tagset = pos_config.tagset;
        let model = TokenClassificationModel::new(pos_config.into())?;
        Ok(POSModel {
            token_classification_model: model,
            tagset,
        })
    }

    /// Extract part of speech tags from texts, one vector of tags per input.
    ///
    /// Panics raised by the inference backend are converted into a `TaggingError`.
    pub fn predict<S>(&self, input: &[S]) -> Result<Vec<Vec<POSTag>>, PosTaggerError>
    where
        S: AsRef<str>,
    {
        let output =
            catch_backend_panic(|| self.token_classification_model.predict(input, true, false))?;

        Ok(output
            .into_iter()
            .map(|sequence_tokens| {
                sequence_tokens
                    .into_iter()
                    .map(|token| Self::to_pos_tag(token, self.tagset))
                    .collect::<Vec<POSTag>>()
            })
            .collect::<Vec<Vec<POSTag>>>())
    }

    fn to_pos_tag(token: Token, tagset: TagSet) -> POSTag {
        normalize_tag(
            POSTag {
                word: token.text,
                score: token.score,
                label: token.label,
            },
            tagset,
        )
    }
}

impl TokenTagger for POSModel {
    fn tag(&self, text: &str) -> Result<Vec<POSTag>, PosTaggerError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.predict(&[text])?.into_iter().next().unwrap_or_default())
    }
}

/// Relabels low-confidence punctuation and converts the label to the requested tag set.
fn normalize_tag(mut tag: POSTag, tagset: TagSet) -> POSTag {
    if is_punctuation(tag.word.as_str()) & ((tag.score < 0.5) | tag.score.is_nan()) {
        tag.label = String::from(".");
        tag.score = 1f64;
    }
    if tagset == TagSet::Universal {
        tag.label = universal_tag(tag.label.as_str()).to_string();
    }
    tag
}

fn is_punctuation(string: &str) -> bool {
    !string.is_empty() && string.chars().all(|c| c.is_ascii_punctuation())
}

/// Runs `f`, turning a panic into a `TaggingError`. The panic hook is silenced for the duration
/// of the call so that the error is only reported once, by the caller.
fn catch_backend_panic<T, F>(f: F) -> Result<T, PosTaggerError>
where
    F: FnOnce() -> T,
{
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let output = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(hook);
    output.map_err(|payload| PosTaggerError::TaggingError(panic_message(payload)))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("inference backend panicked")
    }
}
