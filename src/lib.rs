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

//! # pos-tagger
//!
//! Part-of-speech tagging of plain text with a pre-trained transformer model.
//!
//! The crate is made of two parts:
//! - an environment preparer (`pipelines::environment`) that makes sure the pre-trained model
//!   files are available locally, downloading them from a pinned model repository on first use,
//!   and loads the model;
//! - a tagger (`pipelines::pos_tagging`) turning text into `<token>_<TAG>` units using any model
//!   handle implementing `TokenTagger`.
//!
//! The `pos-tagger` binary reads standard input, prints the tagged line on standard output and
//! exits with status 1 (after printing `Error in tag_text: <message>` on standard error) if
//! tagging fails.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use pos_tagger::common::config::TaggerConfig;
//! use pos_tagger::pipelines::environment::prepare_model;
//! use pos_tagger::pipelines::pos_tagging::tag_text;
//!
//! let pos_model = prepare_model(&TaggerConfig::default())?;
//! let output = tag_text("The cat sat.", &pos_model)?;
//! # Ok(())
//! # }
//! ```
//!
//! Model files are cached under `$POS_TAGGER_CACHE`, or `<user cache>/pos-tagger` when unset.

pub mod cli;
pub mod common;
pub mod pipelines;

pub use common::error::PosTaggerError;
