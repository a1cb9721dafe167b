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

//! # Tagger configuration
//!
//! `TaggerConfig` gathers everything needed to bootstrap and run the tagger: which
//! pre-trained model to use (and where to get it from), the device to run it on, the
//! tag set to print and the local cache location. It can be read from a JSON file
//! through the `Config` trait; missing fields take their default value.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use pos_tagger::common::config::{Config, TaggerConfig};
//! let config = TaggerConfig::from_file("path/to/pos-tagger.json")?;
//! # Ok(())
//! # }
//! ```

use crate::common::error::PosTaggerError;
use crate::common::resources::default_cache_directory;
use crate::pipelines::pos_tagging::TagSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tch::Device;

/// # Utility to deserialize JSON config files
pub trait Config
where
    for<'de> Self: Deserialize<'de>,
{
    /// Loads a `Config` object from a JSON file. The format is expected to be aligned with the
    /// serde representation of the implementing type.
    ///
    /// # Arguments
    ///
    /// * `path` - `Path` to the configuration JSON file.
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PosTaggerError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|error| {
            PosTaggerError::InvalidConfigurationError(format!(
                "could not open {}: {error}",
                path.display()
            ))
        })?;
        let br = BufReader::new(f);
        let config: Self = serde_json::from_reader(br)?;
        Ok(config)
    }
}

/// Name of the model weights file in a model repository
pub const WEIGHTS_FILE: &str = "rust_model.ot";
/// Name of the model configuration file in a model repository
pub const CONFIG_FILE: &str = "config.json";
/// Name of the tokenizer vocabulary file in a model repository
pub const VOCAB_FILE: &str = "vocab.txt";

/// # Device the model is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceOption {
    /// CUDA when available, CPU otherwise
    Auto,
    Cpu,
    /// First CUDA device
    Cuda,
}

impl From<DeviceOption> for Device {
    fn from(device: DeviceOption) -> Self {
        match device {
            DeviceOption::Auto => Device::cuda_if_available(),
            DeviceOption::Cpu => Device::Cpu,
            DeviceOption::Cuda => Device::Cuda(0),
        }
    }
}

/// # Reference to a pre-trained part-of-speech model
///
/// Remote models are fetched from `<endpoint>/<repository>/resolve/<revision>/<file>` and cached
/// under `<cache root>/<name>`. Setting `local_dir` bypasses the remote location entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    /// Model identifier, also used as the cache subdirectory
    pub name: String,
    /// Model hub endpoint
    pub endpoint: String,
    /// Repository on the model hub
    pub repository: String,
    /// Pinned revision (branch, tag or commit) of the repository
    pub revision: String,
    /// Directory holding the model files, used instead of the remote repository when set
    pub local_dir: Option<PathBuf>,
    /// The model expects lower-cased input
    pub lower_case: bool,
    /// The tokenizer strips accents
    pub strip_accents: Option<bool>,
}

impl Default for ModelSpec {
    /// MobileBERT fine-tuned for English part-of-speech tagging (Penn Treebank labels)
    fn default() -> ModelSpec {
        ModelSpec {
            name: String::from("mobilebert-finetuned-pos"),
            endpoint: String::from("https://huggingface.co"),
            repository: String::from("mrm8488/mobilebert-finetuned-pos"),
            revision: String::from("main"),
            local_dir: None,
            lower_case: true,
            strip_accents: Some(true),
        }
    }
}

impl ModelSpec {
    /// Remote location of a file of the model repository
    pub fn file_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.repository.trim_matches('/'),
            self.revision,
            file_name
        )
    }

    /// The model files come from a full commit hash rather than a branch or tag name, so the
    /// same bytes are fetched on every machine.
    pub fn is_pinned(&self) -> bool {
        self.local_dir.is_some()
            | ((self.revision.len() == 40) & self.revision.chars().all(|c| c.is_ascii_hexdigit()))
    }

    fn validate(&self) -> Result<(), PosTaggerError> {
        if self.name.trim().is_empty() {
            return Err(PosTaggerError::InvalidConfigurationError(
                "model name must not be empty".to_string(),
            ));
        }
        if self.local_dir.is_some() {
            return Ok(());
        }
        if !(self.endpoint.starts_with("https://") | self.endpoint.starts_with("http://")) {
            return Err(PosTaggerError::InvalidConfigurationError(format!(
                "model endpoint must be an http(s) URL, got `{}`",
                self.endpoint
            )));
        }
        if self.repository.trim_matches('/').is_empty() | self.revision.is_empty() {
            return Err(PosTaggerError::InvalidConfigurationError(
                "model repository and revision must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// # Configuration of the tagger and of its environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Pre-trained model to load
    pub model: ModelSpec,
    /// Device placement (default: CUDA when available)
    pub device: DeviceOption,
    /// Tag set of the printed labels
    pub tagset: TagSet,
    /// Cache root for downloaded models. Falls back to `POS_TAGGER_CACHE`, then to the user cache
    pub cache_dir: Option<PathBuf>,
    /// Missing model files may be downloaded
    pub allow_download: bool,
}

impl Config for TaggerConfig {}

impl Default for TaggerConfig {
    fn default() -> TaggerConfig {
        TaggerConfig {
            model: ModelSpec::default(),
            device: DeviceOption::Auto,
            tagset: TagSet::Universal,
            cache_dir: None,
            allow_download: true,
        }
    }
}

impl TaggerConfig {
    /// Root directory of the model cache
    pub fn cache_root(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_directory)
    }

    /// Checks the configuration for values that cannot lead to a usable model.
    pub fn validate(&self) -> Result<(), PosTaggerError> {
        self.model.validate()
    }
}
