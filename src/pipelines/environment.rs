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

//! # Environment preparation
//!
//! Turns a `TaggerConfig` into a ready-to-use `POSModel`. The NLP library itself is linked at
//! build time; at runtime the preparer makes sure the pre-trained model files (weights,
//! configuration and vocabulary) are present locally, downloading the missing ones from the
//! pinned model repository, and loads the model from them.
//!
//! Each file goes through `acquire_or_provision`: a local lookup that never touches the network,
//! a one-time download if the file is absent, and a single retry of the lookup. When all files
//! are already cached, preparing the model has no side effect besides reading them.

use crate::common::config::{
    DeviceOption, ModelSpec, TaggerConfig, CONFIG_FILE, VOCAB_FILE, WEIGHTS_FILE,
};
use crate::common::error::PosTaggerError;
use crate::common::resources::{LocalResource, RemoteResource, ResourceProvider};
use crate::pipelines::pos_tagging::{POSConfig, POSModel};
use std::path::{Path, PathBuf};
use tch::Cuda;
use tracing::{debug, info, warn};

/// # Resources making up a pre-trained model
pub struct ModelResources {
    /// Model weights resource
    pub model_resource: Box<dyn ResourceProvider>,
    /// Model configuration resource
    pub config_resource: Box<dyn ResourceProvider>,
    /// Tokenizer vocabulary resource
    pub vocab_resource: Box<dyn ResourceProvider>,
}

impl ModelResources {
    /// Declares the resources of a model. Nothing is looked up or downloaded.
    ///
    /// # Arguments
    ///
    /// * `spec` - model reference; a `local_dir` yields local resources, remote ones otherwise
    /// * `cache_root` - cache root for remote resources
    pub fn from_spec(spec: &ModelSpec, cache_root: &Path) -> ModelResources {
        let resource = |file_name: &str| -> Box<dyn ResourceProvider> {
            match &spec.local_dir {
                Some(local_dir) => Box::new(LocalResource::from(local_dir.join(file_name))),
                None => Box::new(
                    RemoteResource::from_pretrained((
                        spec.name.as_str(),
                        spec.file_url(file_name).as_str(),
                    ))
                    .with_cache_root(cache_root),
                ),
            }
        };
        ModelResources {
            model_resource: resource(WEIGHTS_FILE),
            config_resource: resource(CONFIG_FILE),
            vocab_resource: resource(VOCAB_FILE),
        }
    }
}

/// # Local paths of the model files
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub config_path: PathBuf,
    pub vocab_path: PathBuf,
}

/// Makes sure all model files are available locally.
///
/// # Arguments
///
/// * `resources` - model resources to acquire
/// * `allow_download` - missing resources may be provisioned. When `false`, a missing resource is
///   a `ResourceNotFound` error.
pub fn ensure_model_files(
    resources: &ModelResources,
    allow_download: bool,
) -> Result<ModelFiles, PosTaggerError> {
    Ok(ModelFiles {
        model_path: locate(resources.model_resource.as_ref(), allow_download)?,
        config_path: locate(resources.config_resource.as_ref(), allow_download)?,
        vocab_path: locate(resources.vocab_resource.as_ref(), allow_download)?,
    })
}

fn locate(
    resource: &dyn ResourceProvider,
    allow_download: bool,
) -> Result<PathBuf, PosTaggerError> {
    let path = if allow_download {
        resource.get_local_path()?
    } else {
        resource.find_local()?.ok_or_else(|| {
            PosTaggerError::ResourceNotFound(format!(
                "{} (downloads are disabled)",
                resource.describe()
            ))
        })?
    };
    debug!("{} -> {}", resource.describe(), path.display());
    Ok(path)
}

/// Builds a ready-to-use `POSModel`, downloading the model files first if needed.
///
/// # Arguments
///
/// * `config` - `TaggerConfig` describing the model, device, tag set and cache location
///
/// # Example
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use pos_tagger::common::config::TaggerConfig;
/// use pos_tagger::pipelines::environment::prepare_model;
///
/// let pos_model = prepare_model(&TaggerConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn prepare_model(config: &TaggerConfig) -> Result<POSModel, PosTaggerError> {
    check_device(config.device)?;
    let files = prepare_files(config)?;
    info!("Loading model {}", config.model.name);
    POSModel::new(POSConfig {
        model_path: files.model_path,
        config_path: files.config_path,
        vocab_path: files.vocab_path,
        lower_case: config.model.lower_case,
        strip_accents: config.model.strip_accents,
        device: config.device.into(),
        tagset: config.tagset,
    })
}

/// Fails when CUDA is requested but the linked libtorch has no CUDA support.
pub fn check_device(device: DeviceOption) -> Result<(), PosTaggerError> {
    if (device == DeviceOption::Cuda) & !Cuda::is_available() {
        return Err(PosTaggerError::InvalidConfigurationError(
            "CUDA device requested but libtorch reports no CUDA support".to_string(),
        ));
    }
    Ok(())
}

/// Pre-flight step: validates the configuration and makes the model files available locally
/// without loading the model.
pub fn prepare_files(config: &TaggerConfig) -> Result<ModelFiles, PosTaggerError> {
    config.validate()?;
    if !config.model.is_pinned() {
        warn!(
            "model revision `{}` is not a commit hash, downloaded files follow the repository",
            config.model.revision
        );
    }
    let resources = ModelResources::from_spec(&config.model, &config.cache_root());
    ensure_model_files(&resources, config.allow_download)
}
