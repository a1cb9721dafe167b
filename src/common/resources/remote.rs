use super::*;
use crate::common::error::PosTaggerError;
use cached_path::{Cache, Options, ProgressBar};
use dirs::cache_dir;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Remote resource that will be downloaded and cached locally on demand
#[derive(PartialEq, Clone, Debug)]
pub struct RemoteResource {
    /// Remote path/url for the resource
    pub url: String,
    /// Local subdirectory of the cache root where this resource is saved
    pub cache_subdir: String,
    /// Root of the local cache
    pub cache_root: PathBuf,
}

impl RemoteResource {
    /// Creates a new RemoteResource from an URL and a custom local path. Note that this does not
    /// download the resource (only declares the remote and local locations)
    ///
    /// # Arguments
    ///
    /// * `url` - `&str` Location of the remote resource
    /// * `cache_subdir` - `&str` Local subdirectory of the cache root to save the resource to
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pos_tagger::common::resources::RemoteResource;
    /// let config_resource = RemoteResource::new("http://config_json_location", "configs");
    /// ```
    pub fn new(url: &str, cache_subdir: &str) -> RemoteResource {
        RemoteResource {
            url: url.to_string(),
            cache_subdir: cache_subdir.to_string(),
            cache_root: default_cache_directory(),
        }
    }

    /// Creates a new RemoteResource from a `(cache subdirectory, url)` tuple.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pos_tagger::common::resources::RemoteResource;
    /// let model_resource = RemoteResource::from_pretrained((
    ///     "mobilebert-finetuned-pos",
    ///     "https://huggingface.co/mrm8488/mobilebert-finetuned-pos/resolve/main/rust_model.ot",
    /// ));
    /// ```
    pub fn from_pretrained(name_url_tuple: (&str, &str)) -> RemoteResource {
        RemoteResource::new(name_url_tuple.1, name_url_tuple.0)
    }

    /// Stores the resource under another cache root
    pub fn with_cache_root<P: Into<PathBuf>>(mut self, cache_root: P) -> RemoteResource {
        self.cache_root = cache_root.into();
        self
    }

    fn cache(&self, offline: bool) -> Result<Cache, PosTaggerError> {
        let progress_bar = if offline {
            None
        } else {
            Some(ProgressBar::Light)
        };
        Ok(Cache::builder()
            .dir(self.cache_root.clone())
            .progress_bar(progress_bar)
            .offline(offline)
            .build()?)
    }

    fn options(&self) -> Options {
        Options::default().subdir(&self.cache_subdir)
    }
}

impl ResourceProvider for RemoteResource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    /// Looks for a cached copy of the resource without contacting the remote.
    fn find_local(&self) -> Result<Option<PathBuf>, PosTaggerError> {
        match self
            .cache(true)?
            .cached_path_with_options(&self.url, &self.options())
        {
            Ok(path) => {
                debug!("{} cached at {}", self.url, path.display());
                Ok(Some(path))
            }
            Err(cached_path::Error::NoCachedVersions(_)) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Downloads the resource into the cache.
    fn provision(&self) -> Result<(), PosTaggerError> {
        info!("Downloading {}", self.url);
        self.cache(false)?
            .cached_path_with_options(&self.url, &self.options())?;
        Ok(())
    }
}

/// # Default cache directory
/// If the environment variable `POS_TAGGER_CACHE` is set, model files are cached at that
/// location. Otherwise defaults to `$XDG_CACHE_HOME/pos-tagger`, or corresponding user cache for
/// the current system.
pub fn default_cache_directory() -> PathBuf {
    match std::env::var("POS_TAGGER_CACHE") {
        Ok(value) => PathBuf::from(value),
        Err(_) => {
            let mut home = cache_dir().unwrap_or_else(std::env::temp_dir);
            home.push("pos-tagger");
            home
        }
    }
}
