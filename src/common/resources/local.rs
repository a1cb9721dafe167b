use crate::common::error::PosTaggerError;
use crate::common::resources::ResourceProvider;
use std::path::PathBuf;

/// # Local resource
#[derive(PartialEq, Clone, Debug)]
pub struct LocalResource {
    /// Local path for the resource
    pub local_path: PathBuf,
}

impl ResourceProvider for LocalResource {
    fn describe(&self) -> String {
        self.local_path.display().to_string()
    }

    /// Gets the path for a local resource if the file exists.
    fn find_local(&self) -> Result<Option<PathBuf>, PosTaggerError> {
        Ok(self
            .local_path
            .is_file()
            .then(|| self.local_path.clone()))
    }

    /// Local resources cannot be fetched from anywhere.
    fn provision(&self) -> Result<(), PosTaggerError> {
        Err(PosTaggerError::ResourceNotFound(self.describe()))
    }
}

impl From<PathBuf> for LocalResource {
    fn from(local_path: PathBuf) -> Self {
        Self { local_path }
    }
}
