//! # Resource definitions for model weights, vocabularies and configuration files
//!
//! The tagger relies on the concept of Resources to access the files used by the model:
//! - model weights
//! - configuration file
//! - vocabulary
//!
//! Two types of resources are pre-defined:
//! - LocalResource: points to a local file
//! - RemoteResource: points to a remote file via a URL, cached locally once downloaded
//!
//! A resource is first looked up locally (`find_local`), which never touches the network. Only
//! when it is absent is it provisioned (`provision`), after which the lookup is attempted once
//! more. `get_local_path` chains both steps through `acquire_or_provision`.

mod local;
mod remote;

use crate::common::error::PosTaggerError;
pub use local::LocalResource;
pub use remote::{default_cache_directory, RemoteResource};
use std::path::PathBuf;
use tracing::info;

/// # Resource Trait that can provide the location of the model, configuration or vocabulary resources
pub trait ResourceProvider {
    /// Human readable location of the resource, used in diagnostics
    fn describe(&self) -> String;

    /// Looks the resource up on the local filesystem only.
    ///
    /// # Returns
    ///
    /// * `Option<PathBuf>` pointing to the resource file, `None` if it is not available locally
    fn find_local(&self) -> Result<Option<PathBuf>, PosTaggerError>;

    /// Makes the resource available locally (for example by downloading it).
    fn provision(&self) -> Result<(), PosTaggerError>;

    /// Provides the local path for a resource, provisioning it first if it is absent.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pos_tagger::common::resources::{LocalResource, ResourceProvider};
    /// use std::path::PathBuf;
    /// let config_resource = LocalResource {
    ///     local_path: PathBuf::from("path/to/config.json"),
    /// };
    /// let config_path = config_resource.get_local_path();
    /// ```
    fn get_local_path(&self) -> Result<PathBuf, PosTaggerError> {
        acquire_or_provision(
            &self.describe(),
            || self.find_local(),
            || self.provision(),
        )
    }
}

/// Acquires a capability, provisioning it once if it is not available yet.
///
/// `acquire` is called first. If it yields `None`, `provision` runs exactly once and `acquire`
/// is retried exactly once. Errors from either step are returned as is.
///
/// # Arguments
///
/// * `what` - description of the capability, used in diagnostics
/// * `acquire` - side-effect free lookup of the capability
/// * `provision` - one-time side effect making the capability available
pub fn acquire_or_provision<T, A, P>(
    what: &str,
    acquire: A,
    provision: P,
) -> Result<T, PosTaggerError>
where
    A: Fn() -> Result<Option<T>, PosTaggerError>,
    P: FnOnce() -> Result<(), PosTaggerError>,
{
    if let Some(value) = acquire()? {
        return Ok(value);
    }
    info!("{what} not found locally, provisioning");
    provision()?;
    acquire()?.ok_or_else(|| {
        PosTaggerError::ProvisioningError(format!("{what} still unavailable after provisioning"))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn present_capability_is_not_provisioned() -> anyhow::Result<()> {
        let provisioned = Cell::new(false);
        let value = acquire_or_provision(
            "answer",
            || Ok(Some(42)),
            || {
                provisioned.set(true);
                Ok(())
            },
        )?;
        assert_eq!(value, 42);
        assert!(!provisioned.get());
        Ok(())
    }

    #[test]
    fn absent_capability_is_provisioned_then_acquired() -> anyhow::Result<()> {
        let available = Cell::new(false);
        let lookups = Cell::new(0);
        let value = acquire_or_provision(
            "answer",
            || {
                lookups.set(lookups.get() + 1);
                Ok(available.get().then_some(42))
            },
            || {
                available.set(true);
                Ok(())
            },
        )?;
        assert_eq!(value, 42);
        assert_eq!(lookups.get(), 2);
        Ok(())
    }

    #[test]
    fn acquisition_is_retried_once() {
        let lookups = Cell::new(0);
        let result: Result<u8, _> = acquire_or_provision(
            "answer",
            || {
                lookups.set(lookups.get() + 1);
                Ok(None)
            },
            || Ok(()),
        );
        assert!(matches!(result, Err(PosTaggerError::ProvisioningError(_))));
        assert_eq!(lookups.get(), 2);
    }

    #[test]
    fn provisioning_failure_propagates() {
        let lookups = Cell::new(0);
        let result: Result<u8, _> = acquire_or_provision(
            "answer",
            || {
                lookups.set(lookups.get() + 1);
                Ok(None)
            },
            || Err(PosTaggerError::FileDownloadError("offline".to_string())),
        );
        assert!(matches!(result, Err(PosTaggerError::FileDownloadError(_))));
        assert_eq!(lookups.get(), 1);
    }
}
