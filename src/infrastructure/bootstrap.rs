use tracing::{error, info};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::UploadStore;
use crate::interfaces::http::HttpState;

/// Prepare the upload directory and wire the use cases behind the HTTP layer.
pub fn setup(config: &Config) -> Result<HttpState> {
    let store = UploadStore::open(&config.upload_dir).map_err(|err| {
        error!(
            error = %err,
            upload_dir = %config.upload_dir.display(),
            "Failed to create upload dir"
        );
        AppError::from(err)
    })?;

    info!(
        upload_dir = %store.root().display(),
        chart_format = ?config.chart_format,
        histogram_bins = config.histogram_bins,
        "Upload store ready"
    );

    Ok(HttpState::new(config, store))
}
