use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    hosts::{DestinationHost, HostError, SourceHost},
    release::{Asset, AssetUpload},
};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to download asset '{name}': {source}")]
    Download {
        name: String,
        #[source]
        source: HostError,
    },
    #[error("failed to upload asset '{name}': {source}")]
    Upload {
        name: String,
        #[source]
        source: HostError,
    },
}

/**
    Reproduces one asset on the destination release with the given id.

    The full contents are held in memory only for the duration of the
    transfer. Nothing is retried, and no partial transfer is resumed.

    Returns the number of bytes transferred.

    # Errors

    - If the asset could not be downloaded from the source host.
    - If the asset could not be uploaded to the destination host.
*/
#[instrument(skip(source, destination, asset), fields(name = %asset.name), level = "debug")]
pub async fn transfer_asset<S, D>(
    source: &S,
    destination: &D,
    release_id: u64,
    asset: &Asset,
) -> Result<usize, TransferError>
where
    S: SourceHost + ?Sized,
    D: DestinationHost + ?Sized,
{
    let contents = source
        .download_asset(asset)
        .await
        .map_err(|e| TransferError::Download {
            name: asset.name.clone(),
            source: e,
        })?;

    let size = contents.len();
    debug!(size, "downloaded asset, uploading");

    let upload = AssetUpload {
        name: &asset.name,
        content_type: &asset.content_type,
        contents,
    };
    destination
        .attach_asset(release_id, upload)
        .await
        .map_err(|e| TransferError::Upload {
            name: asset.name.clone(),
            source: e,
        })?;

    Ok(size)
}
