//! Upload helpers shared by the content services

use platform::media::{MediaStore, MediaUpload, UploadedAsset};

use crate::error::ClubResult;

/// Upload every file in order; on the first failure the assets already
/// stored are removed again and the error is returned.
pub(crate) async fn upload_all<M>(media: &M, files: Vec<MediaUpload>) -> ClubResult<Vec<UploadedAsset>>
where
    M: MediaStore + Sync,
{
    let mut stored = Vec::with_capacity(files.len());

    for file in files {
        match media.upload(file).await {
            Ok(asset) => stored.push(asset),
            Err(e) => {
                discard(media, &stored).await;
                return Err(e.into());
            }
        }
    }

    Ok(stored)
}

/// Best-effort removal of assets whose record was never written
pub(crate) async fn discard<M>(media: &M, assets: &[UploadedAsset])
where
    M: MediaStore + Sync,
{
    for asset in assets {
        if let Err(e) = media.delete(&asset.external_id).await {
            tracing::warn!(external_id = %asset.external_id, error = %e, "Orphaned asset left behind");
        }
    }
}
