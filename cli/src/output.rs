use std::path::{Path, PathBuf};

/// Fixed name of the written cover file.
pub const COVER_FILENAME: &str = "cover.jpg";

/// Writes `bytes` to `<target>/cover.jpg`, creating `target` if needed.
pub async fn save_cover(target: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(target).await?;
    let path = target.join(COVER_FILENAME);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
