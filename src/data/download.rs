use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};

/// Downloads the similarity artifact if it is not already on disk
///
/// The artifact is large, so the body is streamed straight to a `.part` file
/// and renamed on completion; an interrupted download never passes for a
/// complete artifact. Progress is logged at 10% intervals when the server
/// reports a content length.
pub async fn ensure_artifact(
    http_client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> AppResult<()> {
    if tokio::fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "Artifact already present, skipping download");
        return Ok(());
    }

    tracing::info!(url = %url, path = %path.display(), "Downloading similarity artifact");

    let response = http_client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::ExternalApi(format!(
            "Artifact download returned status {}",
            status
        )));
    }

    let total_size = response.content_length().unwrap_or(0);

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let partial_path = path.with_extension("part");
    let mut file = tokio::fs::File::create(&partial_path).await?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut last_reported_pct: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if total_size > 0 {
            let pct = downloaded * 100 / total_size;
            if pct >= last_reported_pct + 10 {
                last_reported_pct = pct - pct % 10;
                tracing::info!(
                    pct = last_reported_pct,
                    downloaded_bytes = downloaded,
                    total_bytes = total_size,
                    "Download progress"
                );
            }
        }
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&partial_path, path).await?;

    tracing::info!(
        bytes = downloaded,
        path = %path.display(),
        "Similarity artifact downloaded"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_ensure_artifact_skips_download_when_present() {
        let path = std::env::temp_dir().join(format!("cinematch-test-{}.json", Uuid::new_v4()));
        tokio::fs::write(&path, "[[1.0]]").await.unwrap();

        // The URL is unreachable; this only passes because no request is made.
        let client = reqwest::Client::new();
        let result = ensure_artifact(&client, "http://127.0.0.1:1/similarity.json", &path).await;

        assert!(result.is_ok());
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "[[1.0]]");

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
