//! Receive a file through the relay.

use anyhow::{anyhow, Context, Result};
use drop_client::{RelayClient, Secret};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};

/// Run the receive command.
pub async fn run(client: &RelayClient, secret: &str, dest_dir: &Path, force: bool) -> Result<()> {
    let secret: Secret = secret.parse().context("Invalid secret")?;

    let (path, bytes) = fetch(client, &secret, dest_dir, force).await?;
    eprintln!("Received {} ({} bytes)", path.display(), bytes);
    Ok(())
}

/// Receive the file offered under `secret` into `dest_dir`.
///
/// The file is named after the sender's hint with any directory components
/// stripped. A partially written file is removed if the transfer fails.
pub async fn fetch(
    client: &RelayClient,
    secret: &Secret,
    dest_dir: &Path,
    force: bool,
) -> Result<(PathBuf, u64)> {
    tokio::fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

    let incoming = client
        .receive(secret)
        .await
        .context("Failed to receive")?;
    let name = incoming
        .safe_filename()
        .context("Sender suggested an unusable filename")?;

    let path = dest_dir.join(name);
    let mut file = create_target(&path, force).await?;

    match incoming.write_to(&mut file).await {
        Ok(bytes) => {
            file.sync_all()
                .await
                .with_context(|| format!("Failed to flush {}", path.display()))?;
            Ok((path, bytes))
        }
        Err(e) => {
            drop(file);
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove partial file {}: {}", path.display(), rm);
            }
            Err(e).context("Transfer interrupted")
        }
    }
}

/// Open the destination, refusing to clobber an existing file unless `force`.
async fn create_target(path: &Path, force: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    options.open(path).await.map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            anyhow!("{} already exists (use --force to overwrite)", path.display())
        } else {
            anyhow::Error::new(e).context(format!("Failed to create {}", path.display()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::LocalRelay;
    use std::io::Cursor;
    use tempfile::tempdir;

    async fn offer(relay: &LocalRelay, name: &str, data: &[u8]) -> (Secret, tokio::task::JoinHandle<()>) {
        let pending = relay.client.offer(name).await.unwrap();
        let secret = pending.secret().clone();
        let data = data.to_vec();
        let sender = tokio::spawn(async move {
            // The receiver may refuse the file; the sender's outcome is not under test.
            let _ = pending.send(Cursor::new(data)).await;
        });
        (secret, sender)
    }

    #[tokio::test]
    async fn receives_into_a_new_directory() {
        let relay = LocalRelay::start().await;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("incoming").join("today");

        let (secret, sender) = offer(&relay, "photo.jpg", b"jpeg bytes").await;
        let (path, bytes) = fetch(&relay.client, &secret, &dest, false).await.unwrap();
        sender.await.unwrap();

        assert_eq!(path, dest.join("photo.jpg"));
        assert_eq!(bytes, 10);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"jpeg bytes");
        relay.stop().await;
    }

    #[tokio::test]
    async fn directory_components_are_stripped() {
        let relay = LocalRelay::start().await;
        let dir = tempdir().unwrap();

        let (secret, sender) = offer(&relay, "../../../etc/cron.d/evil", b"nope").await;
        let (path, _) = fetch(&relay.client, &secret, dir.path(), false).await.unwrap();
        sender.await.unwrap();

        assert_eq!(path, dir.path().join("evil"));
        relay.stop().await;
    }

    #[tokio::test]
    async fn existing_file_is_not_overwritten() {
        let relay = LocalRelay::start().await;
        let dir = tempdir().unwrap();
        let existing = dir.path().join("report.txt");
        tokio::fs::write(&existing, b"keep me").await.unwrap();

        let (secret, sender) = offer(&relay, "report.txt", b"new contents").await;
        let err = fetch(&relay.client, &secret, dir.path(), false)
            .await
            .unwrap_err();
        sender.await.unwrap();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(tokio::fs::read(&existing).await.unwrap(), b"keep me");
        relay.stop().await;
    }

    #[tokio::test]
    async fn force_overwrites() {
        let relay = LocalRelay::start().await;
        let dir = tempdir().unwrap();
        let existing = dir.path().join("report.txt");
        tokio::fs::write(&existing, b"old and much longer contents").await.unwrap();

        let (secret, sender) = offer(&relay, "report.txt", b"new").await;
        fetch(&relay.client, &secret, dir.path(), true).await.unwrap();
        sender.await.unwrap();

        assert_eq!(tokio::fs::read(&existing).await.unwrap(), b"new");
        relay.stop().await;
    }

    #[tokio::test]
    async fn unknown_secret_fails() {
        let relay = LocalRelay::start().await;
        let dir = tempdir().unwrap();

        let secret = Secret::parse("nobody-sent-this").unwrap();
        let err = fetch(&relay.client, &secret, dir.path(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to receive"));
        relay.stop().await;
    }

    #[tokio::test]
    async fn malformed_secret_is_rejected_before_contacting_relay() {
        let client = RelayClient::new("http://127.0.0.1:9", false).unwrap();
        let dir = tempdir().unwrap();

        let err = run(&client, "not a secret!", dir.path(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid secret"));
    }
}
