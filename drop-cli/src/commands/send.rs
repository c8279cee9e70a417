//! Send a file through the relay.

use anyhow::{bail, Context, Result};
use drop_client::{PendingSend, RelayClient};
use std::path::Path;
use tokio::fs::File;

/// Run the send command.
///
/// Prints the secret on stdout, then blocks until the receiver has the
/// whole file.
pub async fn run(client: &RelayClient, path: &Path) -> Result<()> {
    let (pending, file, size) = offer(client, path).await?;

    println!("{}", pending.secret());
    eprintln!("Waiting for the receiver to fetch {} bytes...", size);

    pending.send(file).await.context("Transfer failed")?;
    eprintln!("Sent {}", path.display());
    Ok(())
}

/// Open `path` and register an offer for it under its file name.
pub async fn offer(client: &RelayClient, path: &Path) -> Result<(PendingSend, File, u64)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} does not name a file", path.display()))?;

    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let metadata = file
        .metadata()
        .await
        .with_context(|| format!("Failed to read metadata of {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a regular file", path.display());
    }

    let pending = client
        .offer(&name)
        .await
        .context("Failed to create offer")?;
    Ok((pending, file, metadata.len()))
}
