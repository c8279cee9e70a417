//! RelayClient - speaks the relay's HTTP protocol.
//!
//! # Example
//!
//! ```ignore
//! use drop_client::RelayClient;
//!
//! // Sender
//! let client = RelayClient::new("relay.example.com:8080", false)?;
//! let pending = client.offer("notes.txt").await?;
//! println!("secret: {}", pending.secret());
//! pending.send(tokio::fs::File::open("notes.txt").await?).await?;
//!
//! // Receiver
//! let incoming = client.receive(&"fast-blue-began".parse()?).await?;
//! let mut file = tokio::fs::File::create(incoming.safe_filename()?).await?;
//! incoming.write_to(&mut file).await?;
//! ```

use crate::error::ClientError;
use drop_types::protocol::{parse_offer_response, transfer_path, FILENAME_HEADER, OFFER_PATH};
use drop_types::{sanitize_filename, Secret};
use reqwest::header::HeaderValue;
use reqwest::{Response, Url};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;

const HTTPS: &str = "https://";
const HTTP: &str = "http://";

/// Client for one relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base: String,
    http: reqwest::Client,
}

impl RelayClient {
    /// Create a client for the relay at `addr`.
    ///
    /// A bare `host:port` is reached over HTTPS; an explicit `http://` or
    /// `https://` prefix is used as given. `insecure` skips certificate
    /// verification, for relays with self-signed certificates.
    pub fn new(addr: &str, insecure: bool) -> Result<Self, ClientError> {
        let base = base_url(addr)?;
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { base, http })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Register an offer for a file called `filename`.
    ///
    /// Returns as soon as the relay has issued a secret; the upload happens
    /// in [`PendingSend::send`].
    pub async fn offer(&self, filename: &str) -> Result<PendingSend, ClientError> {
        let hint = HeaderValue::from_bytes(filename.as_bytes())
            .map_err(|_| ClientError::InvalidFilename(filename.to_string()))?;

        let response = self
            .http
            .post(format!("{}{}", self.base, OFFER_PATH))
            .header(FILENAME_HEADER, hint)
            .send()
            .await?;
        let body = check(response)?.text().await?;

        let secret = parse_offer_response(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("expected a secret, got {body:?} ({e})"))
        })?;
        tracing::debug!("Relay issued secret for {:?}", filename);

        Ok(PendingSend {
            http: self.http.clone(),
            url: format!("{}{}", self.base, transfer_path(&secret)),
            secret,
        })
    }

    /// Claim the file offered under `secret`.
    ///
    /// Returns once the sender has started streaming.
    pub async fn receive(&self, secret: &Secret) -> Result<Incoming, ClientError> {
        let response = self
            .http
            .get(format!("{}{}", self.base, transfer_path(secret)))
            .send()
            .await?;
        let response = check(response)?;

        let suggested_filename = response
            .headers()
            .get(FILENAME_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();

        Ok(Incoming {
            suggested_filename,
            response,
        })
    }
}

/// An offer waiting for its upload.
#[derive(Debug)]
pub struct PendingSend {
    http: reqwest::Client,
    url: String,
    secret: Secret,
}

impl PendingSend {
    /// The secret to hand to the receiver.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Stream `reader` to the receiver.
    ///
    /// Resolves when the relay reports that the receiver got every byte.
    pub async fn send<R>(self, reader: R) -> Result<(), ClientError>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        let body = reqwest::Body::wrap_stream(ReaderStream::new(reader));
        let response = self.http.put(&self.url).body(body).send().await?;
        check(response)?;
        Ok(())
    }
}

/// A file being received.
#[derive(Debug)]
pub struct Incoming {
    suggested_filename: String,
    response: Response,
}

impl Incoming {
    /// The sender's filename hint, exactly as received. Untrusted.
    pub fn suggested_filename(&self) -> &str {
        &self.suggested_filename
    }

    /// A local filename derived from the hint with directory components
    /// stripped.
    pub fn safe_filename(&self) -> Result<String, ClientError> {
        sanitize_filename(&self.suggested_filename)
            .ok_or_else(|| ClientError::InvalidFilename(self.suggested_filename.clone()))
    }

    /// Copy the file into `writer`. Returns the number of bytes written.
    ///
    /// Fails if the relay aborts the body, so a partial file is never
    /// reported as complete.
    pub async fn write_to<W>(mut self, writer: &mut W) -> Result<u64, ClientError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut total = 0u64;
        loop {
            let chunk = self
                .response
                .chunk()
                .await
                .map_err(|e| ClientError::TransferFailed(format!("body interrupted: {e}")))?;
            let Some(chunk) = chunk else { break };
            writer.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(total)
    }
}

fn check(response: Response) -> Result<Response, ClientError> {
    match ClientError::from_status(response.status()) {
        Some(e) => Err(e),
        None => Ok(response),
    }
}

fn base_url(addr: &str) -> Result<String, ClientError> {
    let addr = addr.trim();
    let base = if addr.starts_with(HTTPS) || addr.starts_with(HTTP) {
        addr.to_string()
    } else if addr.contains("://") {
        return Err(ClientError::InvalidAddress(format!(
            "{addr}: only http and https are supported"
        )));
    } else {
        format!("{HTTPS}{addr}")
    };

    let url =
        Url::parse(&base).map_err(|e| ClientError::InvalidAddress(format!("{addr:?}: {e}")))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ClientError::InvalidAddress(format!("{addr:?}: missing host")));
    }
    Ok(base.trim_end_matches('/').to_string())
}
