//! The rendezvous engine.
//!
//! Pairs a sender's request body with a receiver's response body by secret
//! and copies bytes between them.
//!
//! ```text
//! POST /file ──► create_offer ──► OfferTable (Pending)
//!
//! GET  /file/x ──► receive ──► duplex pipe ──┬─ write half ─► handoff slot
//!                                            └─ read half ──► response body
//!
//! PUT  /file/x ──► send ──► handoff slot ──► copy(request body ─► write half)
//!                                        ──► wait until the body drained
//! ```
//!
//! The sender is answered only after the receiver's body has read past the
//! last byte, so a receiver that hangs up early fails the upload.
//!
//! Memory per transfer is one copy buffer plus the pipe capacity, whatever
//! the payload size.

use crate::config::OffersConfig;
use crate::error::{CopyError, RelayError, Result};
use crate::offer::{wait_for_state, AttachError, Offer, OfferState, Outcome, ReceiverPipe};
use crate::server::RelayMetrics;
use crate::table::OfferTable;
use bytes::Bytes;
use drop_types::Secret;
use futures_util::{future, stream, Stream, StreamExt};
use std::io;
use std::net::IpAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::sync::{oneshot, watch};
use tokio_util::io::ReaderStream;

/// Offer creation, send and receive.
#[derive(Debug)]
pub struct Rendezvous {
    table: OfferTable,
    config: OffersConfig,
    metrics: Arc<RelayMetrics>,
}

impl Rendezvous {
    /// Create an engine over `table`.
    pub fn new(table: OfferTable, config: OffersConfig, metrics: Arc<RelayMetrics>) -> Self {
        Self {
            table,
            config,
            metrics,
        }
    }

    /// The offer table.
    pub fn table(&self) -> &OfferTable {
        &self.table
    }

    /// Register an offer and return its secret.
    pub fn create_offer(&self, filename: String, origin: Option<IpAddr>) -> Result<Secret> {
        if filename.len() > self.config.max_filename_len {
            return Err(RelayError::InvalidRequest {
                reason: format!(
                    "filename hint is {} bytes, limit is {}",
                    filename.len(),
                    self.config.max_filename_len
                ),
            });
        }

        let offer = self.table.create(filename, origin)?;
        self.metrics.offers_created.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            "Offer {} created ({} live)",
            offer.secret().redacted(),
            self.table.len()
        );
        Ok(offer.secret().clone())
    }

    /// Stream `body` to the receiver of the offer registered under `secret`.
    ///
    /// Waits for a receiver until the offer's deadline, then copies until
    /// `body` ends and the receiver has read all of it. Returns the number
    /// of bytes relayed.
    pub async fn send<R>(
        &self,
        secret: &Secret,
        origin: Option<IpAddr>,
        body: &mut R,
    ) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let offer = self.lookup(secret)?;

        if self.config.require_same_origin && offer.origin().is_some() && offer.origin() != origin {
            tracing::debug!(
                "Send for {} from {:?} does not match origin {:?}",
                secret.redacted(),
                origin,
                offer.origin()
            );
            self.record_not_found();
            return Err(RelayError::NotFound);
        }

        let Some(handoff) = offer.claim_sender() else {
            tracing::debug!("Send for {} rejected: sender already claimed", secret.redacted());
            self.record_not_found();
            return Err(RelayError::NotFound);
        };

        let mut lifecycle = offer.subscribe();
        let pipe = tokio::select! {
            received = handoff => received.ok(),
            _ = wait_for_state(&mut lifecycle, |s| *s == OfferState::Expired) => None,
        };
        let Some(pipe) = pipe else {
            tracing::info!("Sender for {} gave up: no receiver", secret.redacted());
            return Err(RelayError::Timeout);
        };
        if !offer.try_match() {
            // Deadline won the race against the handoff.
            return Err(RelayError::Timeout);
        }
        tracing::info!("Offer {} matched, streaming", secret.redacted());

        let mut transfer = Transfer::new(Arc::clone(&offer), pipe);
        let mut buffer = vec![0u8; self.config.copy_buffer_size];
        let copied = match pump(body, &mut transfer.pipe.writer, &mut buffer).await {
            Ok(bytes) => transfer.drained().await.map(|()| bytes),
            Err(e) => Err(e),
        };

        let result = match copied {
            Ok(bytes) => {
                transfer.finish(Outcome::Delivered);
                self.metrics.transfers_completed.fetch_add(1, Ordering::Relaxed);
                self.metrics.bytes_relayed.fetch_add(bytes, Ordering::Relaxed);
                tracing::info!("Offer {} delivered {} bytes", secret.redacted(), bytes);
                Ok(bytes)
            }
            Err(e) => {
                transfer.finish(Outcome::Failed);
                self.metrics.transfers_failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Offer {} failed: {}", secret.redacted(), e);
                Err(RelayError::from(e))
            }
        };

        self.table.retire(&offer);
        result
    }

    /// Attach a receiver to the offer registered under `secret`.
    ///
    /// Resolves once a sender starts streaming. Every way of not getting the
    /// file before headers are sent is [`RelayError::NotFound`].
    pub async fn receive(&self, secret: &Secret) -> Result<Download> {
        let offer = self.lookup(secret)?;

        let (pipe, reader, drained) = ReceiverPipe::new(self.config.pipe_capacity);
        let mut lifecycle = offer.subscribe();

        if let Err(e) = offer.attach_receiver(pipe) {
            match e {
                AttachError::AlreadyClaimed => tracing::debug!(
                    "Receive for {} rejected: receiver already claimed",
                    secret.redacted()
                ),
                AttachError::Closed => {
                    tracing::debug!("Receive for {} rejected: offer closed", secret.redacted())
                }
            }
            self.record_not_found();
            return Err(RelayError::NotFound);
        }

        match wait_for_state(&mut lifecycle, |s| *s != OfferState::Pending).await {
            OfferState::Matched => Ok(Download {
                filename: offer.filename().to_owned(),
                reader,
                drained,
                lifecycle,
            }),
            state => {
                tracing::debug!("Receiver for {} released: {:?}", secret.redacted(), state);
                Err(RelayError::NotFound)
            }
        }
    }

    fn lookup(&self, secret: &Secret) -> Result<Arc<Offer>> {
        self.table.find(secret).ok_or_else(|| {
            tracing::debug!("No live offer for {}", secret.redacted());
            self.record_not_found();
            RelayError::NotFound
        })
    }

    fn record_not_found(&self) {
        self.metrics.lookups_not_found.fetch_add(1, Ordering::Relaxed);
    }
}

/// A matched receiver's view of the transfer.
#[derive(Debug)]
pub struct Download {
    filename: String,
    reader: DuplexStream,
    drained: oneshot::Sender<()>,
    lifecycle: watch::Receiver<OfferState>,
}

impl Download {
    /// The sender's filename hint.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The payload as a byte stream.
    ///
    /// Reaching the end of the pipe tells the sender its bytes were read;
    /// dropping the stream before that fails the transfer. After the last
    /// byte the stream waits for the transfer's verdict and ends with an
    /// error unless every byte was delivered, so a failed copy never looks
    /// like a short file.
    pub fn into_stream(self) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
        let Self {
            reader,
            drained,
            mut lifecycle,
            ..
        } = self;

        let verdict = stream::once(async move {
            // The sender may already have given up; its verdict follows anyway.
            let _ = drained.send(());
            match wait_for_state(&mut lifecycle, OfferState::is_terminal).await {
                OfferState::Done(Outcome::Delivered) => None,
                state => Some(Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("transfer aborted ({state:?})"),
                ))),
            }
        })
        .filter_map(future::ready);

        ReaderStream::new(reader).chain(verdict)
    }
}

/// Sender side of a matched transfer.
///
/// Dropping it without [`finish`](Self::finish) records a failed transfer, so
/// a sender task cancelled mid-copy still releases its receiver with an error.
struct Transfer {
    offer: Arc<Offer>,
    pipe: ReceiverPipe,
}

impl Transfer {
    fn new(offer: Arc<Offer>, pipe: ReceiverPipe) -> Self {
        Self { offer, pipe }
    }

    /// Wait for the receiver's body to read everything written so far.
    async fn drained(&mut self) -> std::result::Result<(), CopyError> {
        (&mut self.pipe.drained)
            .await
            .map_err(|_| CopyError::Undelivered)
    }

    /// Record the outcome. The receiver's stream closes when `self` drops,
    /// after the outcome is visible.
    fn finish(self, outcome: Outcome) {
        self.offer.complete(outcome);
    }
}

impl Drop for Transfer {
    fn drop(&mut self) {
        if self.offer.complete(Outcome::Failed) {
            tracing::warn!(
                "Offer {} abandoned mid-transfer",
                self.offer.secret().redacted()
            );
        }
    }
}

/// Copy `source` into `sink` through `buffer`, then close `sink` for writing
/// so its reader sees the end.
async fn pump<R>(
    source: &mut R,
    sink: &mut DuplexStream,
    buffer: &mut [u8],
) -> std::result::Result<u64, CopyError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut total = 0u64;
    loop {
        let n = source.read(buffer).await.map_err(CopyError::Sender)?;
        if n == 0 {
            break;
        }
        sink.write_all(&buffer[..n])
            .await
            .map_err(CopyError::Receiver)?;
        total += n as u64;
    }
    sink.shutdown().await.map_err(CopyError::Receiver)?;
    Ok(total)
}
