//! A registered transfer and its single-use rendezvous primitives.
//!
//! Each [`Offer`] carries:
//! - a **handoff slot**: a capacity-one `oneshot` channel. The receiver side
//!   writes its [`ReceiverPipe`] into it, the sender side reads it. Each end
//!   can be claimed once, so two receivers can never attach to one sender and
//!   vice versa.
//! - a **lifecycle channel**: a `watch` channel holding the [`OfferState`].
//!   Transitions are compare-and-set under the channel's lock, which makes
//!   MATCHED and EXPIRED mutually exclusive and lets every waiter observe the
//!   single terminal state.
//!
//! ```text
//!            try_match()            complete(outcome)
//!  Pending ───────────────► Matched ──────────────────► Done(outcome)
//!     │
//!     │ try_expire()
//!     └──────────────────► Expired
//! ```

use drop_types::Secret;
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use tokio::io::DuplexStream;
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

/// The receiver's end of a transfer as seen by the sender's task.
#[derive(Debug)]
pub struct ReceiverPipe {
    /// Bytes written here come out of the receiver's HTTP response body.
    pub writer: DuplexStream,
    /// Resolves once the receiver's body has read past the last byte.
    /// Closes without a value if the body is dropped before that.
    pub drained: oneshot::Receiver<()>,
}

impl ReceiverPipe {
    /// A pipe holding up to `capacity` bytes in flight.
    ///
    /// Returns the sender's end plus the receiver's read half and the
    /// trigger for [`drained`](Self::drained).
    pub fn new(capacity: usize) -> (Self, DuplexStream, oneshot::Sender<()>) {
        let (writer, reader) = tokio::io::duplex(capacity);
        let (drained_tx, drained) = oneshot::channel();
        (Self { writer, drained }, reader, drained_tx)
    }
}

/// How a matched transfer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The receiver's body read every byte of the sender's body.
    Delivered,
    /// The copy was aborted, or the receiver went away before the end.
    Failed,
}

/// Lifecycle of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferState {
    /// Registered, no copy in progress.
    Pending,
    /// Sender and receiver paired; bytes are flowing.
    Matched,
    /// Copy finished.
    Done(Outcome),
    /// Deadline passed before the copy began.
    Expired,
}

impl OfferState {
    /// `Done` and `Expired` are terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Expired)
    }
}

/// Why a receiver could not attach to an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachError {
    /// Another receiver already took the slot.
    AlreadyClaimed,
    /// The offer expired or its sender gave up.
    Closed,
}

/// A pending or in-flight transfer keyed by its secret.
pub struct Offer {
    secret: Secret,
    filename: String,
    origin: Option<IpAddr>,
    deadline: Instant,
    handoff_tx: Mutex<Option<oneshot::Sender<ReceiverPipe>>>,
    handoff_rx: Mutex<Option<oneshot::Receiver<ReceiverPipe>>>,
    state: watch::Sender<OfferState>,
}

impl std::fmt::Debug for Offer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Offer")
            .field("secret", &self.secret)
            .field("filename", &self.filename)
            .field("origin", &self.origin)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Offer {
    /// Create a pending offer.
    pub fn new(secret: Secret, filename: String, origin: Option<IpAddr>, deadline: Instant) -> Self {
        let (handoff_tx, handoff_rx) = oneshot::channel();
        let (state, _) = watch::channel(OfferState::Pending);
        Self {
            secret,
            filename,
            origin,
            deadline,
            handoff_tx: Mutex::new(Some(handoff_tx)),
            handoff_rx: Mutex::new(Some(handoff_rx)),
            state,
        }
    }

    /// The secret this offer is registered under.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// The sender's filename hint. Untrusted.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// IP address of the client that created the offer, if known.
    pub fn origin(&self) -> Option<IpAddr> {
        self.origin
    }

    /// When the offer expires if no copy has started.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OfferState {
        *self.state.borrow()
    }

    /// Watch lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<OfferState> {
        self.state.subscribe()
    }

    /// Place the receiver's output stream in the handoff slot.
    ///
    /// Succeeds at most once per offer.
    pub fn attach_receiver(&self, pipe: ReceiverPipe) -> Result<(), AttachError> {
        let tx = lock(&self.handoff_tx)
            .take()
            .ok_or(AttachError::AlreadyClaimed)?;
        tx.send(pipe).map_err(|_| AttachError::Closed)
    }

    /// Claim the sender's end of the handoff slot.
    ///
    /// Returns `None` if a sender already claimed it or the offer expired.
    pub fn claim_sender(&self) -> Option<oneshot::Receiver<ReceiverPipe>> {
        lock(&self.handoff_rx).take()
    }

    /// `Pending` → `Matched`. Fails if the offer already left `Pending`.
    pub fn try_match(&self) -> bool {
        self.transition(|s| (*s == OfferState::Pending).then_some(OfferState::Matched))
    }

    /// `Pending` → `Expired`. Fails once a copy has started.
    ///
    /// On success any receiver stream parked in the handoff slot is dropped,
    /// which ends that receiver's wait.
    pub fn try_expire(&self) -> bool {
        let expired =
            self.transition(|s| (*s == OfferState::Pending).then_some(OfferState::Expired));
        if expired {
            drop(lock(&self.handoff_tx).take());
            drop(lock(&self.handoff_rx).take());
        }
        expired
    }

    /// `Matched` → `Done(outcome)`. Fires at most once.
    pub fn complete(&self, outcome: Outcome) -> bool {
        self.transition(|s| (*s == OfferState::Matched).then_some(OfferState::Done(outcome)))
    }

    fn transition(&self, next: impl FnOnce(&OfferState) -> Option<OfferState>) -> bool {
        self.state.send_if_modified(move |state| match next(state) {
            Some(new_state) => {
                *state = new_state;
                true
            }
            None => false,
        })
    }
}

/// Wait until the lifecycle satisfies `pred` and return that state.
///
/// If the offer is dropped first the wait ends as `Expired`.
pub async fn wait_for_state(
    lifecycle: &mut watch::Receiver<OfferState>,
    pred: impl FnMut(&OfferState) -> bool,
) -> OfferState {
    match lifecycle.wait_for(pred).await {
        Ok(state) => *state,
        Err(_) => OfferState::Expired,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn offer() -> Offer {
        Offer::new(
            Secret::parse("fast-blue-began").unwrap(),
            "notes.txt".to_string(),
            None,
            Instant::now() + Duration::from_secs(60),
        )
    }

    #[test]
    fn new_offer_is_pending() {
        let offer = offer();
        assert_eq!(offer.state(), OfferState::Pending);
        assert_eq!(offer.filename(), "notes.txt");
        assert!(!offer.state().is_terminal());
    }

    #[test]
    fn match_and_expire_are_exclusive() {
        let offer = offer();
        assert!(offer.try_match());
        assert!(!offer.try_expire());
        assert_eq!(offer.state(), OfferState::Matched);

        let other = self::offer();
        assert!(other.try_expire());
        assert!(!other.try_match());
        assert_eq!(other.state(), OfferState::Expired);
    }

    #[test]
    fn completion_fires_once() {
        let offer = offer();
        assert!(!offer.complete(Outcome::Delivered), "cannot complete before match");

        assert!(offer.try_match());
        assert!(offer.complete(Outcome::Delivered));
        assert!(!offer.complete(Outcome::Failed));
        assert_eq!(offer.state(), OfferState::Done(Outcome::Delivered));
        assert!(offer.state().is_terminal());
    }

    #[test]
    fn each_side_of_the_slot_is_claimed_once() {
        let offer = offer();
        let (first, _keep, _drained) = ReceiverPipe::new(64);
        let (second, _keep2, _drained2) = ReceiverPipe::new(64);

        assert!(offer.attach_receiver(first).is_ok());
        assert_eq!(
            offer.attach_receiver(second),
            Err(AttachError::AlreadyClaimed)
        );

        assert!(offer.claim_sender().is_some());
        assert!(offer.claim_sender().is_none());
    }

    #[tokio::test]
    async fn handoff_delivers_the_receiver_stream() {
        let offer = offer();
        let (pipe, mut reader, drained) = ReceiverPipe::new(64);
        offer.attach_receiver(pipe).unwrap();

        let ReceiverPipe {
            mut writer,
            drained: mut drained_rx,
        } = offer.claim_sender().unwrap().await.unwrap();
        writer.write_all(b"hello").await.unwrap();
        drop(writer);

        let mut got = Vec::new();
        reader.read_to_end(&mut got).await.unwrap();
        assert_eq!(got, b"hello");

        assert!(drained_rx.try_recv().is_err(), "not signalled yet");
        drained.send(()).unwrap();
        assert!(drained_rx.await.is_ok());
    }

    #[tokio::test]
    async fn expiry_drops_a_parked_receiver_stream() {
        let offer = offer();
        let (pipe, mut reader, _drained) = ReceiverPipe::new(64);
        offer.attach_receiver(pipe).unwrap();

        assert!(offer.try_expire());
        assert!(offer.claim_sender().is_none());

        let mut got = Vec::new();
        let n = reader.read_to_end(&mut got).await.unwrap();
        assert_eq!(n, 0, "parked stream must be closed without data");
    }

    #[test]
    fn attach_after_expiry_fails() {
        let offer = offer();
        assert!(offer.try_expire());

        let (pipe, _reader, _drained) = ReceiverPipe::new(64);
        assert_eq!(
            offer.attach_receiver(pipe),
            Err(AttachError::AlreadyClaimed)
        );
    }

    #[tokio::test]
    async fn subscribers_observe_the_terminal_state() {
        let offer = offer();
        let mut lifecycle = offer.subscribe();

        let waiter = tokio::spawn(async move {
            wait_for_state(&mut lifecycle, OfferState::is_terminal).await
        });

        assert!(offer.try_match());
        assert!(offer.complete(Outcome::Failed));

        assert_eq!(waiter.await.unwrap(), OfferState::Done(Outcome::Failed));
    }
}
