//! HTTP protocol vocabulary.
//!
//! The relay speaks a deferred-streaming protocol:
//!
//! ```text
//! sender                         relay                        receiver
//!   │ POST /file                   │                              │
//!   │  suggested-filename: a.txt   │                              │
//!   │◄──────── 200 "<secret>\n" ───│                              │
//!   │                              │         GET /file/<secret>   │
//!   │ PUT /file/<secret> (body)    │◄─────────────────────────────│
//!   │─────────────────────────────►│── 200 suggested-filename ───►│
//!   │                              │══════ streamed body ════════►│
//!   │◄──────────────── 200 ────────│                              │
//! ```

use crate::Secret;

/// Header carrying the sender's filename hint on `POST /file` and on the
/// receiver's `GET` response.
pub const FILENAME_HEADER: &str = "suggested-filename";

/// Resource that creates offers.
pub const OFFER_PATH: &str = "/file";

/// Route pattern for an existing offer, as registered with the router.
pub const TRANSFER_ROUTE: &str = "/file/:secret";

/// Path addressing the offer identified by `secret`.
pub fn transfer_path(secret: &Secret) -> String {
    format!("{OFFER_PATH}/{secret}")
}

/// Parse the body of a successful `POST /file` response.
///
/// The relay answers with the secret followed by a newline.
pub fn parse_offer_response(body: &str) -> Result<Secret, crate::SecretError> {
    Secret::parse(body.trim_end_matches(['\r', '\n']))
}
