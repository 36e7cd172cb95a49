//! Resume upload filter using Apache OpenDAL.
//!
//! Accepts a single file, checks its suffix against the allow-list before
//! anything is written, streams it into the upload directory under a
//! collision-free name, and enforces the size cap while streaming.
//!
//! ```text
//! begin("cv.pdf") ──► check_extension ──► writer("{token}-cv.pdf")
//!                                              │
//!                     write(chunk) ×N  ◄───────┘  (cap enforced per chunk)
//!                                              │
//!                     finish() ──► StoredUpload
//! ```

mod error;
mod service;

pub use error::UploadError;
pub use service::{PendingUpload, StoredUpload, UploadFilter};
