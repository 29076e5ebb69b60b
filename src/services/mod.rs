//! Support services for the client
//!
//! I/O concerns are kept out of the session state machine so the workflow
//! stays testable without touching the filesystem.

pub mod io;

pub use io::ImageIOService;
