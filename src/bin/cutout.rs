//! Cutout Background Removal CLI Tool
//!
//! Command-line interface for removing image backgrounds by delegating to
//! a remove.bg compatible HTTP service.

#[cfg(feature = "cli")]
use cutout::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
