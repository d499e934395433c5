//! glyphmatch-test - Regression test helpers for glyphmatch
//!
//! This crate provides the small regression framework the `*_reg.rs`
//! tests are written against, plus synthetic glyph fixtures:
//!
//! - **Compare**: Check values and images, collecting failures
//! - **Display**: Additionally write artefacts to `tests/regout`
//!
//! # Usage
//!
//! ```ignore
//! use glyphmatch_test::{Polarity, RegParams, render_glyph};
//!
//! let mut rp = RegParams::new("fingerprint");
//! let pix = render_glyph('A', 64, Polarity::DarkOnLight).unwrap();
//! rp.compare_values(64.0, pix.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
pub mod glyph;
mod params;

pub use error::{TestError, TestResult};
pub use glyph::{Polarity, render_glyph, render_glyph_at};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // glyphmatch-test is at crates/glyphmatch-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Get a path inside the regout directory, creating the directory if needed
pub fn regout_path(name: &str) -> String {
    let dir = regout_dir();
    let _ = std::fs::create_dir_all(&dir);
    format!("{}/{}", dir, name)
}
