//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `catalogue_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("catalogue_core ping={}", catalogue_core::ping());
    println!("catalogue_core version={}", catalogue_core::core_version());
}
