// ── DocChat Atoms Layer ────────────────────────────────────────────────────
// Pure constants, error types, wire shapes and seam traits.
// Dependency rule: atoms may only depend on std and external crates.
// Nothing here may import from engine/ or commands/.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
