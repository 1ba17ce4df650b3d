//! DXTF material engine - override resolution and texture deduplication
//!
//! This crate turns source (glTF) materials plus a user override table into
//! canonical material records, then decides which packed textures have to be
//! produced and what they are called:
//! - [`modulate`] - `add`/`mult` numeric overrides with shape preservation
//! - [`merge`] - recursive merge of nested override records
//! - [`overrides`] - override table and exhaustive field reading
//! - [`source`] - source material model and the [`MaterialSource`] seam
//! - [`swizzle`] and [`format`] - channel layouts and block-compression formats
//! - [`slots`] - per-slot texture derivation (diffuse, normal, ORM, emissive)
//! - [`material`] - [`MaterialRecord`] assembly
//! - [`database`] - first-seen-wins material database over many sources
//! - [`keys`] - structural texture keys and per-slot grouping
//! - [`fold`] - output texture name folding
//! - [`resolve`] - final material -> output texture table
//! - [`report`] - injected diagnostics sink

pub mod constants;
pub mod database;
pub mod error;
pub mod fold;
pub mod format;
pub mod keys;
pub mod material;
pub mod merge;
pub mod modulate;
pub mod overrides;
pub mod report;
pub mod resolve;
pub mod slots;
pub mod source;
pub mod swizzle;

pub use constants::*;
pub use database::*;
pub use error::*;
pub use fold::*;
pub use format::*;
pub use keys::*;
pub use material::*;
pub use merge::*;
pub use modulate::*;
pub use overrides::*;
pub use report::*;
pub use resolve::*;
pub use slots::*;
pub use source::*;
pub use swizzle::*;
