//! DXTF output documents
//!
//! Record shapes written by the converter:
//! - [`DxtfMaterial`] - one `.dxtf_mat` document per material
//! - [`Tex2DdsJob`] - one texture compression job per packed texture
//! - [`Manifest`] - the `.dxtf_mdm` index of a converted set

mod error;
mod manifest;
mod material;
mod tex2dds;

pub use error::*;
pub use manifest::*;
pub use material::*;
pub use tex2dds::*;
