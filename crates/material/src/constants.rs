/// Override table key whose record is merged into every material.
pub const GLOBAL_OVERRIDE_KEY: &str = "*";

/// Alpha cutoff used for MASK materials that do not declare one (glTF default).
pub const DEFAULT_ALPHA_CUTOFF: f32 = 0.5;

/// Extension of every packed output texture.
pub const PACKED_TEXTURE_EXTENSION: &str = "dds";

/// Prefix marking output names that stand for constant (file-less) textures.
pub const DEFAULT_TEXTURE_PREFIX: char = '$';

/// Unit factor used when a source leaves a strength or factor unset.
pub const UNIT_STRENGTH: f32 = 1.0;

/// Metalness strength for materials without a metallic-roughness texture.
pub const DEFAULT_METALNESS: f32 = 0.0;

/// Opaque white base-color factor.
pub const WHITE_RGBA: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// White emissive factor.
pub const WHITE_RGB: [f32; 3] = [1.0, 1.0, 1.0];
