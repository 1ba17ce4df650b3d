//! Block-compression formats of packed output textures.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TextureFormat {
    #[serde(rename = "BC1_UNORM")]
    Bc1Unorm,
    #[serde(rename = "BC1_UNORM_SRGB")]
    Bc1UnormSrgb,
    #[serde(rename = "BC3_UNORM")]
    Bc3Unorm,
    #[serde(rename = "BC3_UNORM_SRGB")]
    Bc3UnormSrgb,
    #[serde(rename = "BC4_UNORM")]
    Bc4Unorm,
    #[serde(rename = "BC5_UNORM")]
    Bc5Unorm,
    #[serde(rename = "BC6H_UF16")]
    Bc6hUf16,
    #[serde(rename = "BC7_UNORM")]
    Bc7Unorm,
    #[serde(rename = "BC7_UNORM_SRGB")]
    Bc7UnormSrgb,
}

impl TextureFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TextureFormat::Bc1Unorm => "BC1_UNORM",
            TextureFormat::Bc1UnormSrgb => "BC1_UNORM_SRGB",
            TextureFormat::Bc3Unorm => "BC3_UNORM",
            TextureFormat::Bc3UnormSrgb => "BC3_UNORM_SRGB",
            TextureFormat::Bc4Unorm => "BC4_UNORM",
            TextureFormat::Bc5Unorm => "BC5_UNORM",
            TextureFormat::Bc6hUf16 => "BC6H_UF16",
            TextureFormat::Bc7Unorm => "BC7_UNORM",
            TextureFormat::Bc7UnormSrgb => "BC7_UNORM_SRGB",
        }
    }

    /// Number of channels the format stores.
    pub fn channels(self) -> usize {
        match self {
            TextureFormat::Bc4Unorm => 1,
            TextureFormat::Bc5Unorm => 2,
            TextureFormat::Bc6hUf16 => 3,
            TextureFormat::Bc1Unorm
            | TextureFormat::Bc1UnormSrgb
            | TextureFormat::Bc3Unorm
            | TextureFormat::Bc3UnormSrgb
            | TextureFormat::Bc7Unorm
            | TextureFormat::Bc7UnormSrgb => 4,
        }
    }

    pub fn is_srgb(self) -> bool {
        self.as_str().ends_with("_SRGB")
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_counts() {
        assert_eq!(TextureFormat::Bc5Unorm.channels(), 2);
        assert_eq!(TextureFormat::Bc6hUf16.channels(), 3);
        assert_eq!(TextureFormat::Bc1UnormSrgb.channels(), 4);
    }

    #[test]
    fn test_srgb() {
        assert!(TextureFormat::Bc3UnormSrgb.is_srgb());
        assert!(!TextureFormat::Bc7Unorm.is_srgb());
        assert_eq!(
            serde_json::to_string(&TextureFormat::Bc6hUf16).unwrap(),
            "\"BC6H_UF16\""
        );
    }
}
