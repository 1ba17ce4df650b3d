//! Texture compression jobs.
//!
//! Each non-default output texture becomes one job for the external
//! compressor: which file channel (or constant) lands in which output
//! channel, in what format, at what resolution.

use dxtf_config::{Tex2DdsSettings, forward_slashes};
use dxtf_material::{
    Channel, ConversionEvent, DEFAULT_TEXTURE_PREFIX, OutputNames, Reporter, Resolution, SlotKind, TextureFormat,
    TextureKey,
};
use serde::Serialize;

use crate::error::FormatError;

/// One output channel of a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tex2DdsChannel {
    /// Source file, `None` for constants
    pub file: Option<String>,
    pub src: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tex2DdsJob {
    pub output_path: String,
    pub srgb: String,
    pub format: TextureFormat,
    pub resolution: Resolution,
    pub channels: Vec<Tex2DdsChannel>,
}

impl Tex2DdsJob {
    /// Job writing `key` to `<textures_dir>/<name>`.
    ///
    /// Channels are padded with constant `1` up to the format's channel count.
    pub fn new(name: &str, key: &TextureKey, textures_dir: &str, srgb: &str) -> Result<Self, FormatError> {
        let expected = key.format.channels();
        if key.channels.len() > expected {
            return Err(FormatError::TooManyChannels {
                name: name.to_string(),
                format: key.format,
                expected,
                found: key.channels.len(),
            });
        }

        let mut channels: Vec<Tex2DdsChannel> = key
            .channels
            .iter()
            .map(|source| Tex2DdsChannel {
                file: source.path.as_deref().map(forward_slashes),
                src: source.channel,
            })
            .collect();
        channels.resize(
            expected,
            Tex2DdsChannel {
                file: None,
                src: Channel::One,
            },
        );

        Ok(Self {
            output_path: format!("{}/{name}", textures_dir.trim_end_matches('/')),
            srgb: srgb.to_string(),
            format: key.format,
            resolution: key.resolution,
            channels,
        })
    }

    /// Jobs for every named texture of every slot, default textures excluded.
    pub fn build_all(
        names: &OutputNames,
        textures_dir: &str,
        settings: &Tex2DdsSettings,
        reporter: &dyn Reporter,
    ) -> Result<Vec<Self>, FormatError> {
        let mut jobs = Vec::new();
        for slot in SlotKind::ALL {
            let srgb = slot_settings(settings, slot);
            for (name, key) in names.get(slot).iter() {
                if name.starts_with(DEFAULT_TEXTURE_PREFIX) {
                    reporter.report(ConversionEvent::DefaultTextureSkipped {
                        name: name.to_string(),
                    });
                    continue;
                }
                jobs.push(Self::new(name, key, textures_dir, srgb)?);
            }
        }
        Ok(jobs)
    }
}

fn slot_settings(settings: &Tex2DdsSettings, slot: SlotKind) -> &str {
    match slot {
        SlotKind::Diffuse => &settings.diffuse.srgb,
        SlotKind::Normal => &settings.normal.srgb,
        SlotKind::Orm => &settings.orm.srgb,
        SlotKind::Emissive => &settings.emissive.srgb,
    }
}
