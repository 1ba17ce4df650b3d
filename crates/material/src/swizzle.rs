//! Swizzles: which source channel, or which constant, feeds each output channel.

use std::fmt;

use serde::Serialize;

/// One letter of a swizzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Channel {
    #[serde(rename = "r")]
    R,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "a")]
    A,
    /// Constant 1.0
    #[serde(rename = "1")]
    One,
    /// Constant 0.5 (flat tangent-space normal)
    #[serde(rename = "h")]
    Half,
}

impl Channel {
    pub fn as_char(self) -> char {
        match self {
            Channel::R => 'r',
            Channel::G => 'g',
            Channel::B => 'b',
            Channel::A => 'a',
            Channel::One => '1',
            Channel::Half => 'h',
        }
    }

    /// Constant channels read no file.
    pub fn is_constant(self) -> bool {
        matches!(self, Channel::One | Channel::Half)
    }
}

/// An ordered list of channels, one per destination channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Swizzle(Vec<Channel>);

impl Swizzle {
    pub fn new(channels: &[Channel]) -> Self {
        Self(channels.to_vec())
    }

    pub fn channels(&self) -> &[Channel] {
        &self.0
    }

    pub fn last(&self) -> Option<Channel> {
        self.0.last().copied()
    }
}

impl fmt::Display for Swizzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{}", c.as_char()))
    }
}

use Channel::{A, B, G, Half, One, R};

pub const SWIZZLE_RGBA: &[Channel] = &[R, G, B, A];
pub const SWIZZLE_RGB1: &[Channel] = &[R, G, B, One];
pub const SWIZZLE_1111: &[Channel] = &[One, One, One, One];
pub const SWIZZLE_RG: &[Channel] = &[R, G];
pub const SWIZZLE_HH: &[Channel] = &[Half, Half];
pub const SWIZZLE_RGB: &[Channel] = &[R, G, B];
pub const SWIZZLE_111: &[Channel] = &[One, One, One];
pub const SWIZZLE_R: &[Channel] = &[R];
pub const SWIZZLE_G: &[Channel] = &[G];
pub const SWIZZLE_B: &[Channel] = &[B];
pub const SWIZZLE_1: &[Channel] = &[One];
