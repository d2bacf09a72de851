use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The tweak set applied to the CryptoNight main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Original CryptoNight.
    V0,
    /// Monero v7: nonce-dependent tweak of the stored AES output and the multiply result.
    V1,
    /// Monero v8: shuffle-add of neighbouring chunks plus an integer division and square root step.
    V2,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::V0, Variant::V1, Variant::V2];

    pub fn as_u8(&self) -> u8 {
        match self {
            Variant::V0 => 0,
            Variant::V1 => 1,
            Variant::V2 => 2,
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}

/// The named memory/iteration profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    Standard,
    Lite,
    Dark,
    DarkLite,
    Turtle,
    TurtleLite,
}

impl SizeClass {
    pub const ALL: [SizeClass; 6] = [
        SizeClass::Standard,
        SizeClass::Lite,
        SizeClass::Dark,
        SizeClass::DarkLite,
        SizeClass::Turtle,
        SizeClass::TurtleLite,
    ];

    pub fn params(&self) -> &'static CryptoNightParams {
        match self {
            SizeClass::Standard => &CryptoNightParams::STANDARD,
            SizeClass::Lite => &CryptoNightParams::LITE,
            SizeClass::Dark => &CryptoNightParams::DARK,
            SizeClass::DarkLite => &CryptoNightParams::DARK_LITE,
            SizeClass::Turtle => &CryptoNightParams::TURTLE,
            SizeClass::TurtleLite => &CryptoNightParams::TURTLE_LITE,
        }
    }

    /// The entry-point name prefix, e.g. `cn_dark_lite` in `cn_dark_lite_slow_hash_v1`.
    pub fn prefix(&self) -> &'static str {
        match self {
            SizeClass::Standard => "cn",
            SizeClass::Lite => "cn_lite",
            SizeClass::Dark => "cn_dark",
            SizeClass::DarkLite => "cn_dark_lite",
            SizeClass::Turtle => "cn_turtle",
            SizeClass::TurtleLite => "cn_turtle_lite",
        }
    }
}

/// Memory and iteration parameters of one CryptoNight profile.
///
/// `page_size` is the size of the address space visited by the main loop before the "light" halving, `scratchpad` is
/// the number of bytes produced by the explode phase and consumed by the implode phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CryptoNightParams {
    pub page_size: usize,
    pub scratchpad: usize,
    pub iterations: usize,
    pub light: bool,
}

impl CryptoNightParams {
    pub const STANDARD: Self = Self::from_table(2 * 1024 * 1024, 2 * 1024 * 1024, 1024 * 1024, false);
    pub const LITE: Self = Self::from_table(2 * 1024 * 1024, 1024 * 1024, 512 * 1024, true);
    pub const DARK: Self = Self::from_table(512 * 1024, 512 * 1024, 256 * 1024, false);
    pub const DARK_LITE: Self = Self::from_table(512 * 1024, 512 * 1024, 256 * 1024, true);
    pub const TURTLE: Self = Self::from_table(256 * 1024, 256 * 1024, 128 * 1024, false);
    pub const TURTLE_LITE: Self = Self::from_table(256 * 1024, 256 * 1024, 128 * 1024, true);

    const fn from_table(page_size: usize, scratchpad: usize, iterations: usize, light: bool) -> Self {
        Self { page_size, scratchpad, iterations, light }
    }

    /// Builds a custom parameter set, checking that the main loop can never address memory outside the scratchpad.
    pub fn new(page_size: usize, scratchpad: usize, iterations: usize, light: bool) -> Result<Self, HashError> {
        let params = Self { page_size, scratchpad, iterations, light };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), HashError> {
        let space = self.address_space();
        if space < 64 || !space.is_power_of_two() {
            return Err(HashError::InvalidParameters(format!(
                "address space of {space} bytes is not a power of two of at least 64 bytes"
            )));
        }
        if self.scratchpad == 0 || self.scratchpad % 128 != 0 {
            return Err(HashError::InvalidParameters(format!(
                "scratchpad of {} bytes is not a non-zero multiple of 128",
                self.scratchpad
            )));
        }
        if self.scratchpad < space {
            return Err(HashError::InvalidParameters(format!(
                "scratchpad of {} bytes is smaller than the {space} byte address space",
                self.scratchpad
            )));
        }
        if self.iterations == 0 || self.iterations % 2 != 0 {
            return Err(HashError::InvalidParameters(format!(
                "iteration count {} must be even and non-zero",
                self.iterations
            )));
        }
        Ok(())
    }

    /// Number of bytes the main loop reads and writes.
    pub fn address_space(&self) -> usize {
        if self.light {
            self.page_size / 2
        } else {
            self.page_size
        }
    }

    /// Mask applied to a 16-byte block index.
    pub(crate) fn block_mask(&self) -> u64 {
        (self.address_space() / 16 - 1) as u64
    }
}

/// Argon2id parameters of the Chukwa hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChukwaParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub threads: u32,
    pub salt_len: usize,
    pub output_len: usize,
}

impl ChukwaParams {
    pub const DEFAULT: Self = Self { memory_kib: 512, iterations: 3, threads: 1, salt_len: 16, output_len: 32 };
}

impl Default for ChukwaParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
