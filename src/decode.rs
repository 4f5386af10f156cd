//! Input decoding for the supported text and byte encodings.
//!
//! Every decoder works on the input truncated to its declared length and
//! either returns the complete buffer or an error; no partially decoded
//! bytes ever escape a failed call.
//!
//! Optimizations:
//! - 256-entry lookup tables for hex and base64 symbol classification

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AnalysisError, Result};

/// Marker for bytes outside a symbol alphabet.
const INVALID: u8 = 0xFF;

/// Declared encoding of the analysis input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Text taken byte for byte.
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// Pairs of hex digits.
    Hex,
    /// Standard base64 alphabet with `=` padding.
    Base64,
    /// Groups of eight `0`/`1` characters.
    Binary,
    /// Opaque file contents, already bytes.
    #[serde(alias = "raw")]
    File,
}

impl Encoding {
    /// Get the canonical name of the encoding.
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Hex => "hex",
            Self::Base64 => "base64",
            Self::Binary => "binary",
            Self::File => "file",
        }
    }

    /// Get all encodings.
    pub fn all() -> &'static [Self] {
        &[Self::Utf8, Self::Hex, Self::Base64, Self::Binary, Self::File]
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "text" => Ok(Self::Utf8),
            "hex" => Ok(Self::Hex),
            "base64" | "b64" => Ok(Self::Base64),
            "binary" | "bin" => Ok(Self::Binary),
            "file" | "raw" => Ok(Self::File),
            _ => Err(AnalysisError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Hex digit values, `INVALID` for everything else.
const fn generate_hex_lut() -> [u8; 256] {
    let mut lut = [INVALID; 256];
    let mut i = 0usize;
    while i < 10 {
        lut[b'0' as usize + i] = i as u8;
        i += 1;
    }
    i = 0;
    while i < 6 {
        lut[b'a' as usize + i] = 10 + i as u8;
        lut[b'A' as usize + i] = 10 + i as u8;
        i += 1;
    }
    lut
}

/// Base64 sextet values, `INVALID` for everything else (including `=`).
const fn generate_base64_lut() -> [u8; 256] {
    const ALPHABET: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut lut = [INVALID; 256];
    let mut i = 0usize;
    while i < 64 {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
}

static HEX_LUT: [u8; 256] = generate_hex_lut();
static BASE64_LUT: [u8; 256] = generate_base64_lut();

/// Decode `input` according to `encoding`.
///
/// Only the first `declared_len` bytes of `input` are considered. In strict
/// mode (`lenient == false`) any syntax violation fails the whole call with
/// [`AnalysisError::InvalidInput`].
pub fn decode(
    input: &[u8],
    encoding: Encoding,
    declared_len: usize,
    lenient: bool,
) -> Result<Vec<u8>> {
    let input = &input[..declared_len.min(input.len())];

    let decoded = match encoding {
        Encoding::Utf8 | Encoding::File => Ok(input.to_vec()),
        Encoding::Hex => decode_hex(input, lenient),
        Encoding::Base64 => decode_base64(input, lenient),
        Encoding::Binary => decode_binary(input, lenient),
    };

    if let Err(err) = &decoded {
        warn!(%encoding, len = input.len(), "rejected input: {err}");
    }
    decoded
}

/// Decode hex digit pairs.
///
/// Lenient mode skips malformed pairs and drops a trailing odd character.
pub fn decode_hex(input: &[u8], lenient: bool) -> Result<Vec<u8>> {
    let pairs = input.chunks_exact(2);
    if !lenient && !pairs.remainder().is_empty() {
        return Err(AnalysisError::InvalidInput {
            encoding: Encoding::Hex,
            offset: input.len() - 1,
            reason: "odd number of hex digits",
        });
    }

    let mut out = Vec::with_capacity(input.len() / 2);
    for (i, pair) in pairs.enumerate() {
        let hi = HEX_LUT[pair[0] as usize];
        let lo = HEX_LUT[pair[1] as usize];
        if hi == INVALID || lo == INVALID {
            if lenient {
                continue;
            }
            return Err(AnalysisError::InvalidInput {
                encoding: Encoding::Hex,
                offset: i * 2,
                reason: "non-hex digit",
            });
        }
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

/// Decode standard base64.
///
/// Strict mode validates the whole alphabet (`A-Z a-z 0-9 + / =`) before
/// decoding anything. Consumption stops at the first `=`, or in lenient mode
/// at the first symbol outside the alphabet.
pub fn decode_base64(input: &[u8], lenient: bool) -> Result<Vec<u8>> {
    if !lenient {
        if let Some(offset) = input
            .iter()
            .position(|&c| c != b'=' && BASE64_LUT[c as usize] == INVALID)
        {
            return Err(AnalysisError::InvalidInput {
                encoding: Encoding::Base64,
                offset,
                reason: "character outside the base64 alphabet",
            });
        }
    }

    let mut out = Vec::with_capacity(input.len() / 4 * 3 + 2);
    let mut group = [0u8; 4];
    let mut filled = 0usize;

    for &c in input {
        let value = BASE64_LUT[c as usize];
        if value == INVALID {
            // `=` or, in lenient mode, garbage
            break;
        }
        group[filled] = value;
        filled += 1;
        if filled == 4 {
            out.extend_from_slice(&pack_sextets(&group));
            filled = 0;
        }
    }

    if filled > 1 {
        group[filled..].fill(0);
        out.extend_from_slice(&pack_sextets(&group)[..filled - 1]);
    }
    Ok(out)
}

#[inline]
fn pack_sextets(group: &[u8; 4]) -> [u8; 3] {
    [
        (group[0] << 2) | (group[1] >> 4),
        ((group[1] & 0x0F) << 4) | (group[2] >> 2),
        ((group[2] & 0x03) << 6) | group[3],
    ]
}

/// Decode `0`/`1` text, eight bits per byte, most significant bit first.
///
/// A short final chunk packs only the bits present, so `"1"` is `0x01`.
/// Lenient mode reads any other character as `0`.
pub fn decode_binary(input: &[u8], lenient: bool) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len().div_ceil(8));
    for (chunk_idx, chunk) in input.chunks(8).enumerate() {
        let mut byte = 0u8;
        for (bit_idx, &c) in chunk.iter().enumerate() {
            byte <<= 1;
            match c {
                b'1' => byte |= 1,
                b'0' => {}
                _ if lenient => {}
                _ => {
                    return Err(AnalysisError::InvalidInput {
                        encoding: Encoding::Binary,
                        offset: chunk_idx * 8 + bit_idx,
                        reason: "expected '0' or '1'",
                    })
                }
            }
        }
        out.push(byte);
    }
    Ok(out)
}
