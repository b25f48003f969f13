//! Per-scanline prediction delta, applied before Deflate for the
//! `ZipWithPrediction` codec (§4.2 "Zip with prediction", GLOSSARY
//! "Prediction encoding").
//!
//! For 8/16-bit integer samples the delta is taken in the sample domain,
//! then the result is big-endian encoded. For 32-bit float samples the
//! scanline's bytes are first de-interleaved into four contiguous byte
//! planes (`b0 b1 b2 b3 | b0 b1 b2 b3 …` → `b0…b0 | b1…b1 | b2…b2 | b3…b3`)
//! and the delta is then taken byte-wise across the whole planar scanline,
//! crossing plane boundaries — grounded on
//! `Core/Compression/Compress_ZIP.h`'s `PredictionEncode` float
//! specialization, which runs the byte delta over the entire
//! `width * sizeof(float)` planar row in one pass rather than per plane.

use super::{CodecError, SampleWidth};

fn delta_encode_bytes(buf: &[u8]) -> Vec<u8> {
    if buf.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(buf.len());
    out.push(buf[0]);
    for i in 1..buf.len() {
        out.push(buf[i].wrapping_sub(buf[i - 1]));
    }
    out
}

fn delta_decode_bytes(buf: &[u8]) -> Vec<u8> {
    if buf.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(buf.len());
    out.push(buf[0]);
    for i in 1..buf.len() {
        out.push(out[i - 1].wrapping_add(buf[i]));
    }
    out
}

fn planarize_float_scanline(scanline_host: &[u8], width: usize) -> Vec<u8> {
    let mut planes = vec![0u8; width * 4];
    for i in 0..width {
        let sample = f32::from_ne_bytes(scanline_host[i * 4..i * 4 + 4].try_into().unwrap());
        let be = sample.to_be_bytes();
        planes[i] = be[0];
        planes[width + i] = be[1];
        planes[2 * width + i] = be[2];
        planes[3 * width + i] = be[3];
    }
    planes
}

fn unplanarize_float_scanline(planes: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width * 4];
    for i in 0..width {
        let be = [
            planes[i],
            planes[width + i],
            planes[2 * width + i],
            planes[3 * width + i],
        ];
        let sample = f32::from_be_bytes(be);
        out[i * 4..i * 4 + 4].copy_from_slice(&sample.to_ne_bytes());
    }
    out
}

/// Delta-encode host-native sample bytes into on-disk (big-endian, and for
/// float, plane-de-interleaved) delta-coded bytes, one scanline at a time.
pub fn delta_channel(samples: &[u8], width: u32, height: u32, sample: SampleWidth) -> Vec<u8> {
    let width = width as usize;
    let height = height as usize;
    let sample_bytes = sample.bytes();
    let scanline_len = width * sample_bytes;

    let mut out = Vec::with_capacity(scanline_len * height);
    for row in 0..height {
        let scanline = &samples[row * scanline_len..(row + 1) * scanline_len];
        match sample {
            SampleWidth::Eight => out.extend_from_slice(&delta_encode_bytes(scanline)),
            SampleWidth::Sixteen => {
                let mut be_values = Vec::with_capacity(scanline_len);
                let mut prev = 0u16;
                for (i, chunk) in scanline.chunks_exact(2).enumerate() {
                    let value = u16::from_ne_bytes([chunk[0], chunk[1]]);
                    let delta = if i == 0 { value } else { value.wrapping_sub(prev) };
                    prev = value;
                    be_values.extend_from_slice(&delta.to_be_bytes());
                }
                out.extend_from_slice(&be_values);
            }
            SampleWidth::ThirtyTwoFloat => {
                let planar = planarize_float_scanline(scanline, width);
                out.extend_from_slice(&delta_encode_bytes(&planar));
            }
        }
    }
    out
}

/// Reverse [`delta_channel`]: turn on-disk delta-coded bytes back into
/// host-native sample bytes.
pub fn undelta_channel(
    payload: Vec<u8>,
    width: u32,
    height: u32,
    sample: SampleWidth,
) -> Result<Vec<u8>, CodecError> {
    let width = width as usize;
    let height = height as usize;
    let sample_bytes = sample.bytes();
    let scanline_len = width * sample_bytes;
    let expected = scanline_len * height;
    if payload.len() != expected {
        return Err(CodecError::ShortOutput {
            expected,
            actual: payload.len(),
        });
    }

    let mut out = Vec::with_capacity(expected);
    for row in 0..height {
        let scanline = &payload[row * scanline_len..(row + 1) * scanline_len];
        match sample {
            SampleWidth::Eight => out.extend_from_slice(&delta_decode_bytes(scanline)),
            SampleWidth::Sixteen => {
                let mut prev = 0u16;
                for (i, chunk) in scanline.chunks_exact(2).enumerate() {
                    let delta = u16::from_be_bytes([chunk[0], chunk[1]]);
                    let value = if i == 0 { delta } else { prev.wrapping_add(delta) };
                    prev = value;
                    out.extend_from_slice(&value.to_ne_bytes());
                }
            }
            SampleWidth::ThirtyTwoFloat => {
                let planar = delta_decode_bytes(scanline);
                out.extend_from_slice(&unplanarize_float_scanline(&planar, width));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_delta_is_involution() {
        let data: Vec<u8> = (0..=255).collect();
        let encoded = delta_encode_bytes(&data);
        let decoded = delta_decode_bytes(&encoded);
        assert_eq!(decoded, data);
    }

    #[test]
    fn integer_channel_round_trips() {
        for sample in [SampleWidth::Eight, SampleWidth::Sixteen] {
            let width = 9;
            let height = 5;
            let sample_bytes = sample.bytes();
            let host: Vec<u8> = (0..width * height * sample_bytes as u32)
                .map(|i| (i * 37 % 256) as u8)
                .collect();

            let delta = delta_channel(&host, width, height, sample);
            let restored = undelta_channel(delta, width, height, sample).unwrap();
            assert_eq!(restored, host);
        }
    }

    #[test]
    fn float_channel_round_trips() {
        let width = 11;
        let height = 4;
        let values: Vec<f32> = (0..width * height)
            .map(|i| (i as f32) * 0.5 - 3.0)
            .collect();
        let host: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();

        let delta = delta_channel(&host, width, height, SampleWidth::ThirtyTwoFloat);
        let restored = undelta_channel(delta, width, height, SampleWidth::ThirtyTwoFloat).unwrap();
        assert_eq!(restored, host);
    }
}
