//! Whole-file decoding into interleaved f32 at the device layout.

use std::fmt::Display;
use std::fs::File;
use std::io;
use std::path::Path;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::audio::{AudioError, Result};

/// Interleaved samples with their layout
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }
}

fn decode_error(path: &Path, message: impl Display) -> AudioError {
    AudioError::Decode {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Decode every packet of the file's default track.
///
/// The sample rate and channel count come from the decoded audio itself.
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_error(path, e))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| decode_error(path, "no audio tracks"))?;
    let track_id = track.id;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(path, e))?;

    let mut samples = Vec::new();
    let mut layout = None;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(path, e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!(path = %path.display(), msg, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(decode_error(path, e)),
        };

        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
        layout.get_or_insert((spec.rate, spec.channels.count()));
    }

    let (sample_rate, channels) = layout.ok_or_else(|| decode_error(path, "no audio decoded"))?;
    debug!(
        path = %path.display(),
        sample_rate,
        channels,
        samples = samples.len(),
        "decoded audio"
    );
    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Map interleaved frames from one channel count to another.
///
/// Mono is duplicated across outputs, anything folded down to mono is
/// averaged, and other layouts repeat the source channels in order.
pub fn remix(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }
    let frames = samples.len() / from;
    let mut out = Vec::with_capacity(frames * to);
    for frame in samples.chunks_exact(from) {
        if to == 1 {
            out.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            out.extend((0..to).map(|ch| frame[ch % from]));
        }
    }
    out
}

/// Resample interleaved audio in one pass
pub fn resample(samples: &[f32], channels: usize, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() || channels == 0 {
        return Ok(samples.to_vec());
    }
    let frames = samples.len() / channels;

    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(
        to_rate as f64 / from_rate as f64,
        2.0,
        params,
        frames,
        channels,
    )
    .map_err(|e| AudioError::Resample(e.to_string()))?;

    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, sample) in frame.iter().enumerate() {
            planar[ch].push(*sample);
        }
    }

    let resampled = resampler
        .process(&planar, None)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    let out_frames = resampled.first().map_or(0, |c| c.len());
    let mut interleaved = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        for channel in &resampled {
            interleaved.push(channel[i]);
        }
    }
    Ok(interleaved)
}

/// Decode `path` and convert it to the output device's rate and layout
pub fn load_for_device(path: &Path, device_rate: u32, device_channels: usize) -> Result<Vec<f32>> {
    let decoded = decode_file(path)?;
    let resampled = resample(
        &decoded.samples,
        decoded.channels,
        decoded.sample_rate,
        device_rate,
    )?;
    Ok(remix(&resampled, decoded.channels, device_channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_is_duplicated_to_stereo() {
        assert_eq!(remix(&[0.1, 0.2], 1, 2), vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn stereo_folds_to_mono_by_average() {
        assert_eq!(remix(&[0.25, 0.75, -1.0, 1.0], 2, 1), vec![0.5, 0.0]);
    }

    #[test]
    fn stereo_repeats_into_quad() {
        assert_eq!(
            remix(&[0.1, 0.2], 2, 4),
            vec![0.1, 0.2, 0.1, 0.2]
        );
    }

    #[test]
    fn same_rate_is_untouched() {
        let input = vec![0.5; 64];
        assert_eq!(resample(&input, 2, 48_000, 48_000).unwrap(), input);
    }

    #[test]
    fn doubling_rate_roughly_doubles_length() {
        let input: Vec<f32> = (0..4_800).map(|i| (i as f32 * 0.01).sin()).collect();
        let out = resample(&input, 1, 24_000, 48_000).unwrap();
        let ratio = out.len() as f64 / input.len() as f64;
        assert!((1.9..=2.1).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = decode_file(Path::new("/definitely/not/here.mp3")).unwrap_err();
        assert!(matches!(err, AudioError::Open { .. }));
    }

    #[test]
    fn garbage_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"this is not audio at all").unwrap();
        let err = decode_file(&path).unwrap_err();
        assert!(matches!(err, AudioError::Decode { .. }));
    }
}
