//! cpal output for the background loop and the completion cue.
//!
//! Both assets are decoded up front and mixed by one output stream. The
//! stream lives on its own thread because it is not `Send` everywhere;
//! that thread exits once every player handle has been dropped.

pub mod decode;
pub mod voice;

use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use tracing::{error, info};

use self::voice::{CueHandle, LoopHandle, StreamGuard, Voice};
use crate::audio::{AudioError, AudioSettings, BoxedLoop, BoxedOneShot, Result, SilentPlayer};

/// Volume the background loop starts at until the timer sets its own
const INITIAL_BACKGROUND_VOLUME: f32 = 1.0;

pub fn open(settings: &AudioSettings) -> Result<(BoxedLoop, BoxedOneShot)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::DeviceNotFound)?;

    let supported = device.default_output_config()?;
    let sample_format = supported.sample_format();
    let sample_rate = supported.sample_rate().0;
    let config = supported.config();
    let channels = config.channels as usize;

    let load = |path: &Path| decode::load_for_device(path, sample_rate, channels);

    let background = settings
        .background
        .as_deref()
        .map(load)
        .transpose()?
        .map(|samples| {
            Arc::new(Voice::looping(
                samples,
                sample_rate,
                channels,
                INITIAL_BACKGROUND_VOLUME,
            ))
        });
    let cue = settings
        .cue
        .as_deref()
        .map(load)
        .transpose()?
        .map(|samples| Arc::new(Voice::one_shot(samples, settings.cue_volume)));

    let voices: Vec<Arc<Voice>> = background.iter().chain(cue.iter()).cloned().collect();
    let guard = Arc::new(spawn_output(device, config, sample_format, voices)?);

    info!(
        sample_rate,
        channels,
        format = ?sample_format,
        background = background.is_some(),
        cue = cue.is_some(),
        "audio output ready"
    );

    let background: BoxedLoop = match background {
        Some(voice) => Box::new(LoopHandle::new(voice, Arc::clone(&guard))),
        None => Box::new(SilentPlayer::new("background")),
    };
    let cue: BoxedOneShot = match cue {
        Some(voice) => Box::new(CueHandle::new(voice, guard)),
        None => Box::new(SilentPlayer::new("cue")),
    };
    Ok((background, cue))
}

/// Start the output thread and wait until its stream is playing
fn spawn_output(
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    voices: Vec<Arc<Voice>>,
) -> Result<StreamGuard> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    thread::Builder::new()
        .name("pomo-audio".into())
        .spawn(move || {
            let stream = match start_stream(&device, &config, sample_format, voices) {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            if ready_tx.send(Ok(())).is_err() {
                return;
            }
            // Err once every handle's sender is gone
            let _ = shutdown_rx.recv();
            drop(stream);
        })
        .map_err(|e| AudioError::Device(e.to_string()))?;

    ready_rx.recv().map_err(|_| AudioError::ThreadGone)??;
    Ok(StreamGuard::new(shutdown_tx))
}

fn start_stream(
    device: &Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    voices: Vec<Arc<Voice>>,
) -> Result<Stream> {
    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(device, config, voices)?,
        SampleFormat::I16 => build_stream::<i16>(device, config, voices)?,
        SampleFormat::U16 => build_stream::<u16>(device, config, voices)?,
        other => {
            return Err(AudioError::Device(format!(
                "unsupported sample format {other:?}"
            )))
        }
    };
    stream.play()?;
    Ok(stream)
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    voices: Vec<Arc<Voice>>,
) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let mut mix: Vec<f32> = Vec::new();
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            mix.clear();
            mix.resize(data.len(), 0.0);
            for voice in &voices {
                voice.mix_into(&mut mix);
            }
            for (out, sample) in data.iter_mut().zip(&mix) {
                *out = T::from_sample(sample.clamp(-1.0, 1.0));
            }
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;
    Ok(stream)
}

