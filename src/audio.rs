//! Background music. Fire-and-forget: a failure to start the track is
//! logged and the game carries on in silence.

use std::path::{Path, PathBuf};

use log::warn;

use crate::config::AudioConfig;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("track not found: {}", .0.display())]
    MissingTrack(PathBuf),

    #[error("no audio output: {0}")]
    Output(String),

    #[error("cannot decode track: {0}")]
    Decode(String),
}

pub trait AudioSink {
    /// Start playing `track` on repeat until the sink is stopped or dropped.
    fn play_looping(&mut self, track: &Path) -> Result<(), AudioError>;

    fn stop(&mut self) {}

    /// True for sinks that never produce sound.
    fn is_silent(&self) -> bool {
        false
    }
}

/// Used when audio is disabled or unavailable.
#[derive(Debug, Default)]
pub struct Silence;

impl AudioSink for Silence {
    fn play_looping(&mut self, _track: &Path) -> Result<(), AudioError> {
        Ok(())
    }

    fn is_silent(&self) -> bool {
        true
    }
}

#[cfg(feature = "audio")]
pub use self::rodio_sink::RodioAudio;

#[cfg(feature = "audio")]
mod rodio_sink {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use log::debug;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::{AudioError, AudioSink};

    /// Loops a decoded track on the default output device.
    #[derive(Default)]
    pub struct RodioAudio {
        // The stream must outlive the sink or playback stops.
        _output_stream: Option<OutputStream>,
        stream_handle: Option<OutputStreamHandle>,
        sink: Option<Sink>,
    }

    impl RodioAudio {
        pub fn new() -> Self {
            Self::default()
        }

        fn ensure_output(&mut self) -> Result<&OutputStreamHandle, AudioError> {
            if self.stream_handle.is_none() {
                let (stream, handle) =
                    OutputStream::try_default().map_err(|e| AudioError::Output(e.to_string()))?;
                self._output_stream = Some(stream);
                self.stream_handle = Some(handle);
            }
            self.stream_handle
                .as_ref()
                .ok_or_else(|| AudioError::Output("output stream closed".into()))
        }
    }

    impl AudioSink for RodioAudio {
        fn play_looping(&mut self, track: &Path) -> Result<(), AudioError> {
            if !track.is_file() {
                return Err(AudioError::MissingTrack(track.to_path_buf()));
            }
            self.stop();

            let file = File::open(track).map_err(|e| AudioError::Decode(e.to_string()))?;
            let source =
                Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode(e.to_string()))?;

            let handle = self.ensure_output()?;
            let sink = Sink::try_new(handle).map_err(|e| AudioError::Output(e.to_string()))?;
            sink.append(source.repeat_infinite());
            self.sink = Some(sink);

            debug!("background track {} started", track.display());
            Ok(())
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }
    }
}

/// Pick the sink the configuration asks for.
pub fn from_config(config: &AudioConfig) -> Box<dyn AudioSink> {
    if !config.enabled {
        return Box::new(Silence);
    }
    #[cfg(feature = "audio")]
    {
        Box::new(RodioAudio::new())
    }
    #[cfg(not(feature = "audio"))]
    {
        warn!("built without the `audio` feature, music is off");
        Box::new(Silence)
    }
}

/// Start the looping background track. Errors are swallowed: the game
/// never depends on audio.
pub fn start_background_track(sink: &mut dyn AudioSink, track: &Path) -> bool {
    let started = if sink.is_silent() || track.is_file() {
        sink.play_looping(track)
    } else {
        Err(AudioError::MissingTrack(track.to_path_buf()))
    };
    match started {
        Ok(()) => true,
        Err(e) => {
            warn!("background music unavailable: {e}");
            false
        }
    }
}
