//! Decode session: demuxer, selected track and codec state for one input
//!
//! A session is opened, drained and dropped inside a single extractor call.
//! All Symphonia handles are owned values, so every exit path (success,
//! early `?` return, mid-loop decode failure) releases them on drop.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Result, SyncError};
use crate::types::{ChannelSelector, Sample};

/// What the container declares about the selected audio track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Native sample rate in Hz
    pub sample_rate: u32,
    /// Declared channel count, if the container states one
    pub channels: Option<usize>,
    /// Short codec name (e.g. "pcm_f32le", "flac")
    pub codec: String,
    /// Total frames, if known up front
    pub frames: Option<u64>,
}

/// Open demuxer + decoder for the best audio track of one file
pub struct DecodeSession {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: StreamInfo,
    sample_buf: Option<SampleBuffer<Sample>>,
    mono: Vec<Sample>,
}

impl DecodeSession {
    /// Open a file, pick its audio track and open the codec
    ///
    /// On failure nothing is left open; the caller gets only the error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::OutOfMemory => SyncError::NotEnoughMemory,
            _ => SyncError::FileNotFound {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint with the file extension
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(SyncError::from_open)?;

        let format = probed.format;

        let track = select_audio_track(format.as_ref())
            .ok_or_else(|| SyncError::FormatInvalid(format!("no audio stream in {:?}", path)))?
            .clone();

        let sample_rate = track
            .codec_params
            .sample_rate
            .filter(|&rate| rate > 0)
            .ok_or_else(|| SyncError::FormatInvalid("unknown sample rate".to_string()))?;

        let codec = symphonia::default::get_codecs()
            .get_codec(track.codec_params.codec)
            .map(|d| d.short_name.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(SyncError::from_open)?;

        let info = StreamInfo {
            sample_rate,
            channels: track.codec_params.channels.map(|c| c.count()),
            codec,
            frames: track.codec_params.n_frames,
        };

        log::info!(
            "Opened {:?}: track {} ({}, {} Hz, {} channels)",
            path,
            track.id,
            info.codec,
            info.sample_rate,
            info.channels
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".to_string())
        );

        Ok(Self {
            format,
            decoder,
            track_id: track.id,
            info,
            sample_buf: None,
            mono: Vec::new(),
        })
    }

    pub fn info(&self) -> &StreamInfo {
        &self.info
    }

    /// Decode the selected track to the end
    ///
    /// For every decoded frame the selected channel is copied out and handed
    /// to `sink`. Packets from other tracks are skipped. Any decode error, or
    /// an error from `sink`, aborts the loop. Returns the number of frames
    /// decoded.
    pub fn decode<F>(&mut self, selector: ChannelSelector, mut sink: F) -> Result<u64>
    where
        F: FnMut(&[Sample]) -> Result<()>,
    {
        let mut frames: u64 = 0;

        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(e) => return Err(SyncError::from_decode(e)),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = self
                .decoder
                .decode(&packet)
                .map_err(SyncError::from_decode)?;

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let channels = spec.channels.count();
            // Covers containers that never declared a layout
            selector.validate(channels)?;

            // (Re)allocate the interleave buffer when a frame outgrows it
            let needs_buf = self
                .sample_buf
                .as_ref()
                .map(|b| b.capacity() < decoded.capacity() * channels)
                .unwrap_or(true);
            if needs_buf {
                self.sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }

            let Some(buf) = self.sample_buf.as_mut() else {
                continue;
            };
            buf.copy_interleaved_ref(decoded);

            let interleaved = buf.samples();
            let frame_len = interleaved.len() / channels;
            self.mono.clear();
            self.mono.try_reserve(frame_len)?;
            self.mono.extend(
                interleaved
                    .iter()
                    .skip(selector.index())
                    .step_by(channels)
                    .copied(),
            );

            frames += frame_len as u64;
            sink(&self.mono)?;
        }

        Ok(frames)
    }
}

/// Pick the track to decode: the container's default track if it carries a
/// codec, otherwise the first track that does
fn select_audio_track(format: &dyn FormatReader) -> Option<&Track> {
    format
        .default_track()
        .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .or_else(|| {
            format
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReturnCode;
    use crate::test_util::{mono_wav, tone};

    #[test]
    fn test_open_reports_stream_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = mono_wav(dir.path(), "a.wav", 16000, &tone(440.0, 16000, 3000));

        let session = DecodeSession::open(&path).unwrap();
        assert_eq!(session.info().sample_rate, 16000);
        assert_eq!(session.info().channels, Some(1));
        assert_eq!(session.info().frames, Some(3000));
    }

    #[test]
    fn test_sink_error_stops_decoding() {
        let dir = tempfile::tempdir().unwrap();
        // Several seconds, so the stream spans many packets
        let path = mono_wav(dir.path(), "long.wav", 8000, &tone(440.0, 8000, 40000));

        let mut session = DecodeSession::open(&path).unwrap();
        let mut calls = 0;
        let result = session.decode(ChannelSelector::FIRST, |mono| {
            calls += 1;
            assert!(!mono.is_empty());
            if calls == 1 {
                Ok(())
            } else {
                Err(SyncError::DataInvalid("rejected by sink".to_string()))
            }
        });

        let err = result.unwrap_err();
        assert!(matches!(err, SyncError::DataInvalid(ref msg) if msg == "rejected by sink"));
        assert_eq!(err.return_code(), ReturnCode::DataInvalid);
        // Nothing after the failing frame reached the sink
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_full_decode_counts_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = mono_wav(dir.path(), "a.wav", 8000, &tone(440.0, 8000, 12345));

        let mut session = DecodeSession::open(&path).unwrap();
        let mut received = 0;
        let frames = session
            .decode(ChannelSelector::FIRST, |mono| {
                received += mono.len();
                Ok(())
            })
            .unwrap();
        assert_eq!(frames, 12345);
        assert_eq!(received, 12345);
    }
}
