//! Common test utilities for integration tests
//!
//! This module provides sine fixtures and scripted codec contexts whose
//! behavior (return codes, sample counts) is fixed by the test, plus
//! counters to observe resets and releases.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use zvd_opus::codec::opus::{Application, Bitrate, CodecResult, DecodeContext, EncodeContext};

// ============================================================================
// Audio Sample Generation
// ============================================================================

/// Interleaved f32 sine wave, amplitude 0.5
pub fn sine_f32(sample_rate: u32, frequency: f32, frames: usize, channels: u16) -> Vec<f32> {
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5;
        for _ in 0..channels {
            samples.push(sample);
        }
    }
    samples
}

/// Interleaved s16 sine wave, amplitude 16000
pub fn sine_i16(sample_rate: u32, frequency: f32, frames: usize, channels: u16) -> Vec<i16> {
    sine_f32(sample_rate, frequency, frames, channels)
        .into_iter()
        .map(|s| (s * 32000.0) as i16)
        .collect()
}

/// Little-endian bytes of s16 samples
pub fn i16_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Little-endian bytes of f32 samples
pub fn f32_bytes(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

// ============================================================================
// Scripted Codec Contexts
// ============================================================================

/// Shared counters observed by tests
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub resets: Arc<AtomicUsize>,
    pub drops: Arc<AtomicUsize>,
}

impl Counters {
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

/// Decoding context that "decodes" every packet to `frames` samples per
/// channel of a constant value, or fails with `fail_with`
pub struct ScriptedDecoder {
    pub frames: usize,
    pub channels: usize,
    pub value: i16,
    pub fail_with: Option<i32>,
    pub counters: Counters,
}

impl ScriptedDecoder {
    pub fn new(frames: usize, channels: u16, counters: &Counters) -> Self {
        ScriptedDecoder {
            frames,
            channels: channels as usize,
            value: 1000,
            fail_with: None,
            counters: counters.clone(),
        }
    }

    pub fn failing(code: i32, channels: u16, counters: &Counters) -> Self {
        let mut context = ScriptedDecoder::new(0, channels, counters);
        context.fail_with = Some(code);
        context
    }

    fn write<T: Copy>(&self, output: &mut [T], value: T) -> CodecResult<usize> {
        if let Some(code) = self.fail_with {
            return Err(code);
        }
        let frames = self.frames.min(output.len() / self.channels);
        output[..frames * self.channels].fill(value);
        Ok(frames)
    }
}

impl Drop for ScriptedDecoder {
    fn drop(&mut self) {
        self.counters.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl DecodeContext for ScriptedDecoder {
    fn open(_sample_rate: u32, channels: u16) -> CodecResult<Self> {
        Ok(ScriptedDecoder::new(960, channels, &Counters::default()))
    }

    fn reset(&mut self) -> CodecResult<()> {
        self.counters.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn decode_i16(&mut self, _packet: &[u8], output: &mut [i16], _fec: bool) -> CodecResult<usize> {
        self.write(output, self.value)
    }

    fn decode_f32(&mut self, _packet: &[u8], output: &mut [f32], _fec: bool) -> CodecResult<usize> {
        self.write(output, self.value as f32 / 32767.0)
    }

    fn probe_sample_count(&self, _packet: &[u8]) -> CodecResult<usize> {
        match self.fail_with {
            Some(code) => Err(code),
            None => Ok(self.frames),
        }
    }
}

/// Encoding context that emits a fixed-size packet per call, or fails with
/// `fail_with`
pub struct ScriptedEncoder {
    pub packet_len: usize,
    pub fail_with: Option<i32>,
    pub counters: Counters,
}

impl ScriptedEncoder {
    pub fn new(packet_len: usize, counters: &Counters) -> Self {
        ScriptedEncoder {
            packet_len,
            fail_with: None,
            counters: counters.clone(),
        }
    }

    fn emit(&self, output: &mut [u8]) -> CodecResult<usize> {
        if let Some(code) = self.fail_with {
            return Err(code);
        }
        output[..self.packet_len].fill(0xAB);
        Ok(self.packet_len)
    }
}

impl Drop for ScriptedEncoder {
    fn drop(&mut self) {
        self.counters.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl EncodeContext for ScriptedEncoder {
    fn open(_sample_rate: u32, _channels: u16, _application: Application) -> CodecResult<Self> {
        Ok(ScriptedEncoder::new(8, &Counters::default()))
    }

    fn reset(&mut self) -> CodecResult<()> {
        self.counters.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn encode_i16(&mut self, _pcm: &[i16], output: &mut [u8]) -> CodecResult<usize> {
        self.emit(output)
    }

    fn encode_f32(&mut self, _pcm: &[f32], output: &mut [u8]) -> CodecResult<usize> {
        self.emit(output)
    }

    fn set_bitrate(&mut self, _bitrate: Bitrate) -> CodecResult<()> {
        self.fail_with.map_or(Ok(()), Err)
    }

    fn set_inband_fec(&mut self, _enabled: bool) -> CodecResult<()> {
        self.fail_with.map_or(Ok(()), Err)
    }

    fn set_packet_loss_perc(&mut self, _percent: i32) -> CodecResult<()> {
        self.fail_with.map_or(Ok(()), Err)
    }
}
