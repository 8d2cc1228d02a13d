//! Error handling tests
//!
//! These tests verify that the converters and sessions handle malformed,
//! truncated, or garbage input without panicking. All error cases should
//! return appropriate Error variants, not crash.

use std::panic;
use zvd_opus::codec::pcm::{deserialize, serialize, serialize_quantized, PcmBuffer};
use zvd_opus::codec::opus::DecoderSession;
use zvd_opus::codec::{create_decoder, create_encoder, AudioFrame, Decoder, Encoder};
use zvd_opus::error::{status, status_message, Error};
use zvd_opus::format::{AudioFormat, Packet};
use zvd_opus::util::{Buffer, SampleFormat, SampleLayout, Timestamp};

#[path = "common/mod.rs"]
mod common;

use common::*;

// ============================================================================
// Helper Functions
// ============================================================================

/// Test that an operation returns an error (not panics)
fn assert_error_not_panic<F: FnOnce() -> Result<R, Error> + panic::UnwindSafe, R>(
    f: F,
    description: &str,
) -> Error {
    match panic::catch_unwind(f) {
        Ok(Ok(_)) => panic!("{} succeeded instead of returning error", description),
        Ok(Err(e)) => e,
        Err(_) => panic!("Panic occurred during: {}", description),
    }
}

// ============================================================================
// Error Values
// ============================================================================

#[test]
fn test_status_codes_have_messages() {
    for code in [
        status::BAD_ARG,
        status::BUFFER_TOO_SMALL,
        status::INTERNAL_ERROR,
        status::INVALID_PACKET,
        status::UNIMPLEMENTED,
        status::INVALID_STATE,
        status::ALLOC_FAIL,
    ] {
        let err = Error::from_status(code);
        assert_eq!(err.codec_code(), Some(code));
        assert!(err.to_string().contains(status_message(code)));
    }
}

#[test]
fn test_non_negative_status_is_internal() {
    assert!(matches!(Error::from_status(0), Error::CodecInternal(_)));
    assert_eq!(Error::bad_argument("x").codec_code(), None);
}

// ============================================================================
// Converter Error Handling
// ============================================================================

#[test]
fn test_garbage_bytes_never_panic() {
    let garbage: Vec<u8> = (0..1001u32).map(|i| (i * 37 % 256) as u8).collect();
    for sample_format in [SampleFormat::F32, SampleFormat::I16] {
        for layout in [SampleLayout::Interleaved, SampleLayout::Planar] {
            let format = AudioFormat::new(8000, 2, sample_format, layout);
            let buffer = deserialize(&garbage, format, None).unwrap();
            assert_eq!(buffer.frame_count(), 1001 / format.bytes_per_frame());
            assert!(serialize_quantized(&buffer).is_ok());
        }
    }
}

#[test]
fn test_unsupported_representations() {
    for sample_format in [SampleFormat::U8, SampleFormat::I32, SampleFormat::F64] {
        let format = AudioFormat::interleaved(48000, 2, sample_format);
        let err = assert_error_not_panic(|| deserialize(&[0; 64], format, None), "deserialize");
        assert!(matches!(err, Error::InvalidFormat(_)));
    }
}

#[test]
fn test_empty_buffer_serialization() {
    let buffer = PcmBuffer::new(AudioFormat::default(), 0).unwrap();
    let err = assert_error_not_panic(|| serialize(&buffer), "serialize empty buffer");
    assert!(matches!(err, Error::BadArgument(_)));
}

// ============================================================================
// Push/Pull Error Handling
// ============================================================================

#[test]
fn test_pcm_decoder_truncated_packet() {
    let format = AudioFormat::interleaved(16000, 2, SampleFormat::F32);
    let mut decoder = create_decoder("pcm", format).unwrap();
    decoder
        .send_packet(&Packet::new(Buffer::from_vec(vec![0; 7])))
        .unwrap();
    assert!(matches!(decoder.receive_frame(), Err(Error::BadArgument(_))));
    assert!(matches!(decoder.receive_frame(), Err(Error::TryAgain)));
}

#[test]
fn test_pcm_encoder_frame_without_data() {
    let format = AudioFormat::interleaved(16000, 1, SampleFormat::I16);
    let mut encoder = create_encoder("pcm", format).unwrap();
    let frame = AudioFrame::new(160, 16000, 1, SampleFormat::I16);
    assert!(matches!(encoder.send_frame(&frame), Err(Error::BadArgument(_))));
    assert!(matches!(encoder.receive_packet(), Err(Error::TryAgain)));
}

#[test]
fn test_pcm_codec_round_trip() {
    let format = AudioFormat::interleaved(16000, 1, SampleFormat::I16);
    let mut encoder = create_encoder("pcm_s16le", format).unwrap();
    let mut decoder = create_decoder("pcm_s16le", format).unwrap();

    let mut frame = AudioFrame::new(160, 16000, 1, SampleFormat::I16);
    frame.data = Buffer::from_vec(i16_bytes(&sine_i16(16000, 440.0, 160, 1)));
    encoder.send_frame(&frame).unwrap();

    decoder.send_packet(&encoder.receive_packet().unwrap()).unwrap();
    let decoded = decoder.receive_frame().unwrap();
    assert_eq!(decoded.data, frame.data);
    assert_eq!(decoded.nb_samples, 160);
}

#[test]
fn test_decode_fixed_huge_frame_size() {
    let counters = Counters::default();
    let format = AudioFormat::interleaved(48000, 2, SampleFormat::I16);
    let context = ScriptedDecoder::new(960, 2, &counters);
    let mut decoder = DecoderSession::open_with(format, move |_, _| Ok(context)).unwrap();

    let err = assert_error_not_panic(
        panic::AssertUnwindSafe(|| decoder.decode_fixed(&[1], usize::MAX / 4, false)),
        "decode_fixed with a huge frame size",
    );
    assert!(matches!(err, Error::BadArgument(_)));
}

#[test]
fn test_pts_near_limit_does_not_overflow() {
    let counters = Counters::default();
    let format = AudioFormat::interleaved(48000, 2, SampleFormat::I16);
    let context = ScriptedDecoder::new(960, 2, &counters);
    let mut decoder = DecoderSession::open_with(format, move |_, _| Ok(context)).unwrap();

    let packet = Packet::with_pts(Buffer::from_vec(vec![1]), Timestamp::new(i64::MAX - 10));
    decoder.send_packet(&packet).unwrap();
    let err = assert_error_not_panic(
        panic::AssertUnwindSafe(|| decoder.receive_frame()),
        "receive_frame near the pts limit",
    );
    assert!(matches!(err, Error::BadArgument(_)));

    let mut pcm = create_decoder("pcm_s16le", format).unwrap();
    let packet = Packet::with_pts(Buffer::from_vec(vec![0; 8]), Timestamp::new(i64::MAX));
    pcm.send_packet(&packet).unwrap();
    let err = assert_error_not_panic(
        panic::AssertUnwindSafe(|| pcm.receive_frame()),
        "pcm receive_frame near the pts limit",
    );
    assert!(matches!(err, Error::BadArgument(_)));
}

#[cfg(feature = "opus-codec")]
#[test]
fn test_opus_decoder_garbage_packets() {
    let mut decoder = create_decoder("opus", AudioFormat::default()).unwrap();
    for garbage in [vec![0xFFu8; 3], vec![0x03], vec![0xFB, 0xFF, 0xFF, 0xFF]] {
        decoder.send_packet(&Packet::new(Buffer::from_vec(garbage))).unwrap();
        assert!(matches!(decoder.receive_frame(), Err(Error::Codec(_))));
    }
}
