use crate::audio::format::*;
use std::time::Duration;

#[test]
fn test_audio_format_bytes() {
    let format = AudioFormat::STEREO_48K;

    assert_eq!(format.bytes_per_sample_frame(), 4); // 2 bytes * 2 channels
    assert_eq!(format.bytes_per_second(), 192_000); // 48000 * 4
}

#[test]
fn test_surround_format_bytes() {
    let format = AudioFormat::new(SampleFormat::I16, 48_000, ChannelConfig::Surround51);
    assert_eq!(format.bytes_per_sample_frame(), 12);

    let format = AudioFormat::new(SampleFormat::F32, 48_000, ChannelConfig::Surround71);
    assert_eq!(format.bytes_per_sample_frame(), 32);
}

#[test]
fn test_duration_conversion() {
    let format = AudioFormat::STEREO_48K;

    assert_eq!(format.duration_to_bytes(Duration::from_secs(1)), 192_000);
    assert_eq!(format.samples_to_duration(240), Duration::from_millis(5));
}

#[test]
fn test_zero_rate_duration() {
    let format = AudioFormat::new(SampleFormat::I16, 0, ChannelConfig::Stereo);
    assert_eq!(format.samples_to_duration(240), Duration::ZERO);
}

#[test]
fn test_sample_format_bytes() {
    assert_eq!(SampleFormat::I16.bytes_per_sample(), 2);
    assert_eq!(SampleFormat::F32.bytes_per_sample(), 4);
    assert_eq!(SampleFormat::I16.bits_per_sample(), 16);
    assert_eq!(SampleFormat::F32.bits_per_sample(), 32);
}

#[test]
fn test_channel_count_roundtrip() {
    for config in [
        ChannelConfig::Mono,
        ChannelConfig::Stereo,
        ChannelConfig::Surround51,
        ChannelConfig::Surround71,
    ] {
        assert_eq!(
            ChannelConfig::from_count(u16::from(config.channels())),
            Some(config)
        );
    }
    assert_eq!(ChannelConfig::from_count(3), None);
}

#[test]
fn test_preferred_channel_selection() {
    assert_eq!(ChannelConfig::for_preferred_channels(1), ChannelConfig::Stereo);
    assert_eq!(ChannelConfig::for_preferred_channels(2), ChannelConfig::Stereo);
    // Quad and wider devices get 5.1 and downmix
    assert_eq!(ChannelConfig::for_preferred_channels(4), ChannelConfig::Surround51);
    assert_eq!(ChannelConfig::for_preferred_channels(8), ChannelConfig::Surround51);
}
