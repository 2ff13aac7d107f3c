use std::time::{Duration, Instant};

use crate::audio::sink::PlaybackSink;
use crate::playout::calibration::*;
use crate::testing::ScriptedSink;

#[test]
fn test_idle_padding_takes_doubled_peak() {
    let sink = ScriptedSink::new();
    sink.push_readings([5, 9, 3, 7]);

    let calibration = Calibration::IdlePadding {
        samples: 4,
        interval_ms: 0,
    };
    assert_eq!(calibration.measure(&sink), 18);
    assert_eq!(sink.queries(), 4);
}

#[test]
fn test_disabled_does_not_query() {
    let sink = ScriptedSink::new();
    sink.set_pending_bytes(4000);

    assert_eq!(Calibration::Disabled.measure(&sink), 0);
    assert_eq!(sink.queries(), 0);
}

#[test]
fn test_zero_samples_yields_zero() {
    let sink = ScriptedSink::new();
    sink.set_pending_bytes(4000);

    assert_eq!(sample_idle_padding(&sink, 0, Duration::ZERO), 0);
}

#[test]
fn test_doubling_saturates() {
    let sink = ScriptedSink::new();
    sink.set_pending_bytes(u32::MAX - 1);

    assert_eq!(sample_idle_padding(&sink, 1, Duration::ZERO), u32::MAX);
}

#[test]
fn test_sampling_waits_between_readings() {
    let sink = ScriptedSink::new();
    let started = Instant::now();

    sample_idle_padding(&sink, 3, Duration::from_millis(5));

    // Two gaps between three readings
    assert!(started.elapsed() >= Duration::from_millis(10));
}

#[test]
fn test_platform_default() {
    let expected = if cfg!(target_os = "windows") {
        Calibration::IDLE_PADDING
    } else {
        Calibration::Disabled
    };
    assert_eq!(Calibration::platform_default(), expected);
    assert_eq!(Calibration::default(), expected);
}

struct FixedBaseline(u32);

impl BaselineCalibration for FixedBaseline {
    fn measure(&self, _sink: &dyn PlaybackSink) -> u32 {
        self.0
    }
}

#[test]
fn test_custom_strategy() {
    let sink = ScriptedSink::new();
    let strategy: &dyn BaselineCalibration = &FixedBaseline(512);
    assert_eq!(strategy.measure(&sink), 512);
}

#[test]
fn test_calibration_window_bounds() {
    assert!(Calibration::Disabled.validate().is_ok());
    assert!(Calibration::IDLE_PADDING.validate().is_ok());
    assert!(
        Calibration::IdlePadding {
            samples: MAX_CALIBRATION_SAMPLES + 1,
            interval_ms: 0,
        }
        .validate()
        .is_err()
    );
    assert!(
        Calibration::IdlePadding {
            samples: 1,
            interval_ms: MAX_CALIBRATION_INTERVAL_MS + 1,
        }
        .validate()
        .is_err()
    );

    assert!(
        Calibration::IdlePadding {
            samples: 100,
            interval_ms: 50,
        }
        .validate()
        .is_ok()
    );
    assert!(
        Calibration::IdlePadding {
            samples: 101,
            interval_ms: 50,
        }
        .validate()
        .is_err()
    );

    // Custom strategies are unbounded unless they say otherwise
    assert!(FixedBaseline(0).validate().is_ok());
}
