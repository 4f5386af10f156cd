//! Property tests for the decoder, the statistics engine and the scaler.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use proptest::prelude::*;

use kullback::analysis::{analyze, effective_max_period, index_of_coincidence};
use kullback::decode::{decode, Encoding};
use kullback::plot::{scale, Viewport, MARGIN_BOTTOM, MARGIN_TOP};

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn to_bits(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:08b}")).collect()
}

proptest! {
    #[test]
    fn base64_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let encoded = STANDARD.encode(&bytes);
        let decoded = decode(encoded.as_bytes(), Encoding::Base64, encoded.len(), false).unwrap();
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let encoded = to_hex(&bytes);
        let decoded = decode(encoded.as_bytes(), Encoding::Hex, encoded.len(), false).unwrap();
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn binary_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let encoded = to_bits(&bytes);
        let decoded = decode(encoded.as_bytes(), Encoding::Binary, encoded.len(), false).unwrap();
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn lenient_hex_never_fails(text in "[0-9a-fA-Fxz ]{0,64}") {
        prop_assert!(decode(text.as_bytes(), Encoding::Hex, text.len(), true).is_ok());
    }

    #[test]
    fn periods_are_gap_free(
        bytes in prop::collection::vec(any::<u8>(), 2..400),
        requested in 0usize..100,
    ) {
        let series = analyze(&bytes, requested).unwrap();
        let r = effective_max_period(bytes.len(), requested);
        prop_assert_eq!(series.max_period, r);
        let periods: Vec<usize> = series.samples.iter().map(|s| s.period).collect();
        prop_assert_eq!(periods, (2..=r).collect::<Vec<_>>());
        for sample in &series.samples {
            prop_assert!(sample.ioc.is_finite() && (0.0..=1.0).contains(&sample.ioc));
        }
        prop_assert!(series.domain.min < series.domain.max);
    }

    #[test]
    fn identical_bytes_have_unit_ioc(byte in any::<u8>(), n in 2usize..500) {
        prop_assert_eq!(index_of_coincidence(&vec![byte; n]), 1.0);
    }

    #[test]
    fn scaled_points_stay_in_plot_band(
        bytes in prop::collection::vec(0u8..8, 2..300),
        width in 100.0f64..2000.0,
        height in 100.0f64..2000.0,
    ) {
        let series = analyze(&bytes, 50).unwrap();
        let viewport = Viewport::new(width, height);
        let points = scale(
            &series.samples,
            series.max_period,
            viewport,
            series.domain.min,
            series.domain.max,
        );
        prop_assert_eq!(points.len(), series.len());
        for pair in points.windows(2) {
            prop_assert!(pair[0].x <= pair[1].x);
        }
        for p in &points {
            prop_assert!(p.x.is_finite() && p.y.is_finite());
            prop_assert!(p.y >= MARGIN_TOP - 1e-9);
            prop_assert!(p.y <= height - MARGIN_BOTTOM + 1e-9);
        }
    }
}
