//! End-to-end runs through the public session API.

use std::sync::Arc;
use std::thread;

use kullback::plot::{MARGIN_LEFT, MARGIN_RIGHT};
use kullback::{
    AnalysisConfig, AnalysisError, AnalysisRequest, AnalysisSession, Encoding, HitResult,
    SharedSession,
};

/// Vigenere-style ciphertext with a 5-byte repeating key.
fn periodic_ciphertext(len: usize) -> Vec<u8> {
    let plaintext = b"it was the best of times it was the worst of times it was the age of wisdom";
    let key = b"LEMON";
    plaintext
        .iter()
        .cycle()
        .take(len)
        .enumerate()
        .map(|(i, &p)| p.wrapping_add(key[i % key.len()]))
        .collect()
}

#[test]
fn key_length_multiples_stand_out() {
    let data = periodic_ciphertext(600);
    let config = AnalysisConfig {
        max_period: 20,
        ..AnalysisConfig::default()
    };
    let mut session = AnalysisSession::new();
    session
        .run_analysis(&AnalysisRequest::new(&data, Encoding::File, &config))
        .unwrap();

    let snap = session.snapshot().unwrap();
    let best = snap
        .samples()
        .iter()
        .max_by(|a, b| a.ioc.total_cmp(&b.ioc))
        .unwrap();
    assert_eq!(best.period % 5, 0, "best period {}", best.period);

    let five = snap.series().sample_for(5).unwrap().ioc;
    let four = snap.series().sample_for(4).unwrap().ioc;
    assert!(five > four);
}

#[test]
fn encodings_agree() {
    let config = AnalysisConfig::default();
    let text = b"kullback kullback kullback";
    let hex: String = text.iter().map(|b| format!("{b:02X}")).collect();
    let bits: String = text.iter().map(|b| format!("{b:08b}")).collect();

    let mut reference = AnalysisSession::new();
    reference
        .run_analysis(&AnalysisRequest::new(text, Encoding::Utf8, &config))
        .unwrap();

    for (input, encoding) in [
        (hex.as_bytes(), Encoding::Hex),
        (bits.as_bytes(), Encoding::Binary),
        (b"a3VsbGJhY2sga3VsbGJhY2sga3VsbGJhY2s=".as_slice(), Encoding::Base64),
    ] {
        let mut session = AnalysisSession::new();
        session
            .run_analysis(&AnalysisRequest::new(input, encoding, &config))
            .unwrap();
        assert_eq!(session.series(), reference.series(), "{encoding}");
    }
}

#[test]
fn strict_and_lenient_hex() {
    let mut config = AnalysisConfig::default();
    let mut session = AnalysisSession::new();
    let input = b"41 42 43 41 42 43";

    let err = session
        .run_analysis(&AnalysisRequest::new(input, Encoding::Hex, &config))
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert!(!session.is_valid());

    // Lenient pairs sit at even offsets, so only "41", "43" and "42" survive
    config.lenient = true;
    session
        .run_analysis(&AnalysisRequest::new(input, Encoding::Hex, &config))
        .unwrap();
    assert_eq!(session.max_period(), Some(2));
    assert_eq!(session.series().len(), 1);

    let err = session
        .run_analysis(&AnalysisRequest::new(b"4zz", Encoding::Hex, &config))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { len: 0 }));
    assert!(!session.is_valid());
}

#[test]
fn query_follows_scaled_points() {
    let config = AnalysisConfig::default();
    let mut session = AnalysisSession::new();
    session
        .run_analysis(&AnalysisRequest::new(
            &periodic_ciphertext(200),
            Encoding::File,
            &config,
        ))
        .unwrap();

    let points = session.points().to_vec();
    assert!(points[0].x > MARGIN_LEFT);
    assert!(points.last().unwrap().x > config.display_width - MARGIN_RIGHT);

    for (i, p) in points.iter().enumerate() {
        assert_eq!(session.query(p.x, p.y), HitResult::NearestPoint(i));
    }
    assert_eq!(session.query(-500.0, -500.0), HitResult::None);

    session.clear();
    assert_eq!(session.query(points[0].x, points[0].y), HitResult::None);
}

#[test]
fn shared_session_readers_see_whole_snapshots() {
    let config = AnalysisConfig::default();
    let shared = Arc::new(SharedSession::new());
    shared
        .run_analysis(&AnalysisRequest::new(b"abcabcabcabcabc", Encoding::Utf8, &config))
        .unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..200 {
                    if let Some(snap) = shared.snapshot() {
                        assert_eq!(snap.samples().len(), snap.points().len());
                        assert_eq!(snap.samples().len(), snap.outliers().len());
                        assert_eq!(snap.samples().len(), snap.max_period() - 1);
                    }
                }
            })
        })
        .collect();

    let long = periodic_ciphertext(300);
    for round in 0..50 {
        let input: &[u8] = if round % 2 == 0 { &long } else { b"abcabcabcabcabc" };
        shared
            .run_analysis(&AnalysisRequest::new(input, Encoding::File, &config))
            .unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert!(shared.is_valid());
}
