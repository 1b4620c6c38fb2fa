//! Latency log persistence and reporting.

use std::sync::Arc;
use std::time::Duration;

use smartq_voice::config::LatencyConfig;
use smartq_voice::latency::{LatencyRecord, LatencyRecorder, LatencySummary, read_log};

#[test]
fn recorded_lines_read_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latency.txt");
    let recorder = LatencyRecorder::new(&path);

    for ms in [120, 80, 300] {
        recorder.record(Duration::from_millis(ms));
    }

    let records = read_log(&path).unwrap();
    let durations: Vec<u64> = records.iter().map(|r| r.duration_ms).collect();
    assert_eq!(durations, vec![120, 80, 300]);
}

#[test]
fn existing_log_is_appended_not_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latency.txt");
    std::fs::write(&path, "[2024-05-01 09:00:00] Response latency: 42ms\n").unwrap();

    LatencyRecorder::new(&path).record(Duration::from_millis(7));

    let records = read_log(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].to_string(), "[2024-05-01 09:00:00] Response latency: 42ms");
    assert_eq!(records[1].duration_ms, 7);
}

#[test]
fn sessions_share_one_log_without_torn_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latency.txt");
    let recorder = Arc::new(LatencyRecorder::new(&path));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let recorder = Arc::clone(&recorder);
            std::thread::spawn(move || {
                for j in 0..50 {
                    recorder.record(Duration::from_millis(i * 1000 + j));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 200);
    for line in raw.lines() {
        line.parse::<LatencyRecord>().unwrap();
    }
}

#[test]
fn summary_over_recorded_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latency.txt");
    let recorder = LatencyRecorder::new(&path);
    for ms in 1..=100 {
        recorder.record(Duration::from_millis(ms));
    }

    let summary = LatencySummary::from_records(&read_log(&path).unwrap()).unwrap();
    assert_eq!(summary.samples, 100);
    assert_eq!(summary.min_ms, 1);
    assert_eq!(summary.max_ms, 100);
    assert_eq!(summary.p50_ms, 50);
}

#[test]
fn disabled_log_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latency.txt");
    let recorder = LatencyRecorder::from_config(&LatencyConfig {
        enabled: false,
        log_path: path.clone(),
    });

    let record = recorder.record(Duration::from_millis(250));
    assert_eq!(record.duration_ms, 250);
    assert!(!path.exists());
}
