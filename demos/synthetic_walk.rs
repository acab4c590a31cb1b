//! Score a synthetic 2 Hz walk and print the GaitScore JSON

use std::f64::consts::PI;

use gait_flux::{GaitAnalyzer, RecordingMode, RecordingSession, SensorSample};

fn main() {
    let samples: Vec<SensorSample> = (0..3_000)
        .map(|i| {
            let t = i as f64 / 100.0;
            let phase = 2.0 * PI * 2.0 * t;
            SensorSample::new(
                i * 10,
                0.1 * (phase / 2.0).sin(),
                0.2 * (phase / 2.0).cos(),
                9.81 + 1.5 * phase.cos(),
            )
        })
        .collect();

    let mut session = RecordingSession::new(RecordingMode::Walking, samples);
    session.session_id = "synthetic-walk".to_string();
    session.sampling_rate_hz = Some(100.0);

    let score = GaitAnalyzer::new().analyze(&session);
    match serde_json::to_string_pretty(&score) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
