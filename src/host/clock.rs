//! Beat clock — a fixed-tempo stand-in for beat detection.
//!
//! Reports whether a beat boundary was crossed between successive queries,
//! which is what the VM's beat phase needs from a detector.

/// Tempo-driven beat source.
#[derive(Debug, Clone)]
pub struct BeatClock {
    bpm: f64,
    /// Index of the last beat reported, `None` before the first query.
    last_beat: Option<u64>,
}

impl BeatClock {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: bpm.max(0.0),
            last_beat: None,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Seconds between beats, or infinity when stopped.
    pub fn period(&self) -> f64 {
        if self.bpm > 0.0 {
            60.0 / self.bpm
        } else {
            f64::INFINITY
        }
    }

    /// Whether a beat started at or before `t` seconds since the last call.
    /// The beat at `t = 0` counts.
    pub fn tick(&mut self, t: f64) -> bool {
        if self.bpm <= 0.0 || t < 0.0 || !t.is_finite() {
            return false;
        }
        let index = (t / self.period()).floor() as u64;
        let crossed = self.last_beat.map_or(true, |last| index > last);
        if crossed {
            self.last_beat = Some(index);
        }
        crossed
    }

    pub fn reset(&mut self) {
        self.last_beat = None;
    }
}
