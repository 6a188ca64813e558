/// Staggered stimulus onsets, one per channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventSchedule {
    pub step_ms: f64,
    pub duration_ms: f64,
}
impl Default for EventSchedule {
    fn default() -> Self {
        Self {
            step_ms: 50.0,
            duration_ms: 250.0,
        }
    }
}
impl EventSchedule {
    pub fn new(step_ms: f64, duration_ms: f64) -> Self {
        Self {
            step_ms,
            duration_ms,
        }
    }
    /// Entry 0 has no event; entry `i` sits at `-(step * i) - duration`.
    pub fn offsets(&self, channels: usize) -> Vec<Option<f64>> {
        (0..channels)
            .map(|i| match i {
                0 => None,
                _ => Some(-(self.step_ms * i as f64) - self.duration_ms),
            })
            .collect()
    }
}
