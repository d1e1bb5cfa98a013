use crate::api::error::FrameError;

/// Longest frame delta handed to time-integrated systems (seconds).
/// A backgrounded tab can stall for seconds; enemies should not teleport.
pub const MAX_FRAME_DT: f32 = 0.1;

/// One sampled instant: monotonic timestamp plus the delta since the last sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Milliseconds on the host's monotonic clock.
    pub now_ms: f64,
    /// Seconds since the previous sample, capped at `MAX_FRAME_DT`.
    pub dt: f32,
}

/// Samples the host clock once per frame.
///
/// All timing rules (grace periods, invulnerability, auto-ignite, spawning)
/// compare against `now_ms`, never against a frame counter.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Record this frame's timestamp. Timestamps that run backwards are
    /// clamped to the previous one so stored times never lie in the future.
    /// A non-finite timestamp is not recorded: the frame reuses the previous
    /// instant with a zero delta.
    pub fn sample(&mut self, timestamp_ms: f64) -> FrameTime {
        if !timestamp_ms.is_finite() {
            log::warn!("ignoring non-finite frame timestamp {}", timestamp_ms);
            return FrameTime {
                now_ms: self.last_ms.unwrap_or(0.0),
                dt: 0.0,
            };
        }
        match self.last_ms {
            None => {
                self.last_ms = Some(timestamp_ms);
                FrameTime {
                    now_ms: timestamp_ms,
                    dt: 0.0,
                }
            }
            Some(last) => {
                let now_ms = timestamp_ms.max(last);
                self.last_ms = Some(now_ms);
                let dt = (((now_ms - last) / 1000.0) as f32).min(MAX_FRAME_DT);
                FrameTime { now_ms, dt }
            }
        }
    }

    /// Timestamp of the latest sample, if any.
    pub fn now_ms(&self) -> Option<f64> {
        self.last_ms
    }
}

/// Boundary check for host timestamps.
pub fn validate_timestamp(timestamp_ms: f64) -> Result<f64, FrameError> {
    if timestamp_ms.is_finite() {
        Ok(timestamp_ms)
    } else {
        Err(FrameError::NonFiniteTimestamp(timestamp_ms))
    }
}
