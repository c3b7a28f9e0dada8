// SPDX-License-Identifier: Apache-2.0
//! Optional timestamps for time-extended vertices.

/// One end of a vertex's time range: a wall-clock time (microseconds) and a
/// frame number, each independently optional.
///
/// "Not set" is distinct from zero; a vertex imported without timing keeps
/// both fields `None` and is parked outside the extents by the temporal
/// layout rather than sorted to the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeMark {
    /// Time in microseconds, if known.
    pub time: Option<f64>,
    /// Frame number, if known.
    pub frame: Option<u32>,
}

impl TimeMark {
    /// A mark with neither time nor frame set.
    pub const UNSET: Self = Self {
        time: None,
        frame: None,
    };

    /// Creates a mark carrying both a time and a frame number.
    #[must_use]
    pub fn new(time: f64, frame: u32) -> Self {
        Self {
            time: Some(time),
            frame: Some(frame),
        }
    }

    /// Creates a mark carrying only a time.
    #[must_use]
    pub fn from_time(time: f64) -> Self {
        Self {
            time: Some(time),
            frame: None,
        }
    }

    /// True when neither field is set.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.time.is_none() && self.frame.is_none()
    }
}
