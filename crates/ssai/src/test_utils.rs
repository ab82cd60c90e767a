use crate::cue_points::previous_cue_point;
use crate::state::Environment;
use crate::types::{CuePoint, Timestamp};

/// In-memory environment with a fixed position and cue point list.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeEnv {
    pub position: Timestamp,
    pub cue_points: Vec<CuePoint>,
}

impl FakeEnv {
    pub fn at(position: Timestamp) -> Self {
        Self {
            position,
            cue_points: Vec::new(),
        }
    }

    pub fn with_cue(mut self, start: Timestamp, end: Timestamp, played: bool) -> Self {
        self.cue_points.push(CuePoint::new(start, end, played));
        self
    }
}

impl Environment for FakeEnv {
    fn current_time(&self) -> Timestamp {
        self.position
    }

    fn previous_cue_point_for_stream_time(&self, stream_time: Timestamp) -> Option<CuePoint> {
        previous_cue_point(&self.cue_points, stream_time)
    }
}
