mod projection;
mod ray;

pub use projection::{MIN_PERP, WallSegment, project, shade};
pub use ray::{Face, Sample, SampleSeq, cast};
