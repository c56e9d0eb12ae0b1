// Tue Jan 13 2026 - Alex

use crate::heap::ObjectId;
use crate::walker::ListenerError;

/// Told about every object the walker measures, in visiting order.
///
/// Returning an error ends the walk immediately.
pub trait VisitListener {
    fn visited(&mut self, obj: ObjectId, size: u64) -> Result<(), ListenerError>;
}

impl<F> VisitListener for F
where
    F: FnMut(ObjectId, u64) -> Result<(), ListenerError>,
{
    fn visited(&mut self, obj: ObjectId, size: u64) -> Result<(), ListenerError> {
        self(obj, size)
    }
}

/// Records every visit; handy for reporting.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    pub visits: Vec<(ObjectId, u64)>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.visits.iter().map(|(_, size)| size).sum()
    }
}

impl VisitListener for RecordingListener {
    fn visited(&mut self, obj: ObjectId, size: u64) -> Result<(), ListenerError> {
        self.visits.push((obj, size));
        Ok(())
    }
}
