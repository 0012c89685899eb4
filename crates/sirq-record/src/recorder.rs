//! `RunRecorder` — bridges `SimObserver` to run records.

use sirq_core::{TruckId, VotClass};
use sirq_fleet::Truck;
use sirq_sim::{SimObserver, StationSnapshot};

use crate::{Outcome, RecordError, RecordResult, RunKey, RunRecord, TimelineRow};

/// Checked output of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecords {
    pub key:      RunKey,
    /// One per generated truck, ascending `truck_id`.
    pub records:  Vec<RunRecord>,
    /// Empty unless the recorder was built [`with_timeline`][RunRecorder::with_timeline].
    pub timeline: Vec<TimelineRow>,
}

impl RunRecords {
    /// Total amount paid by served trucks.
    pub fn revenue(&self) -> f64 {
        self.records.iter().map(|r| r.amount_paid).sum()
    }

    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.is_failed()).count()
    }
}

/// A [`SimObserver`] that appends one [`RunRecord`] per terminal transition.
///
/// Consistency problems are stored because observer callbacks cannot fail;
/// they surface from [`finish`][Self::finish].
pub struct RunRecorder {
    key:       RunKey,
    records:   Vec<RunRecord>,
    /// Indexed by `TruckId`.
    seen:      Vec<bool>,
    duplicate: Option<TruckId>,
    timeline:  Option<Vec<TimelineRow>>,
    revenue:   f64,
}

impl RunRecorder {
    pub fn new(key: RunKey) -> Self {
        Self {
            key,
            records:   Vec::new(),
            seen:      Vec::new(),
            duplicate: None,
            timeline:  None,
            revenue:   0.0,
        }
    }

    /// Also keep one [`TimelineRow`] per processed timestamp.
    pub fn with_timeline(mut self) -> Self {
        self.timeline = Some(Vec::new());
        self
    }

    pub fn key(&self) -> &RunKey {
        &self.key
    }

    /// Check that exactly one record exists per generated truck and return
    /// them sorted by truck id.
    pub fn finish(self, generated: usize) -> RecordResult<RunRecords> {
        if let Some(id) = self.duplicate {
            return Err(RecordError::DuplicateRecord(id));
        }
        let complete = self.records.len() == generated
            && self.records.iter().all(|r| (r.truck_id as usize) < generated);
        if !complete {
            return Err(RecordError::MissingRecords { expected: generated, got: self.records.len() });
        }

        let mut records = self.records;
        records.sort_by_key(|r| r.truck_id);
        Ok(RunRecords {
            key:      self.key,
            records,
            timeline: self.timeline.unwrap_or_default(),
        })
    }

    fn mark_seen(&mut self, id: TruckId) -> bool {
        let i = id.index();
        if self.seen.len() <= i {
            self.seen.resize(i + 1, false);
        }
        !std::mem::replace(&mut self.seen[i], true)
    }
}

impl SimObserver for RunRecorder {
    fn on_terminal(&mut self, truck: &Truck, class: &VotClass) {
        if !self.mark_seen(truck.id) {
            self.duplicate.get_or_insert(truck.id);
            return;
        }
        if let Some(record) = RunRecord::from_truck(&self.key, truck, class) {
            if record.outcome == Outcome::Served {
                self.revenue += record.amount_paid;
            }
            self.records.push(record);
        }
    }

    fn on_timestamp_end(&mut self, snapshot: &StationSnapshot) {
        if let Some(timeline) = &mut self.timeline {
            timeline.push(TimelineRow {
                tick:               snapshot.tick.0,
                charging:           snapshot.charging,
                queued:             snapshot.queued,
                cumulative_revenue: self.revenue,
            });
        }
    }
}
