use crate::snapshot::{IssueRecord, Snapshot};
use crate::status::Status;
use std::collections::HashSet;

/// Issues that newly appeared in a monitored bucket since the previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub development_pending_frontend: Vec<IssueRecord>,
    pub qa_testing: Vec<IssueRecord>,
}

impl ChangeSet {
    /// Changed issues of one bucket. `Unset` never has changes.
    pub fn bucket(&self, status: Status) -> &[IssueRecord] {
        match status {
            Status::DevelopmentPendingFrontend => &self.development_pending_frontend,
            Status::QaTesting => &self.qa_testing,
            Status::Unset => &[],
        }
    }

    /// All changes in dispatch order, tagged with their bucket.
    pub fn iter(&self) -> impl Iterator<Item = (Status, &IssueRecord)> {
        Status::MONITORED
            .into_iter()
            .flat_map(move |status| self.bucket(status).iter().map(move |r| (status, r)))
    }

    pub fn len(&self) -> usize {
        self.development_pending_frontend.len() + self.qa_testing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn added(old: &[IssueRecord], new: &[IssueRecord]) -> Vec<IssueRecord> {
    let known: HashSet<u64> = old.iter().map(|r| r.number).collect();
    new.iter()
        .filter(|r| !known.contains(&r.number))
        .cloned()
        .collect()
}

/// Records of `new` whose number is absent from the same bucket of `old`.
///
/// Fetch order is preserved. Issues that left a bucket are not reported.
pub fn diff(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    ChangeSet {
        development_pending_frontend: added(
            old.bucket(Status::DevelopmentPendingFrontend),
            new.bucket(Status::DevelopmentPendingFrontend),
        ),
        qa_testing: added(old.bucket(Status::QaTesting), new.bucket(Status::QaTesting)),
    }
}
