use crate::status::Status;
use serde::{Deserialize, Serialize};

/// One fetched issue as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub title: String,
    pub number: u64,
    /// RFC 3339 timestamp, kept as received so it is rewritten unchanged.
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Classification of every fetched issue into status buckets, as of one run.
///
/// Bucket order is the order issues were fetched in. Missing keys in a
/// persisted file read back as empty buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "DevelopmentPendingFrontend", default)]
    pub development_pending_frontend: Vec<IssueRecord>,
    #[serde(rename = "QATesting", default)]
    pub qa_testing: Vec<IssueRecord>,
    #[serde(rename = "Unset", default)]
    pub unset: Vec<IssueRecord>,
}

impl Snapshot {
    pub fn bucket(&self, status: Status) -> &[IssueRecord] {
        match status {
            Status::DevelopmentPendingFrontend => &self.development_pending_frontend,
            Status::QaTesting => &self.qa_testing,
            Status::Unset => &self.unset,
        }
    }

    fn bucket_mut(&mut self, status: Status) -> &mut Vec<IssueRecord> {
        match status {
            Status::DevelopmentPendingFrontend => &mut self.development_pending_frontend,
            Status::QaTesting => &mut self.qa_testing,
            Status::Unset => &mut self.unset,
        }
    }

    /// Appends `record` to the bucket for `status`.
    ///
    /// Returns `false` without inserting when the issue number is already
    /// classified in any bucket of this snapshot.
    pub fn insert(&mut self, status: Status, record: IssueRecord) -> bool {
        if self.contains(record.number) {
            return false;
        }
        self.bucket_mut(status).push(record);
        true
    }

    pub fn contains(&self, number: u64) -> bool {
        [Status::DevelopmentPendingFrontend, Status::QaTesting, Status::Unset]
            .iter()
            .any(|status| self.bucket(*status).iter().any(|r| r.number == number))
    }

    pub fn len(&self) -> usize {
        self.development_pending_frontend.len() + self.qa_testing.len() + self.unset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
