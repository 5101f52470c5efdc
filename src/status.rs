/// Project "Status" buckets an issue can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    DevelopmentPendingFrontend,
    QaTesting,
    Unset,
}

/// Name of the project single-select field holding the status.
pub const STATUS_FIELD_NAME: &str = "Status";

impl Status {
    /// Buckets that produce notifications, in dispatch order.
    pub const MONITORED: [Status; 2] = [Status::DevelopmentPendingFrontend, Status::QaTesting];

    /// Classify a project field value. Unrecognized text falls back to `Unset`.
    pub fn from_field_value(value: &str) -> Self {
        match value {
            "開発待ち(Frontend)" => Status::DevelopmentPendingFrontend,
            "QA中" => Status::QaTesting,
            _ => Status::Unset,
        }
    }

    /// Display label as it appears on the project board.
    pub fn label(&self) -> &'static str {
        match self {
            Status::DevelopmentPendingFrontend => "開発待ち(Frontend)",
            Status::QaTesting => "QA中",
            Status::Unset => "未設定",
        }
    }

    /// Key used for this bucket in the snapshot file.
    pub fn key(&self) -> &'static str {
        match self {
            Status::DevelopmentPendingFrontend => "DevelopmentPendingFrontend",
            Status::QaTesting => "QATesting",
            Status::Unset => "Unset",
        }
    }
}
