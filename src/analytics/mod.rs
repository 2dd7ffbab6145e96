pub mod dataset;
pub mod metrics;

pub use dataset::{DatasetError, SurveyDataset, SurveyRow};
pub use metrics::{key_metrics, satisfaction_by_age_group, SegmentFilter};
