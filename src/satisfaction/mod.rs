pub mod batch;
pub mod domain;
pub mod import;
pub mod predict;
pub mod recommend;
pub mod template;
pub mod validation;

pub use batch::{BatchOutcome, BatchRow, RowError};
pub use domain::{
    BatchSummary, CustomerRecord, CustomerType, PredictionResult, SatisfactionLabel,
    TravelClass, TravelType,
};
pub use predict::{PredictError, PredictionAdapter};
pub use validation::{validate, RawRecord, ValidationError};
