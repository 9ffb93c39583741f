pub mod engine;
pub mod outcome;
pub mod status;

pub use engine::{classify, classify_outcome, ClassifyContext};
pub use outcome::{ClassifiedResult, DataAnomaly, PrecomputedResult};
pub use status::{ResultStatus, Severity};
