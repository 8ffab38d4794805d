pub mod etl;
pub mod table;

pub use crate::domain::model::{ConversionReport, Record, TransformResult};
pub use crate::domain::ports::{CategoryClassifier, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
