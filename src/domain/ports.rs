use crate::domain::model::{Record, TransformResult};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn report_path(&self) -> Option<&str>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<Record>>;
    fn transform(&mut self, data: Vec<Record>) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<String>;
}

/// Maps free text (a form's domain or design answer) onto known categories.
pub trait CategoryClassifier {
    /// Every category this classifier can produce, in priority order.
    fn categories(&self) -> Vec<&str>;

    /// The highest-priority category matching `text`.
    fn classify(&self, text: &str) -> Option<&str>;

    /// Every category matching `text`, in priority order.
    fn classify_all(&self, text: &str) -> Vec<&str>;
}
