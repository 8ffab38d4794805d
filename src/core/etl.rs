use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&mut self) -> Result<String> {
        tracing::info!("📋 Reading input file...");
        let raw_data = self.pipeline.extract()?;
        tracing::info!("✓ Found {} entries", raw_data.len());

        tracing::debug!("Transforming data...");
        let transformed = self.pipeline.transform(raw_data)?;
        tracing::info!(
            "✓ Produced {} rows ({} skipped)",
            transformed.report.rows_written,
            transformed.report.skipped.len()
        );

        let output_path = self.pipeline.load(transformed)?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(output_path)
    }
}

/// Shared load step: the CSV goes to the configured output and, when asked,
/// the run report goes next to it as JSON.
pub fn write_outputs<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    result: &TransformResult,
) -> Result<String> {
    let output_path = config.output_path().to_string();
    storage.write_file(&output_path, &result.csv_output)?;

    if let Some(report_path) = config.report_path() {
        let json = serde_json::to_string_pretty(&result.report)?;
        storage.write_file(report_path, json.as_bytes())?;
        tracing::debug!("Run report written to {}", report_path);
    }

    Ok(output_path)
}
