use crate::config::toml_config::ConvertConfig;
use crate::core::etl::write_outputs;
use crate::core::table::{parse_records, serialize_rows};
use crate::core::{ConfigProvider, ConversionReport, Pipeline, Record, Storage, TransformResult};
use crate::domain::services::fields::{map_domain, shorten_name};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;

pub const SIZE_NOT_SPECIFIED: &str = "NOT SPECIFIED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeRow {
    pub name: String,
    pub domain: String,
    pub size: String,
}

/// Distribution list: who gets which size.
pub struct SizesPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    settings: ConvertConfig,
}

impl<S: Storage, C: ConfigProvider> SizesPipeline<S, C> {
    pub fn new(storage: S, config: C, settings: ConvertConfig) -> Self {
        Self {
            storage,
            config,
            settings,
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for SizesPipeline<S, C> {
    fn extract(&self) -> Result<Vec<Record>> {
        let columns = &self.settings.roster;
        let data = self.storage.read_file(self.config.input_path())?;
        parse_records(
            &data,
            &[
                columns.name.as_str(),
                columns.domain.as_str(),
                columns.size.as_str(),
            ],
        )
    }

    fn transform(&mut self, data: Vec<Record>) -> Result<TransformResult> {
        let columns = &self.settings.roster;
        let mut report = ConversionReport::new("sizes");
        report.rows_read = data.len();

        let mut rows = Vec::new();
        for record in &data {
            let (Some(name), Some(domain)) =
                (record.field(&columns.name), record.field(&columns.domain))
            else {
                report.skip(record.row, "missing name or domain");
                continue;
            };

            let name = shorten_name(name, self.settings.names.max_length);
            let size = match record.field(&columns.size) {
                Some(size) => size.to_uppercase(),
                None => {
                    tracing::warn!("⚠️  {}: Size not specified", name);
                    SIZE_NOT_SPECIFIED.to_string()
                }
            };

            rows.push(SizeRow {
                name,
                domain: map_domain(domain, &self.settings.domain_aliases),
                size,
            });
        }

        if rows.is_empty() {
            return Err(EtlError::EmptyResult {
                what: "size entries".to_string(),
            });
        }

        report.rows_written = rows.len();
        report.add_breakdown("size", rows.iter().map(|row| row.size.as_str()));
        report.add_breakdown("domain", rows.iter().map(|row| row.domain.as_str()));

        Ok(TransformResult {
            csv_output: serialize_rows(&rows)?,
            report,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = write_outputs(&self.storage, &self.config, &result)?;
        tracing::info!(
            "✅ Extraction complete! {} records processed ({} skipped).",
            result.report.rows_written,
            result.report.skipped.len()
        );
        Ok(output_path)
    }
}
