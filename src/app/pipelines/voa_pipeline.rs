use crate::config::toml_config::ConvertConfig;
use crate::core::etl::write_outputs;
use crate::core::table::{parse_records, serialize_rows};
use crate::core::{
    CategoryClassifier, ConfigProvider, ConversionReport, Pipeline, Record, Storage,
    TransformResult,
};
use crate::domain::model::{LineItem, OrderRequest, Size};
use crate::domain::services::fields::parse_whole_number;
use crate::domain::services::{distribute, DesignSelection, RuleClassifier, SizeParser};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::collections::HashSet;

/// One printed item for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub residency: String,
    pub design: String,
    pub size: String,
}

/// Volunteer/public merchandise orders, expanded to one row per item.
///
/// A row's per-size quantity columns win when any of them is positive: each
/// quantity is split evenly over the designs picked in the aesthetics
/// question. Otherwise the free-text columns (one per design, e.g. `M,M,L`)
/// are parsed instead.
pub struct VoaPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    settings: ConvertConfig,
    designs: RuleClassifier,
    sizes: SizeParser,
}

impl<S: Storage, C: ConfigProvider> VoaPipeline<S, C> {
    pub fn new(storage: S, config: C, settings: ConvertConfig) -> Result<Self> {
        let designs = RuleClassifier::new(settings.design_rules.clone());
        Ok(Self {
            storage,
            config,
            settings,
            designs,
            sizes: SizeParser::new()?,
        })
    }

    fn order_request(&self, record: &Record, person: &str) -> OrderRequest {
        let columns = &self.settings.voa;
        let aesthetics = record.field(&columns.aesthetics).unwrap_or_default();

        let quantity_per_size = columns
            .quantity_columns
            .iter()
            .filter_map(|column| {
                let raw = record.field(&column.column)?;
                let quantity = parse_whole_number(raw).unwrap_or_else(|| {
                    tracing::warn!(
                        "⚠️  {}: unreadable quantity '{}' for size {}, counted as 0",
                        person,
                        raw,
                        column.size
                    );
                    0
                });
                Some((Size::from(column.size.as_str()), quantity))
            })
            .collect();

        OrderRequest {
            person: person.to_string(),
            designs: self
                .designs
                .classify_all(aesthetics)
                .into_iter()
                .map(str::to_string)
                .collect(),
            quantity_per_size,
        }
    }

    fn line_items(&self, record: &Record, request: &OrderRequest) -> Vec<LineItem> {
        let selection = DesignSelection::new(
            request.designs.iter().cloned(),
            &self.settings.voa.default_design,
        );

        let from_quantities: Vec<LineItem> = request
            .quantity_per_size
            .iter()
            .filter(|(_, quantity)| *quantity > 0)
            .flat_map(|(size, quantity)| distribute(*quantity, &selection, size))
            .collect();
        if !from_quantities.is_empty() {
            return from_quantities;
        }

        self.settings
            .voa
            .text_columns
            .iter()
            .filter_map(|column| {
                record
                    .field(&column.column)
                    .map(|entry| (column.design.as_str(), entry))
            })
            .flat_map(|(design, entry)| {
                self.sizes.parse(entry).into_iter().map(move |size| LineItem {
                    design: design.to_string(),
                    size,
                })
            })
            .collect()
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for VoaPipeline<S, C> {
    fn extract(&self) -> Result<Vec<Record>> {
        let columns = &self.settings.voa;
        let data = self.storage.read_file(self.config.input_path())?;
        parse_records(
            &data,
            &[
                columns.name.as_str(),
                columns.contact.as_str(),
                columns.residency.as_str(),
            ],
        )
    }

    fn transform(&mut self, data: Vec<Record>) -> Result<TransformResult> {
        let columns = &self.settings.voa;
        let mut report = ConversionReport::new("voa");
        report.rows_read = data.len();

        let mut rows = Vec::new();
        for record in &data {
            let Some(name) = record.field(&columns.name) else {
                report.skip(record.row, "missing name");
                continue;
            };

            let request = self.order_request(record, name);
            let items = self.line_items(record, &request);
            if items.is_empty() {
                report.skip(record.row, format!("{}: No orders found", name));
                continue;
            }

            let email = record.field_any(&columns.email).unwrap_or_default();
            let contact = record.field(&columns.contact).unwrap_or_default();
            let residency = record.field(&columns.residency).unwrap_or_default();

            rows.extend(items.into_iter().map(|item| OrderRow {
                name: name.to_string(),
                email: email.to_string(),
                contact: contact.to_string(),
                residency: residency.to_string(),
                design: item.design,
                size: item.size.to_string(),
            }));
        }

        if rows.is_empty() {
            return Err(EtlError::EmptyResult {
                what: "orders".to_string(),
            });
        }

        let people: HashSet<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        tracing::info!(
            "✓ {} order items from {} people ({} entries skipped)",
            rows.len(),
            people.len(),
            report.skipped.len()
        );

        report.rows_written = rows.len();
        report.add_breakdown("design", rows.iter().map(|row| row.design.as_str()));
        report.add_breakdown("size", rows.iter().map(|row| row.size.as_str()));
        report.add_breakdown("residency", rows.iter().map(|row| row.residency.as_str()));

        Ok(TransformResult {
            csv_output: serialize_rows(&rows)?,
            report,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = write_outputs(&self.storage, &self.config, &result)?;
        tracing::info!(
            "✅ Conversion complete! {} order items written.",
            result.report.rows_written
        );
        Ok(output_path)
    }
}
