use crate::core::etl::write_outputs;
use crate::core::table::{parse_records, serialize_rows};
use crate::core::{ConfigProvider, ConversionReport, Pipeline, Record, Storage, TransformResult};
use crate::domain::model::Size;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DESIGN_COLUMN: &str = "design";
pub const SIZE_COLUMN: &str = "size";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub design: String,
    pub size: String,
    pub quantity: u32,
}

/// Print-shop counts per design and size, from a VOA order file.
pub struct SummaryPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SummaryPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// Rows sorted by design, then S, M, L, XL, XXL, then other sizes.
    pub fn summarize(items: &[(String, Size)]) -> Vec<SummaryRow> {
        let mut counts: BTreeMap<(&str, u32, &str), u32> = BTreeMap::new();
        for (design, size) in items {
            *counts
                .entry((design.as_str(), size.rank(), size.as_str()))
                .or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|((design, _, size), quantity)| SummaryRow {
                design: design.to_string(),
                size: size.to_string(),
                quantity,
            })
            .collect()
    }

    fn log_summary(rows: &[SummaryRow]) {
        tracing::info!("{}", "=".repeat(50));
        tracing::info!("PRINTING SUMMARY BY DESIGN");
        tracing::info!("{}", "=".repeat(50));

        let mut by_design: BTreeMap<&str, Vec<&SummaryRow>> = BTreeMap::new();
        for row in rows {
            by_design.entry(row.design.as_str()).or_default().push(row);
        }
        for (design, design_rows) in &by_design {
            let total: u32 = design_rows.iter().map(|row| row.quantity).sum();
            tracing::info!("📦 {} (Total: {} items)", design, total);
            for row in design_rows {
                tracing::info!("  {:6} : {:3} pcs", row.size, row.quantity);
            }
        }

        let grand_total: u32 = rows.iter().map(|row| row.quantity).sum();
        tracing::info!("GRAND TOTAL: {} items", grand_total);

        let mut by_size: BTreeMap<&str, u32> = BTreeMap::new();
        for row in rows {
            *by_size.entry(row.size.as_str()).or_insert(0) += row.quantity;
        }
        tracing::info!("📊 Size breakdown (all designs):");
        for (size, count) in by_size {
            tracing::info!("  {:6} : {:3} pcs", size, count);
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for SummaryPipeline<S, C> {
    fn extract(&self) -> Result<Vec<Record>> {
        let data = self.storage.read_file(self.config.input_path())?;
        parse_records(&data, &[DESIGN_COLUMN, SIZE_COLUMN])
    }

    fn transform(&mut self, data: Vec<Record>) -> Result<TransformResult> {
        let mut report = ConversionReport::new("summary");
        report.rows_read = data.len();

        let mut items = Vec::new();
        for record in &data {
            match (record.field(DESIGN_COLUMN), record.field(SIZE_COLUMN)) {
                (Some(design), Some(size)) => items.push((design.to_string(), Size::from(size))),
                _ => report.skip(record.row, "missing design or size"),
            }
        }

        if items.is_empty() {
            return Err(EtlError::EmptyResult {
                what: "order items".to_string(),
            });
        }

        let rows = Self::summarize(&items);
        Self::log_summary(&rows);

        report.rows_written = rows.len();
        report.add_breakdown("design", items.iter().map(|(design, _)| design.as_str()));

        Ok(TransformResult {
            csv_output: serialize_rows(&rows)?,
            report,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = write_outputs(&self.storage, &self.config, &result)?;
        tracing::info!("✅ Summary complete!");
        Ok(output_path)
    }
}
