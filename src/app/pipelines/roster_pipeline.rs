use crate::config::toml_config::ConvertConfig;
use crate::core::etl::write_outputs;
use crate::core::table::{encode_records, has_column, parse_records};
use crate::core::{
    CategoryClassifier, ConfigProvider, ConversionReport, Pipeline, Record, Storage,
    TransformResult,
};
use crate::domain::model::{Registrant, Resolution};
use crate::domain::services::fields::{map_domain, parse_timestamp, parse_whole_number, shorten_name};
use crate::domain::services::{allocate_numbers, category_flags, RuleClassifier};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDateTime;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    /// Numbered jerseys, ordered by submission time.
    Cores,
    Exes,
}

impl RosterKind {
    fn as_str(&self) -> &'static str {
        match self {
            RosterKind::Cores => "cores",
            RosterKind::Exes => "exes",
        }
    }
}

#[derive(Debug, Clone)]
struct RosterEntry {
    name: String,
    domain: String,
    requested_number: Option<u32>,
    submitted_at: Option<NaiveDateTime>,
}

/// Organizer roster for the print template: name, mapped domain, optional
/// jersey number, and one TRUE/FALSE column per domain category.
pub struct RosterPipeline<S: Storage, C: ConfigProvider, R: Rng> {
    storage: S,
    config: C,
    settings: ConvertConfig,
    classifier: RuleClassifier,
    kind: RosterKind,
    rng: R,
}

impl<S: Storage, C: ConfigProvider, R: Rng> RosterPipeline<S, C, R> {
    pub fn new(storage: S, config: C, settings: ConvertConfig, kind: RosterKind, rng: R) -> Self {
        let classifier = RuleClassifier::new(settings.domain_rules.clone());
        Self {
            storage,
            config,
            settings,
            classifier,
            kind,
            rng,
        }
    }

    fn entry_from(&self, record: &Record) -> Option<RosterEntry> {
        let columns = &self.settings.roster;
        let name = record.field(&columns.name)?;
        let domain = record.field(&columns.domain)?;

        let requested_number = match self.kind {
            RosterKind::Cores => record.field(&columns.number).and_then(|raw| {
                let parsed = parse_whole_number(raw);
                if parsed.is_none() {
                    tracing::debug!("Row {}: unreadable number '{}'", record.row, raw);
                }
                parsed
            }),
            RosterKind::Exes => None,
        };

        let submitted_at = record
            .field(&columns.timestamp)
            .and_then(|raw| parse_timestamp(raw, &self.settings.timestamp_formats));

        Some(RosterEntry {
            name: shorten_name(name, self.settings.names.max_length),
            domain: map_domain(domain, &self.settings.domain_aliases),
            requested_number,
            submitted_at,
        })
    }

    /// Stable sort by submission time; rows without a readable timestamp keep
    /// their relative order after the dated ones.
    fn arrival_order(entries: &mut [RosterEntry]) {
        entries.sort_by_key(|entry| (entry.submitted_at.is_none(), entry.submitted_at));
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec!["name".to_string(), "domain".to_string()];
        if self.kind == RosterKind::Cores {
            header.push("number".to_string());
        }
        header.extend(self.classifier.categories().into_iter().map(str::to_string));
        header
    }
}

impl<S: Storage, C: ConfigProvider, R: Rng> Pipeline for RosterPipeline<S, C, R> {
    fn extract(&self) -> Result<Vec<Record>> {
        let columns = &self.settings.roster;
        let mut required = vec![columns.name.as_str(), columns.domain.as_str()];
        if self.kind == RosterKind::Cores {
            required.push(columns.number.as_str());
        }

        let data = self.storage.read_file(self.config.input_path())?;
        parse_records(&data, &required)
    }

    fn transform(&mut self, data: Vec<Record>) -> Result<TransformResult> {
        let mut report = ConversionReport::new(self.kind.as_str());
        report.rows_read = data.len();

        if self.kind == RosterKind::Cores && !has_column(&data, &self.settings.roster.timestamp) {
            tracing::warn!(
                "⚠️  No '{}' column, numbers are allocated in file order",
                self.settings.roster.timestamp
            );
        }

        let mut entries = Vec::new();
        for record in &data {
            match self.entry_from(record) {
                Some(entry) => entries.push(entry),
                None => report.skip(record.row, "missing name or domain"),
            }
        }

        if entries.is_empty() {
            return Err(EtlError::EmptyResult {
                what: "roster entries".to_string(),
            });
        }

        let numbers: Vec<Option<u8>> = match self.kind {
            RosterKind::Cores => {
                Self::arrival_order(&mut entries);
                tracing::info!("🔍 Checking for number conflicts...");
                let registrants: Vec<Registrant> = entries
                    .iter()
                    .enumerate()
                    .map(|(submission_order, entry)| Registrant {
                        name: entry.name.clone(),
                        requested_number: entry.requested_number,
                        submission_order,
                    })
                    .collect();

                let allocation = allocate_numbers(&registrants, &mut self.rng)?;
                report.substitutions = allocation
                    .assignments
                    .iter()
                    .filter(|a| a.resolution == Resolution::Substituted)
                    .cloned()
                    .collect();
                report.conflicts = allocation.conflicts;
                allocation
                    .assignments
                    .iter()
                    .map(|assignment| Some(assignment.number))
                    .collect()
            }
            RosterKind::Exes => vec![None; entries.len()],
        };

        let rows: Vec<Vec<String>> = entries
            .iter()
            .zip(&numbers)
            .map(|(entry, number)| {
                let mut row = vec![entry.name.clone(), entry.domain.clone()];
                if let Some(number) = number {
                    row.push(number.to_string());
                }
                row.extend(
                    category_flags(&self.classifier, &entry.domain)
                        .into_iter()
                        .map(str::to_string),
                );
                row
            })
            .collect();

        report.rows_written = rows.len();
        report.add_breakdown("domain", entries.iter().map(|entry| entry.domain.as_str()));

        Ok(TransformResult {
            csv_output: encode_records(&self.header(), rows)?,
            report,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = write_outputs(&self.storage, &self.config, &result)?;
        tracing::info!(
            "✅ Conversion complete! {} records processed.",
            result.report.rows_written
        );
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage {
        files: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl MemoryStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .borrow_mut()
                .insert(path.to_string(), content.as_bytes().to_vec());
            storage
        }
    }

    impl Storage for MemoryStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct Paths;

    impl ConfigProvider for Paths {
        fn input_path(&self) -> &str {
            "in.csv"
        }
        fn output_path(&self) -> &str {
            "out.csv"
        }
        fn report_path(&self) -> Option<&str> {
            None
        }
    }

    fn pipeline(kind: RosterKind, csv: &str) -> RosterPipeline<MemoryStorage, Paths, StdRng> {
        RosterPipeline::new(
            MemoryStorage::with_file("in.csv", csv),
            Paths,
            ConvertConfig::default(),
            kind,
            StdRng::seed_from_u64(5),
        )
    }

    fn output_lines(result: &TransformResult) -> Vec<String> {
        String::from_utf8(result.csv_output.clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    const CORES: &str = "Timestamp,Name On Merch:,Domain,Number on Merch (0 to 99)\n\
        10/14/2025 10:30:00,Ravi,Tech,7\n\
        10/14/2025 09:15:00,Meera,Media & Public Relations,7.0\n\
        10/14/2025 11:00:00,,Tech,3\n\
        10/14/2025 10:00:00,Venkataraman Iyer,Sponsorship & Marketing,12\n";

    #[test]
    fn test_cores_sorted_by_timestamp_with_conflict() {
        let mut pipeline = pipeline(RosterKind::Cores, CORES);
        let records = pipeline.extract().unwrap();
        let result = pipeline.transform(records).unwrap();
        let lines = output_lines(&result);

        assert_eq!(
            lines[0],
            "name,domain,number,design,tech,spons,pr,em,doc,vigyaan"
        );
        assert_eq!(lines[1], "Meera,Media and PR,7,FALSE,FALSE,FALSE,TRUE,FALSE,FALSE,FALSE");
        assert_eq!(
            lines[2],
            "Venkataraman,Sponsorship,12,FALSE,FALSE,TRUE,FALSE,FALSE,FALSE,FALSE"
        );
        // Latest arrival loses the contested 7 and cannot land on a taken number.
        assert!(lines[3].starts_with("Ravi,Tech,"));
        let ravi: u8 = lines[3].split(',').nth(2).unwrap().parse().unwrap();
        assert!(ravi != 7 && ravi != 12);

        assert_eq!(result.report.rows_read, 4);
        assert_eq!(result.report.rows_written, 3);
        assert_eq!(result.report.skipped.len(), 1);
        assert_eq!(result.report.skipped[0].row, 4);
        assert_eq!(result.report.conflicts.len(), 1);
        assert_eq!(result.report.conflicts[0].name, "Ravi");
    }

    #[test]
    fn test_exes_have_no_number_column() {
        let csv = "Name On Merch:,Domain\nAsha,Documentation\nKiran,Vigyaan\n";
        let mut pipeline = pipeline(RosterKind::Exes, csv);
        let records = pipeline.extract().unwrap();
        let result = pipeline.transform(records).unwrap();
        let lines = output_lines(&result);

        assert_eq!(lines[0], "name,domain,design,tech,spons,pr,em,doc,vigyaan");
        assert_eq!(lines[1], "Asha,Documentation,FALSE,FALSE,FALSE,FALSE,FALSE,TRUE,FALSE");
        assert_eq!(lines[2], "Kiran,Vigyaan,FALSE,FALSE,FALSE,FALSE,FALSE,FALSE,TRUE");
    }

    #[test]
    fn test_cores_require_number_column() {
        let csv = "Name On Merch:,Domain\nAsha,Tech\n";
        let err = pipeline(RosterKind::Cores, csv).extract().unwrap_err();
        assert!(matches!(err, EtlError::MissingColumnError { .. }));
    }

    #[test]
    fn test_all_rows_skipped_is_empty_result() {
        let csv = "Name On Merch:,Domain\n,Tech\nAsha,\n";
        let mut pipeline = pipeline(RosterKind::Exes, csv);
        let records = pipeline.extract().unwrap();
        let err = pipeline.transform(records).unwrap_err();
        assert!(matches!(err, EtlError::EmptyResult { .. }));
    }

    #[test]
    fn test_unreadable_number_is_substituted() {
        let csv = "Name On Merch:,Domain,Number on Merch (0 to 99)\nAsha,Tech,lucky\n";
        let mut pipeline = pipeline(RosterKind::Cores, csv);
        let records: Vec<Record> = pipeline.extract().unwrap();
        let result = pipeline.transform(records).unwrap();

        assert_eq!(result.report.substitutions.len(), 1);
        let number: u8 = output_lines(&result)[1].split(',').nth(2).unwrap().parse().unwrap();
        assert!((1..=99).contains(&number));
    }

    fn names_and_numbers(result: &TransformResult) -> Vec<(String, String)> {
        output_lines(result)[1..]
            .iter()
            .map(|line| {
                let mut cells = line.split(',');
                let name = cells.next().unwrap().to_string();
                let number = cells.nth(1).unwrap().to_string();
                (name, number)
            })
            .collect()
    }

    #[test]
    fn test_unreadable_and_blank_timestamps_sort_last_in_file_order() {
        let csv = "Timestamp,Name On Merch:,Domain,Number on Merch (0 to 99)\n\
            garbage,Zed,Tech,1\n\
            10/14/2025 12:00:00,Late,Tech,2\n\
            ,Blank,Tech,3\n\
            10/14/2025 08:00:00,Early,Tech,4\n";
        let mut pipeline = pipeline(RosterKind::Cores, csv);
        let records = pipeline.extract().unwrap();
        let result = pipeline.transform(records).unwrap();

        assert_eq!(
            names_and_numbers(&result),
            [
                ("Early".to_string(), "4".to_string()),
                ("Late".to_string(), "2".to_string()),
                ("Zed".to_string(), "1".to_string()),
                ("Blank".to_string(), "3".to_string()),
            ]
        );
        assert!(result.report.conflicts.is_empty());
    }

    #[test]
    fn test_without_timestamp_column_first_in_file_wins() {
        let csv = "Name On Merch:,Domain,Number on Merch (0 to 99)\n\
            Zed,Tech,9\n\
            Asha,Tech,9\n\
            Kiran,Tech,20\n";
        let mut pipeline = pipeline(RosterKind::Cores, csv);
        let records = pipeline.extract().unwrap();
        let result = pipeline.transform(records).unwrap();
        let rows = names_and_numbers(&result);

        let names: Vec<&str> = rows.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Zed", "Asha", "Kiran"]);
        assert_eq!(rows[0].1, "9");
        assert_ne!(rows[1].1, "9");
        assert_eq!(rows[2].1, "20");
        assert_eq!(result.report.conflicts.len(), 1);
        assert_eq!(result.report.conflicts[0].name, "Asha");
    }
}
