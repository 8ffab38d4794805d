use crate::domain::services::ClassifierRule;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Column layout and lookup tables for the form exports. Every field has a
/// default matching the current forms, so a `--config` file only needs the
/// entries it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub roster: RosterColumns,
    pub voa: VoaColumns,
    pub names: NameConfig,
    pub domain_aliases: BTreeMap<String, String>,
    pub domain_rules: Vec<ClassifierRule>,
    pub design_rules: Vec<ClassifierRule>,
    /// chrono formats tried in order when reading the submission timestamp.
    pub timestamp_formats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub timestamp: String,
    pub name: String,
    pub domain: String,
    pub number: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoaColumns {
    pub name: String,
    pub contact: String,
    /// Alternative headers; the first non-empty one wins.
    pub email: Vec<String>,
    pub residency: String,
    pub aesthetics: String,
    pub default_design: String,
    pub quantity_columns: Vec<QuantityColumn>,
    pub text_columns: Vec<TextColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityColumn {
    pub size: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColumn {
    pub design: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    pub max_length: usize,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            timestamp: "Timestamp".to_string(),
            name: "Name On Merch:".to_string(),
            domain: "Domain".to_string(),
            number: "Number on Merch (0 to 99)".to_string(),
            size: "Mention Your Size:".to_string(),
        }
    }
}

fn text_order_header(subject: &str) -> String {
    format!(
        "For {}, enter quantity and Size.\n\n\
         Example: Suppose you want to order 3 'M' sized black T-shirts, enter them as M,M,M.\n\
         Similarly, if you want 5 'XL' sized tees, enter them as \nXL,XL,XL,XL,XL\n\
         If you want to order 2 'M' sized and 1 'L' sized tee, \nenter them as M,M,L.\n\n\
         Enter 'None', in case you do not wish to order for this design.",
        subject
    )
}

impl Default for VoaColumns {
    fn default() -> Self {
        let quantity_columns = ["S", "M", "L", "XL", "XXL"]
            .iter()
            .map(|size| QuantityColumn {
                size: size.to_string(),
                column: format!("Sizes X Quantities (Oversized T-shirt) [{}]", size),
            })
            .collect();

        let text_columns = [
            ("Technocracy", "Technocracy Blending Merch"),
            ("Dharma", "Dharma Warrior Merch"),
            ("Abyss", "Conquering The Abyss Merch"),
            ("Jacket", "Jacket"),
        ]
        .iter()
        .map(|(design, subject)| TextColumn {
            design: design.to_string(),
            column: text_order_header(subject),
        })
        .collect();

        Self {
            name: "NAME".to_string(),
            contact: "CONTACT NUMBER".to_string(),
            email: vec!["Email Address".to_string(), "E-MAIL".to_string()],
            residency: "Choose your place of residency (FOR DISTRIBUTION PURPOSES)".to_string(),
            aesthetics: "Choose your aesthetics! (Offers are available at specific order quantities. For combo order select multiple options)".to_string(),
            default_design: "Technocracy".to_string(),
            quantity_columns,
            text_columns,
        }
    }
}

impl Default for NameConfig {
    fn default() -> Self {
        Self { max_length: 12 }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        let domain_aliases = [
            ("Sponsorship & Marketing", "Sponsorship"),
            ("Media & Public Relations", "Media and PR"),
            ("Design & Editing", "Design & Editing"),
            ("Vigyaan", "Vigyaan"),
            ("Event Management", "Event Management"),
            ("Tech", "Tech"),
            ("Documentation", "Documentation"),
        ]
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            roster: RosterColumns::default(),
            voa: VoaColumns::default(),
            names: NameConfig::default(),
            domain_aliases,
            domain_rules: crate::domain::services::RuleClassifier::domains()
                .rules()
                .to_vec(),
            design_rules: crate::domain::services::RuleClassifier::designs()
                .rules()
                .to_vec(),
            timestamp_formats: vec![
                "%m/%d/%Y %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y/%m/%d %H:%M:%S".to_string(),
                "%d/%m/%Y %H:%M:%S".to_string(),
                "%Y/%m/%d %I:%M:%S %p".to_string(),
            ],
        }
    }
}

impl ConvertConfig {
    /// Load column and rule settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Defaults unless a config file is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("📁 Loading column configuration from: {}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}

impl Validate for ConvertConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("roster.name", &self.roster.name)?;
        validate_non_empty_string("roster.domain", &self.roster.domain)?;
        validate_non_empty_string("roster.number", &self.roster.number)?;
        validate_non_empty_string("roster.size", &self.roster.size)?;
        validate_non_empty_string("voa.name", &self.voa.name)?;
        validate_non_empty_string("voa.default_design", &self.voa.default_design)?;
        validate_positive_number("names.max_length", self.names.max_length, 1)?;
        validate_non_empty_list("domain_rules", &self.domain_rules)?;
        validate_non_empty_list("design_rules", &self.design_rules)?;

        for rule in self.domain_rules.iter().chain(&self.design_rules) {
            validate_non_empty_string("rules.category", &rule.category)?;
            validate_non_empty_list(&format!("rules.{}.patterns", rule.category), &rule.patterns)?;
            for pattern in &rule.patterns {
                validate_non_empty_string(&format!("rules.{}.patterns", rule.category), pattern)?;
            }
        }

        for column in &self.voa.quantity_columns {
            validate_non_empty_string("voa.quantity_columns.size", &column.size)?;
        }

        Ok(())
    }
}
