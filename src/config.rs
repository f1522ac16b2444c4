use crate::error::{ConvertError, Result};
use crate::roster::{Roster, Timekeeper};
use log::debug;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

/// Converter settings read from the line-oriented configuration file.
///
/// The format is small: lines starting with `#` are comments, the first
/// significant line is `taxId[,maxInvoiceAmount]`, and every following
/// line declares one timekeeper as `name,id,classification[,rate]`.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub tax_id: String,
    pub max_invoice_amount: Decimal,
    pub timekeepers: Roster,
    /// Where the configuration was read from. The output stage copies
    /// this file verbatim next to the other artifacts.
    pub source_path: PathBuf,
}

impl Configuration {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConvertError::ConfigIo {
            file: path.display().to_string(),
            source,
        })?;

        let configuration = Self::parse(&text, path)?;
        debug!(
            "Loaded configuration from {} with {} timekeepers",
            path.display(),
            configuration.timekeepers.len()
        );
        Ok(configuration)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let file = path.display().to_string();
        let invalid = |line: usize, content: &str| ConvertError::InvalidConfigLine {
            file: file.clone(),
            line,
            content: content.to_string(),
        };

        let mut tax_id: Option<String> = None;
        let mut max_invoice_amount = Decimal::new(20_000, 0);
        let mut timekeepers = Roster::default();

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            // Comment detection looks at the raw line; an indented `#`
            // is data, not a comment.
            if raw.starts_with('#') {
                continue;
            }
            let line = raw.trim();
            if line.is_empty() {
                return Err(invalid(line_number, line));
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();

            if tax_id.is_none() {
                // First significant line carries the tax id.
                match fields.as_slice() {
                    [id] if !id.is_empty() => tax_id = Some((*id).to_string()),
                    [id, amount] if !id.is_empty() => {
                        let amount: Decimal =
                            amount.parse().map_err(|_| invalid(line_number, line))?;
                        if amount < Decimal::ZERO {
                            return Err(invalid(line_number, line));
                        }
                        tax_id = Some((*id).to_string());
                        max_invoice_amount = amount;
                    }
                    _ => return Err(invalid(line_number, line)),
                }
                continue;
            }

            let (name, id, classification, rate) = match fields.as_slice() {
                [name, id, classification] => (*name, *id, *classification, None),
                [name, id, classification, rate] => (*name, *id, *classification, Some(*rate)),
                _ => return Err(invalid(line_number, line)),
            };
            let id: i64 = id.parse().map_err(|_| invalid(line_number, line))?;
            let rate = match rate {
                Some(raw) => Some(raw.parse::<Decimal>().map_err(|_| invalid(line_number, line))?),
                None => None,
            };

            let person = Timekeeper {
                name: name.to_string(),
                id,
                classification: classification.to_string(),
                rate,
            };
            if let Err(rejected) = timekeepers.insert(person) {
                return Err(ConvertError::DuplicateTimekeeper {
                    file: file.clone(),
                    line: line_number,
                    name: rejected.name,
                });
            }
        }

        let Some(tax_id) = tax_id else {
            return Err(ConvertError::MissingTaxId { file });
        };

        Ok(Self {
            tax_id,
            max_invoice_amount,
            timekeepers,
            source_path: path.to_path_buf(),
        })
    }
}
