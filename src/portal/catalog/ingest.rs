//! CSV seeding for the catalog. Rows carry one entry each; set-valued
//! eligibility cells are pipe-separated labels and a blank cell leaves the
//! criterion unrestricted.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{EligibilityRules, EntryDraft, EntryKind};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("unable to open seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed seed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

/// Parse catalog entry drafts from a seed CSV on disk.
pub fn drafts_from_path(path: impl AsRef<Path>) -> Result<Vec<EntryDraft>, CatalogImportError> {
    let file = File::open(path)?;
    drafts_from_reader(file)
}

/// Parse catalog entry drafts from any CSV reader.
pub fn drafts_from_reader<R: Read>(reader: R) -> Result<Vec<EntryDraft>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut drafts = Vec::new();
    for (index, record) in csv_reader.deserialize::<SeedRow>().enumerate() {
        let row = record?;
        // header is line 1, first record line 2
        let line = index + 2;
        drafts.push(row.into_draft(line)?);
    }

    Ok(drafts)
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    kind: String,
    title: String,
    description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    benefits: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    application_process: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    education: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    income: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    marital_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    occupation: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    disability: Option<String>,
    #[serde(default)]
    age_min: Option<u8>,
    #[serde(default)]
    age_max: Option<u8>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    last_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    active: Option<String>,
}

impl SeedRow {
    fn into_draft(self, line: usize) -> Result<EntryDraft, CatalogImportError> {
        let row_error = |message: String| CatalogImportError::Row { row: line, message };

        let kind = EntryKind::from_str(&self.kind).map_err(row_error)?;
        if self.title.is_empty() {
            return Err(row_error("title is required".to_string()));
        }

        let eligibility = EligibilityRules {
            category: split_cell(self.category.as_deref()).map_err(row_error)?,
            gender: split_cell(self.gender.as_deref()).map_err(row_error)?,
            state: split_cell_strings(self.state.as_deref()),
            education: split_cell(self.education.as_deref()).map_err(row_error)?,
            income: split_cell(self.income.as_deref()).map_err(row_error)?,
            marital_status: split_cell(self.marital_status.as_deref()).map_err(row_error)?,
            occupation: split_cell(self.occupation.as_deref()).map_err(row_error)?,
            disability: split_cell(self.disability.as_deref()).map_err(row_error)?,
            age_min: self.age_min,
            age_max: self.age_max,
        };

        if let (Some(min), Some(max)) = (eligibility.age_min, eligibility.age_max) {
            if min > max {
                return Err(row_error(format!("age window {min}-{max} is inverted")));
            }
        }

        let last_date = self
            .last_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|err| row_error(format!("last_date '{raw}' is not YYYY-MM-DD ({err})")))
            })
            .transpose()?;

        let is_active = match self.active.as_deref() {
            None => true,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                other => return Err(row_error(format!("active flag '{other}' is not boolean"))),
            },
        };

        Ok(EntryDraft {
            kind,
            title: self.title,
            description: self.description,
            benefits: self.benefits,
            application_process: self.application_process,
            documents: Vec::new(),
            video_link: None,
            application_link: None,
            last_date,
            is_active,
            eligibility,
        })
    }
}

/// Split a pipe-separated cell into typed labels; `None` means unrestricted.
fn split_cell<T: FromStr<Err = String>>(cell: Option<&str>) -> Result<Vec<T>, String> {
    match cell {
        None => Ok(Vec::new()),
        Some(raw) => raw
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(T::from_str)
            .collect(),
    }
}

fn split_cell_strings(cell: Option<&str>) -> Vec<String> {
    match cell {
        None => Vec::new(),
        Some(raw) => raw
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
