use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::admin::AdminId;

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

/// Schemes and scholarships share one record shape; the kind discriminates
/// which public listing an entry appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Scheme,
    Scholarship,
}

impl EntryKind {
    pub const fn label(self) -> &'static str {
        match self {
            EntryKind::Scheme => "scheme",
            EntryKind::Scholarship => "scholarship",
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheme" | "schemes" => Ok(EntryKind::Scheme),
            "scholarship" | "scholarships" => Ok(EntryKind::Scholarship),
            other => Err(format!("unknown catalog kind '{other}'")),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reservation category recognized across central and state schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Obc,
    Sc,
    St,
    Ews,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Obc => "obc",
            Category::Sc => "sc",
            Category::St => "st",
            Category::Ews => "ews",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationLevel {
    HighSchool,
    Intermediate,
    Graduate,
    Postgraduate,
}

impl EducationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "high-school",
            EducationLevel::Intermediate => "intermediate",
            EducationLevel::Graduate => "graduate",
            EducationLevel::Postgraduate => "postgraduate",
        }
    }
}

/// Annual household income brackets as declared by the citizen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeBand {
    #[serde(rename = "below-1lakh")]
    Below1Lakh,
    #[serde(rename = "1-3lakh")]
    OneToThreeLakh,
    #[serde(rename = "3-5lakh")]
    ThreeToFiveLakh,
    #[serde(rename = "5-10lakh")]
    FiveToTenLakh,
    #[serde(rename = "above-10lakh")]
    AboveTenLakh,
}

impl IncomeBand {
    pub const fn label(self) -> &'static str {
        match self {
            IncomeBand::Below1Lakh => "below-1lakh",
            IncomeBand::OneToThreeLakh => "1-3lakh",
            IncomeBand::ThreeToFiveLakh => "3-5lakh",
            IncomeBand::FiveToTenLakh => "5-10lakh",
            IncomeBand::AboveTenLakh => "above-10lakh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::Divorced => "divorced",
            MaritalStatus::Widowed => "widowed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Occupation {
    Student,
    Unemployed,
    Employed,
    SelfEmployed,
}

impl Occupation {
    pub const fn label(self) -> &'static str {
        match self {
            Occupation::Student => "student",
            Occupation::Unemployed => "unemployed",
            Occupation::Employed => "employed",
            Occupation::SelfEmployed => "self-employed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disability {
    None,
    Physical,
    Visual,
    Hearing,
    Intellectual,
    Multiple,
}

impl Disability {
    pub const fn label(self) -> &'static str {
        match self {
            Disability::None => "none",
            Disability::Physical => "physical",
            Disability::Visual => "visual",
            Disability::Hearing => "hearing",
            Disability::Intellectual => "intellectual",
            Disability::Multiple => "multiple",
        }
    }
}

macro_rules! impl_label_from_str {
    ($($ty:ty => [$($variant:expr),+ $(,)?]),+ $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = String;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    let wanted = value.trim().to_ascii_lowercase();
                    [$($variant),+]
                        .into_iter()
                        .find(|candidate| candidate.label() == wanted)
                        .ok_or_else(|| {
                            format!("unknown {} '{value}'", stringify!($ty))
                        })
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )+
    };
}

impl_label_from_str! {
    Category => [Category::General, Category::Obc, Category::Sc, Category::St, Category::Ews],
    Gender => [Gender::Male, Gender::Female, Gender::Other],
    EducationLevel => [
        EducationLevel::HighSchool,
        EducationLevel::Intermediate,
        EducationLevel::Graduate,
        EducationLevel::Postgraduate,
    ],
    IncomeBand => [
        IncomeBand::Below1Lakh,
        IncomeBand::OneToThreeLakh,
        IncomeBand::ThreeToFiveLakh,
        IncomeBand::FiveToTenLakh,
        IncomeBand::AboveTenLakh,
    ],
    MaritalStatus => [
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::Divorced,
        MaritalStatus::Widowed,
    ],
    Occupation => [
        Occupation::Student,
        Occupation::Unemployed,
        Occupation::Employed,
        Occupation::SelfEmployed,
    ],
    Disability => [
        Disability::None,
        Disability::Physical,
        Disability::Visual,
        Disability::Hearing,
        Disability::Intellectual,
        Disability::Multiple,
    ],
}

/// Conjunctive eligibility rule-set attached to a catalog entry. Every
/// criterion is optional; an empty set or absent bound places no
/// restriction on that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRules {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gender: Vec<Gender>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<EducationLevel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub income: Vec<IncomeBand>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marital_status: Vec<MaritalStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occupation: Vec<Occupation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disability: Vec<Disability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u8>,
}

impl EligibilityRules {
    /// True when no criterion constrains anything, i.e. every profile matches.
    pub fn is_unrestricted(&self) -> bool {
        self.category.is_empty()
            && self.gender.is_empty()
            && self.state.is_empty()
            && self.education.is_empty()
            && self.income.is_empty()
            && self.marital_status.is_empty()
            && self.occupation.is_empty()
            && self.disability.is_empty()
            && self.age_min.is_none()
            && self.age_max.is_none()
    }
}

/// Self-declared demographic and financial attributes of a citizen. Every
/// field may be left unset while the account is being filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitizenProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<IncomeBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<EducationLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<Occupation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disability: Option<Disability>,
}

impl CitizenProfile {
    /// Field-wise patch: set fields in `patch` overwrite, unset fields keep
    /// the current value.
    pub fn merged_with(&self, patch: CitizenProfile) -> CitizenProfile {
        CitizenProfile {
            name: patch.name.or_else(|| self.name.clone()),
            age: patch.age.or(self.age),
            gender: patch.gender.or(self.gender),
            category: patch.category.or(self.category),
            income: patch.income.or(self.income),
            education: patch.education.or(self.education),
            occupation: patch.occupation.or(self.occupation),
            state: patch.state.or_else(|| self.state.clone()),
            district: patch.district.or_else(|| self.district.clone()),
            marital_status: patch.marital_status.or(self.marital_status),
            disability: patch.disability.or(self.disability),
        }
    }
}

/// One scheme or scholarship record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_process: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
    pub is_active: bool,
    pub eligibility: EligibilityRules,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<AdminId>,
}

/// Payload for creating or replacing a catalog entry; the service assigns
/// the identifier and creation stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_process: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub eligibility: EligibilityRules,
}

fn default_active() -> bool {
    true
}
