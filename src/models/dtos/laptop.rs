use crate::models::IdentityField;
use serde::{Deserialize, Serialize};

/// Candidate record submitted for registration or a full-replace update.
/// Everything mutable lives here; `id`, `verified` and the timestamps are
/// owned by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaptopSubmissionDto {
    #[serde(default)]
    pub student_name: String,
    pub student_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub serial_number: String,
    pub mac_address: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub laptop_brand: String,
    #[serde(default)]
    pub anti_virus_installed: bool,
}

impl LaptopSubmissionDto {
    pub fn identity_value(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::StudentId => &self.student_id,
            IdentityField::SerialNumber => &self.serial_number,
            IdentityField::MacAddress => &self.mac_address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQueryDto {
    pub query: Option<String>,
}

/// Non-failing pre-flight probe over the three identity fields.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateProbeDto {
    pub student_id_exists: bool,
    pub serial_number_exists: bool,
    pub mac_address_exists: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total: i64,
    pub verified: i64,
    pub not_verified: i64,
}
