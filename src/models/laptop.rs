use crate::utils::serialize_rfc3339;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// A single laptop registration entry.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LaptopEntity {
    pub id: Uuid,
    pub student_name: String,
    pub student_id: String,
    pub phone: String,
    pub email: String,
    pub serial_number: String,
    pub mac_address: String,
    pub operating_system: String,
    pub laptop_brand: String,
    pub anti_virus_installed: bool,
    pub verified: bool,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub updated_at: DateTime<Utc>,
}

/// The three independently unique columns of a record. Uniqueness is
/// per-field, not a composite key.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IdentityField {
    StudentId,
    SerialNumber,
    MacAddress,
}

impl IdentityField {
    /// Validation order is fixed: studentId, serialNumber, macAddress.
    pub const ALL: [Self; 3] = [Self::StudentId, Self::SerialNumber, Self::MacAddress];

    pub fn column(&self) -> &'static str {
        match self {
            Self::StudentId => "student_id",
            Self::SerialNumber => "serial_number",
            Self::MacAddress => "mac_address",
        }
    }

    pub fn taken_message(&self) -> &'static str {
        match self {
            Self::StudentId => "This student already has a registered laptop",
            Self::SerialNumber => "This laptop is already registered",
            Self::MacAddress => "This MAC Address is already registered",
        }
    }
}

impl Display for IdentityField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::StudentId => "studentId",
            Self::SerialNumber => "serialNumber",
            Self::MacAddress => "macAddress",
        })
    }
}

/// Aggregated duplicate report; serializes as a JSON object containing only
/// the fields in conflict. Empty means the candidate is free to persist.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<&'static str>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.student_id.is_none() && self.serial_number.is_none() && self.mac_address.is_none()
    }

    pub fn mark(&mut self, field: IdentityField) {
        let message = field.taken_message();
        match field {
            IdentityField::StudentId => self.student_id = Some(message),
            IdentityField::SerialNumber => self.serial_number = Some(message),
            IdentityField::MacAddress => self.mac_address = Some(message),
        }
    }

    pub fn single(field: IdentityField) -> Self {
        let mut report = Self::default();
        report.mark(field);
        report
    }

    pub fn messages(&self) -> impl Iterator<Item = &'static str> {
        [self.student_id, self.serial_number, self.mac_address]
            .into_iter()
            .flatten()
    }
}
