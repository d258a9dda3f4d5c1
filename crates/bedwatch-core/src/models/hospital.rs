//! Hospital availability model

use serde::{Deserialize, Serialize};

/// Table holding one row per hospital.
pub const HOSPITALS_TABLE: &str = "hospitals";

/// Column that maps a row to the admin account that owns it.
pub const OWNER_COLUMN: &str = "hospital_admin_id";

/// The editable part of a hospital row, as written back.
///
/// Dates are kept as the backend's `YYYY-MM-DD` strings and are not parsed.
/// `beds_available <= total_beds` is expected but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalAvailability {
    pub beds_available: u32,
    pub total_beds: u32,
    pub ct_scan_av_date: Option<String>,
    pub mri_av_date: Option<String>,
}

/// The editable part of a hospital row, as read.
///
/// Every column is nullable in the table, so a row with a missing count still
/// loads and only that field stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HospitalRecord {
    pub beds_available: Option<u32>,
    pub total_beds: Option<u32>,
    pub ct_scan_av_date: Option<String>,
    pub mri_av_date: Option<String>,
}

impl HospitalRecord {
    /// Comma separated column list for `select=`.
    pub const COLUMNS: &'static str = "beds_available,total_beds,ct_scan_av_date,mri_av_date";
}

impl From<HospitalAvailability> for HospitalRecord {
    fn from(value: HospitalAvailability) -> Self {
        Self {
            beds_available: Some(value.beds_available),
            total_beds: Some(value.total_beds),
            ct_scan_av_date: value.ct_scan_av_date,
            mri_av_date: value.mri_av_date,
        }
    }
}

/// Tagged result of an owner-row read or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome<T> {
    Success(T),
    /// The signed-in account has no hospital row. Not a failure.
    NotFound,
    Failed(String),
}

impl<T> RecordOutcome<T> {
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::NotFound | Self::Failed(_) => None,
        }
    }
}
