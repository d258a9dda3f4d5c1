//! Home screen form: text mirrors of the owned hospital row.

use thiserror::Error;

use crate::auth::AuthSession;
use crate::models::{HospitalAvailability, HospitalRecord, RecordOutcome};
use crate::records::HospitalService;
use crate::util::normalize_text_option;

use super::Alert;

const NO_HOSPITAL: &str = "No hospital found for this account";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill Beds Available and Total Beds")]
    MissingBeds,
    #[error("{field} must be a whole number")]
    InvalidNumber { field: &'static str },
}

impl FormError {
    pub fn alert(&self) -> Alert {
        Alert::info(self.to_string())
    }
}

/// Text state of the four editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityForm {
    pub beds_available: String,
    pub total_beds: String,
    pub ct_scan_date: String,
    pub mri_date: String,
}

impl AvailabilityForm {
    /// Mirror a fetched row; null columns become empty fields.
    pub fn from_record(record: &HospitalRecord) -> Self {
        Self {
            beds_available: count_text(record.beds_available),
            total_beds: count_text(record.total_beds),
            ct_scan_date: record.ct_scan_av_date.clone().unwrap_or_default(),
            mri_date: record.mri_av_date.clone().unwrap_or_default(),
        }
    }

    /// Build the full row to write.
    ///
    /// Both bed counts must be present. There is no range or cross-field check
    /// and dates are passed through as typed; blank dates become `null`.
    pub fn to_update(&self) -> Result<HospitalAvailability, FormError> {
        let beds_available = self.beds_available.trim();
        let total_beds = self.total_beds.trim();
        if beds_available.is_empty() || total_beds.is_empty() {
            return Err(FormError::MissingBeds);
        }

        Ok(HospitalAvailability {
            beds_available: parse_count(beds_available, "Beds Available")?,
            total_beds: parse_count(total_beds, "Total Beds")?,
            ct_scan_av_date: normalize_text_option(Some(self.ct_scan_date.clone())),
            mri_av_date: normalize_text_option(Some(self.mri_date.clone())),
        })
    }
}

fn count_text(count: Option<u32>) -> String {
    count.map(|count| count.to_string()).unwrap_or_default()
}

fn parse_count(value: &str, field: &'static str) -> Result<u32, FormError> {
    value
        .parse::<u32>()
        .map_err(|_| FormError::InvalidNumber { field })
}

/// Alert to show after the initial fetch, if any. Fetch failures stay silent.
pub fn fetch_alert<T>(outcome: &RecordOutcome<T>) -> Option<Alert> {
    match outcome {
        RecordOutcome::NotFound => Some(Alert::info(NO_HOSPITAL)),
        RecordOutcome::Success(_) | RecordOutcome::Failed(_) => None,
    }
}

pub fn save_alert(outcome: &RecordOutcome<()>) -> Alert {
    match outcome {
        RecordOutcome::Success(()) => {
            Alert::success("✅ Success", "Hospital info updated successfully!")
        }
        RecordOutcome::NotFound => Alert::error("Error", NO_HOSPITAL),
        RecordOutcome::Failed(_) => Alert::error("Error", "Something went wrong"),
    }
}

/// Load the owned row into a fresh form.
pub async fn load_availability(
    service: &HospitalService,
    session: Option<&AuthSession>,
) -> (AvailabilityForm, Option<Alert>) {
    let outcome = service.get_owned_record(session).await;
    let alert = fetch_alert(&outcome);
    let form = outcome
        .success()
        .map(|record| AvailabilityForm::from_record(&record))
        .unwrap_or_default();
    (form, alert)
}

/// Validate and write the form. Invalid input never reaches the backend.
pub async fn save_availability(
    service: &HospitalService,
    session: Option<&AuthSession>,
    form: &AvailabilityForm,
) -> Alert {
    let fields = match form.to_update() {
        Ok(fields) => fields,
        Err(error) => return error.alert(),
    };
    save_alert(&service.update_owned_record(session, &fields).await)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::forms::AlertKind;

    fn form(beds: &str, total: &str, ct: &str, mri: &str) -> AvailabilityForm {
        AvailabilityForm {
            beds_available: beds.to_string(),
            total_beds: total.to_string(),
            ct_scan_date: ct.to_string(),
            mri_date: mri.to_string(),
        }
    }

    #[test]
    fn from_record_mirrors_fields() {
        let record = HospitalRecord {
            beds_available: Some(5),
            total_beds: Some(20),
            ct_scan_av_date: None,
            mri_av_date: Some("2025-10-01".to_string()),
        };
        assert_eq!(
            AvailabilityForm::from_record(&record),
            form("5", "20", "", "2025-10-01")
        );
    }

    #[test]
    fn from_record_leaves_null_count_empty() {
        let record = HospitalRecord {
            beds_available: None,
            total_beds: Some(20),
            ct_scan_av_date: Some("2025-09-25".to_string()),
            mri_av_date: Some("2025-10-01".to_string()),
        };
        assert_eq!(
            AvailabilityForm::from_record(&record),
            form("", "20", "2025-09-25", "2025-10-01")
        );
    }

    #[test]
    fn to_update_requires_both_bed_fields() {
        assert_eq!(
            form("", "20", "", "").to_update(),
            Err(FormError::MissingBeds)
        );
        assert_eq!(
            form("5", "  ", "", "").to_update(),
            Err(FormError::MissingBeds)
        );
    }

    #[test]
    fn to_update_parses_counts_and_nulls_blank_dates() {
        let update = form(" 7 ", "30", "2025-09-25", "  ").to_update().unwrap();
        assert_eq!(
            update,
            HospitalAvailability {
                beds_available: 7,
                total_beds: 30,
                ct_scan_av_date: Some("2025-09-25".to_string()),
                mri_av_date: None,
            }
        );
    }

    #[test]
    fn to_update_does_not_cross_check_bed_counts() {
        let update = form("50", "20", "", "").to_update().unwrap();
        assert_eq!(update.beds_available, 50);
        assert_eq!(update.total_beds, 20);
    }

    #[test]
    fn to_update_rejects_non_numeric_counts() {
        assert_eq!(
            form("five", "20", "", "").to_update(),
            Err(FormError::InvalidNumber {
                field: "Beds Available"
            })
        );
        assert_eq!(
            form("5", "-1", "", "").to_update(),
            Err(FormError::InvalidNumber {
                field: "Total Beds"
            })
        );
    }

    #[test]
    fn fetch_alert_only_for_missing_row() {
        assert_eq!(
            fetch_alert(&RecordOutcome::<()>::NotFound),
            Some(Alert::info("No hospital found for this account"))
        );
        assert_eq!(fetch_alert(&RecordOutcome::Success(())), None);
        assert_eq!(
            fetch_alert(&RecordOutcome::<()>::Failed("timeout".to_string())),
            None
        );
    }

    #[test]
    fn save_alert_covers_each_outcome() {
        let success = save_alert(&RecordOutcome::Success(()));
        assert_eq!(success.kind, AlertKind::Success);
        assert_eq!(
            success.message.as_deref(),
            Some("Hospital info updated successfully!")
        );

        let missing = save_alert(&RecordOutcome::NotFound);
        assert_eq!(missing.title, "Error");
        assert_eq!(
            missing.message.as_deref(),
            Some("No hospital found for this account")
        );

        let failed = save_alert(&RecordOutcome::Failed("HTTP 500".to_string()));
        assert_eq!(failed.message.as_deref(), Some("Something went wrong"));
    }
}
