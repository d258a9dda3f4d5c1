//! Data models for Bedwatch

mod hospital;

pub use hospital::{
    HospitalAvailability, HospitalRecord, RecordOutcome, HOSPITALS_TABLE, OWNER_COLUMN,
};
