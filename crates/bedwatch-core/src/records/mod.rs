//! Owner-row access to the `hospitals` table through the Supabase REST API.
//!
//! [`HospitalClient`] speaks HTTP and returns `Result`s. [`HospitalService`]
//! sits on top of it for the screens: it requires a session, logs every
//! failure and folds the result into a [`RecordOutcome`].

use reqwest::{Client, RequestBuilder, Response};
use thiserror::Error;

use crate::auth::{parse_api_error, AuthSession};
use crate::config::{normalize_base_url, BackendEndpoint};
use crate::models::{
    HospitalAvailability, HospitalRecord, RecordOutcome, HOSPITALS_TABLE, OWNER_COLUMN,
};

const REST_PATH: &str = "/rest/v1";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid backend configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("No signed-in user")]
    NoSession,
    #[error("Failed to fetch hospital record: {0}")]
    Fetch(String),
    #[error("Failed to update hospital record: {0}")]
    Update(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

#[derive(Debug, Clone)]
pub struct HospitalClient {
    table_url: String,
    anon_key: String,
    client: Client,
}

impl HospitalClient {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>) -> RecordResult<Self> {
        let base_url = normalize_base_url(url.as_ref()).map_err(|_| {
            RecordError::InvalidConfiguration("Supabase URL must include http:// or https://")
        })?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(RecordError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }
        let client = Client::builder()
            .build()
            .map_err(|error| RecordError::Fetch(error.to_string()))?;

        Ok(Self {
            table_url: format!("{base_url}{REST_PATH}/{HOSPITALS_TABLE}"),
            anon_key,
            client,
        })
    }

    pub fn from_endpoint(endpoint: &BackendEndpoint) -> RecordResult<Self> {
        Self::new(&endpoint.base_url, endpoint.anon_key.clone())
    }

    /// Read the row owned by the session's user. `Ok(None)` means no row.
    pub async fn fetch_owned(
        &self,
        session: &AuthSession,
    ) -> RecordResult<Option<HospitalRecord>> {
        let owner = owner_filter(session)?;
        let request = self.authorized(
            self.client
                .get(&self.table_url)
                .query(&[
                    ("select", HospitalRecord::COLUMNS),
                    (OWNER_COLUMN, owner.as_str()),
                ]),
            session,
        );

        let response = request
            .send()
            .await
            .map_err(|error| RecordError::Fetch(error.to_string()))?;
        let response = check_status(response).await.map_err(RecordError::Fetch)?;
        let mut rows = response
            .json::<Vec<HospitalRecord>>()
            .await
            .map_err(|error| RecordError::Fetch(error.to_string()))?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            count => Err(RecordError::Fetch(format!(
                "expected one hospital for this account, found {count}"
            ))),
        }
    }

    /// Overwrite all editable fields of the owned row.
    ///
    /// Returns the number of rows the backend reports as updated; zero means
    /// the account owns no row.
    pub async fn update_owned(
        &self,
        session: &AuthSession,
        fields: &HospitalAvailability,
    ) -> RecordResult<usize> {
        let owner = owner_filter(session)?;
        let request = self.authorized(
            self.client
                .patch(&self.table_url)
                .query(&[(OWNER_COLUMN, owner.as_str()), ("select", "id")])
                .header("Prefer", "return=representation")
                .json(fields),
            session,
        );

        let response = request
            .send()
            .await
            .map_err(|error| RecordError::Update(error.to_string()))?;
        let response = check_status(response).await.map_err(RecordError::Update)?;
        let rows = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|error| RecordError::Update(error.to_string()))?;
        Ok(rows.len())
    }

    fn authorized(&self, request: RequestBuilder, session: &AuthSession) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Accept", "application/json")
            .bearer_auth(&session.access_token)
    }
}

/// Screen-facing wrapper that never surfaces an `Err`.
#[derive(Debug, Clone)]
pub struct HospitalService {
    client: HospitalClient,
}

impl HospitalService {
    pub const fn new(client: HospitalClient) -> Self {
        Self { client }
    }

    pub async fn get_owned_record(
        &self,
        session: Option<&AuthSession>,
    ) -> RecordOutcome<HospitalRecord> {
        let Some(session) = session else {
            tracing::error!("No authenticated user found.");
            return RecordOutcome::Failed(RecordError::NoSession.to_string());
        };

        match self.client.fetch_owned(session).await {
            Ok(Some(record)) => RecordOutcome::Success(record),
            Ok(None) => {
                tracing::info!(user = %session.user.id, "No hospital row for this account");
                RecordOutcome::NotFound
            }
            Err(error) => {
                tracing::error!("Error fetching bed availability: {}", error);
                RecordOutcome::Failed(error.to_string())
            }
        }
    }

    pub async fn update_owned_record(
        &self,
        session: Option<&AuthSession>,
        fields: &HospitalAvailability,
    ) -> RecordOutcome<()> {
        let Some(session) = session else {
            tracing::error!("No authenticated user found.");
            return RecordOutcome::Failed(RecordError::NoSession.to_string());
        };

        match self.client.update_owned(session, fields).await {
            Ok(0) => {
                tracing::info!(user = %session.user.id, "No hospital row to update for this account");
                RecordOutcome::NotFound
            }
            Ok(_) => {
                tracing::info!(
                    user = %session.user.id,
                    beds_available = fields.beds_available,
                    total_beds = fields.total_beds,
                    "Hospital availability updated"
                );
                RecordOutcome::Success(())
            }
            Err(error) => {
                tracing::error!("Error updating hospital: {}", error);
                RecordOutcome::Failed(error.to_string())
            }
        }
    }
}

fn owner_filter(session: &AuthSession) -> RecordResult<String> {
    if session.has_user() {
        Ok(format!("eq.{}", session.user.id.trim()))
    } else {
        Err(RecordError::NoSession)
    }
}

async fn check_status(response: Response) -> Result<Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = parse_api_error(status, &body);
    if message.starts_with("HTTP ") {
        Err(message)
    } else {
        Err(format!("{message} ({})", status.as_u16()))
    }
}
