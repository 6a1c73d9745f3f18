//! Typed HTTP client for the HosConnect API service.
//!
//! Each method maps one route to its request and response records from
//! `records`. Nothing is cached or retried.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] carrying the server's
//! `detail` text, or `HTTP <code>: <reason>` when the body has none. Ratings
//! are range-checked before any request is sent.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use records::{
    ChallengeResponse, EmergencyPatient, EmergencyResponse, ErrorBody, GlobalStats, HealthResponse, MAX_RATING,
    MIN_RATING, NearbyDoctor, PowResponse, RateDoctorRequest, RatingResponse, RegisterDoctorRequest,
    RegisterPatientRequest, RegistrationResponse, SetEmergencyRequest, SubmitPowRequest, TestAccountsResponse,
    UserInfo, VerifyRequest, VerifyResponse,
};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "HOSCONNECT_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Rating must be between 1 and 5")]
    InvalidRating(i64),
    #[error("invalid API base url {0:?}")]
    BaseUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{detail}")]
    Status { status: u16, detail: String },
}

impl ApiError {
    /// HTTP status for server-side rejections.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MedicalApi {
    http: reqwest::Client,
    base_url: String,
}

impl MedicalApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http: reqwest::Client::new(), base_url }
    }

    /// Client for `HOSCONNECT_API_URL`, or [`DEFAULT_API_URL`] when unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_owned()))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `segments`, each percent-encoded as one path segment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BaseUrl`] if the base URL cannot carry a path.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|_| ApiError::BaseUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T, ApiError> {
        tracing::debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        decode(response).await
    }

    // =========================================================================
    // ROUTES
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get(self.url(&["health"])?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn challenge(&self) -> Result<ChallengeResponse, ApiError> {
        self.get(self.url(&["api", "auth", "challenge"])?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or when the signature is
    /// rejected.
    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse, ApiError> {
        self.post(self.url(&["api", "auth", "verify"])?, request).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn register_doctor(&self, request: &RegisterDoctorRequest) -> Result<RegistrationResponse, ApiError> {
        self.post(self.url(&["api", "medical", "register", "doctor"])?, request)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn register_patient(&self, request: &RegisterPatientRequest) -> Result<RegistrationResponse, ApiError> {
        self.post(self.url(&["api", "medical", "register", "patient"])?, request)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn user_info(&self, address: &str) -> Result<UserInfo, ApiError> {
        self.get(self.url(&["api", "medical", "user", address])?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn submit_pow(&self, request: &SubmitPowRequest) -> Result<PowResponse, ApiError> {
        self.post(self.url(&["api", "medical", "pow", "submit"])?, request)
            .await
    }

    /// Submit a rating. Out-of-range ratings fail without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRating`] for ratings outside 1–5, otherwise
    /// [`ApiError`] on transport failure or a non-2xx response.
    pub async fn submit_rating(&self, request: &RateDoctorRequest) -> Result<RatingResponse, ApiError> {
        if !(MIN_RATING..=MAX_RATING).contains(&request.rating) {
            return Err(ApiError::InvalidRating(request.rating));
        }
        self.post(self.url(&["api", "medical", "rating", "submit"])?, request)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn set_emergency_status(&self, request: &SetEmergencyRequest) -> Result<EmergencyResponse, ApiError> {
        self.post(self.url(&["api", "medical", "emergency", "set"])?, request)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn emergency_patients(&self) -> Result<Vec<EmergencyPatient>, ApiError> {
        self.get(self.url(&["api", "medical", "emergency", "patients"])?)
            .await
    }

    /// Doctors near `location`; all doctors when `None` or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn nearby_doctors(&self, location: Option<&str>) -> Result<Vec<NearbyDoctor>, ApiError> {
        let mut url = self.url(&["api", "medical", "doctors", "nearby"])?;
        if let Some(location) = location.filter(|l| !l.trim().is_empty()) {
            url.query_pairs_mut().append_pair("location", location);
        }
        self.get(url).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn global_stats(&self) -> Result<GlobalStats, ApiError> {
        self.get(self.url(&["api", "medical", "stats"])?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn test_accounts(&self) -> Result<TestAccountsResponse, ApiError> {
        self.get(self.url(&["api", "medical", "test-accounts"])?)
            .await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| format!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or("Unknown")));
    Err(ApiError::Status { status: status.as_u16(), detail })
}
