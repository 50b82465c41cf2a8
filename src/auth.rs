//! Request authentication.
//!
//! By default requests are authorized with Application Default Credentials
//! (`gcloud auth application-default login`, a service-account key in
//! `GOOGLE_APPLICATION_CREDENTIALS`, or the metadata server). A pre-minted
//! OAuth access token can be supplied instead with `--access-token` /
//! `GOOGLE_OAUTH_ACCESS_TOKEN`.

use google_cloud_auth::credentials::{self, CacheableResource, Credentials};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tokio::sync::RwLock;

use crate::error::ApiError;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

pub enum TokenSource {
    /// A fixed bearer token.
    Static(String),
    /// ADC, with the last headers kept for `NotModified` answers.
    ApplicationDefault {
        credentials: Credentials,
        cached: RwLock<Option<HeaderMap>>,
    },
}

impl TokenSource {
    pub fn application_default() -> Result<Self, ApiError> {
        let credentials = credentials::Builder::default()
            .with_scopes([CLOUD_PLATFORM_SCOPE])
            .build()
            .map_err(|e| ApiError::Auth(format!("failed to build ADC credentials: {e}")))?;

        Ok(Self::ApplicationDefault {
            credentials,
            cached: RwLock::new(None),
        })
    }

    pub fn static_token(token: impl Into<String>) -> Self {
        Self::Static(token.into())
    }

    /// Headers that authorize one request.
    pub async fn headers(&self) -> Result<HeaderMap, ApiError> {
        match self {
            TokenSource::Static(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                    .map_err(|e| ApiError::Auth(format!("invalid access token: {e}")))?;
                let mut headers = HeaderMap::new();
                headers.insert(AUTHORIZATION, value);
                Ok(headers)
            }
            TokenSource::ApplicationDefault {
                credentials,
                cached,
            } => {
                let fetched = credentials
                    .headers(Default::default())
                    .await
                    .map_err(|e| ApiError::Auth(format!("failed to obtain auth headers: {e}")))?;

                match fetched {
                    CacheableResource::New { data, .. } => {
                        *cached.write().await = Some(data.clone());
                        Ok(data)
                    }
                    CacheableResource::NotModified => cached.read().await.clone().ok_or_else(|| {
                        ApiError::Auth(
                            "credentials returned NotModified before any headers were cached"
                                .to_string(),
                        )
                    }),
                }
            }
        }
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("TokenSource::Static(<redacted>)"),
            TokenSource::ApplicationDefault { .. } => {
                f.write_str("TokenSource::ApplicationDefault")
            }
        }
    }
}
