//! Blocking HTTP client for the scanning service

use reqwest::blocking::{Client, RequestBuilder};

use stevedore_domain::traits::ScanClient;
use stevedore_domain::{ArtifactMetadataRecord, ComponentVersionHandle, VulnerabilityRecord};

use crate::dto::{ComponentDto, VulnerabilityDto};
use crate::{ClientConfig, ClientError};

/// HTTP implementation of [`ScanClient`].
///
/// Component listings are fetched per project version; vulnerabilities
/// are fetched by following the component version link the service
/// returned with a notification.
pub struct HttpScanClient {
    config: ClientConfig,
    http: Client,
}

impl HttpScanClient {
    /// Build a client from connection settings.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { config, http })
    }

    fn components_url(&self, project_name: &str, project_version_name: &str) -> String {
        format!(
            "{}/api/projects/{}/versions/{}/components",
            self.config.base_url.trim_end_matches('/'),
            project_name,
            project_version_name
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let response = self.authorized(self.http.get(url)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json()?)
    }
}

impl ScanClient for HttpScanClient {
    type Error = ClientError;

    fn fetch_metadata(
        &self,
        repo_key: &str,
        project_name: &str,
        project_version_name: &str,
    ) -> Result<Vec<ArtifactMetadataRecord>, Self::Error> {
        let url = self.components_url(project_name, project_version_name);
        tracing::debug!("fetching component metadata for {} from {}", repo_key, url);

        let components: Vec<ComponentDto> = self.get_json(&url)?;
        tracing::debug!(
            "received {} component records for {}",
            components.len(),
            repo_key
        );
        Ok(components.into_iter().map(ComponentDto::into_record).collect())
    }

    fn fetch_vulnerabilities(
        &self,
        component: &ComponentVersionHandle,
    ) -> Result<Vec<VulnerabilityRecord>, Self::Error> {
        let href = component.href.as_deref().ok_or_else(|| {
            ClientError::MissingLink(format!(
                "{}/{}",
                component.component_name, component.component_version
            ))
        })?;
        let url = format!("{}/vulnerabilities", href.trim_end_matches('/'));

        let vulnerabilities: Vec<VulnerabilityDto> = self.get_json(&url)?;
        Ok(vulnerabilities
            .into_iter()
            .map(VulnerabilityDto::into_record)
            .collect())
    }
}
