// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared JSON-over-HTTP plumbing for the remote clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use super::error::ProviderError;

/// Base URL plus a configured `reqwest` client.
#[derive(Debug, Clone)]
pub struct ApiHttp {
    base_url: Url,
    http: Client,
}

impl ApiHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::MissingConfig(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::MissingConfig(format!(
                "base URL {base_url} cannot carry a path"
            )));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: Url, http: Client) -> Self {
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL. Each segment is percent-encoded,
    /// so `?`, `#` and `%` inside an id stay part of that segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::MissingConfig(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<T, ProviderError> {
        let path = display_path(segments);
        let mut request = self
            .http
            .get(self.endpoint(segments)?)
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = send(with_bearer(request, bearer), "GET", &path).await?;
        decode("GET", &path, response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
        headers: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<T, ProviderError> {
        let path = display_path(segments);
        let mut request = self
            .http
            .post(self.endpoint(segments)?)
            .header("Accept", "application/json")
            .json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = send(with_bearer(request, bearer), "POST", &path).await?;
        decode("POST", &path, response).await
    }
}

fn display_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

fn with_bearer(request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
    match bearer {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}

async fn send(
    request: RequestBuilder,
    method: &'static str,
    path: &str,
) -> Result<Response, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Request(format!("{method} {path} failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            method,
            path: path.to_string(),
            status,
            body,
        });
    }

    Ok(response)
}

async fn decode<T: DeserializeOwned>(
    method: &'static str,
    path: &str,
    response: Response,
) -> Result<T, ProviderError> {
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Request(format!("{method} {path} body read failed: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| ProviderError::InvalidResponse(format!("{method} {path} invalid payload: {e}")))
}
