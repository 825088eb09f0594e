use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};

use crate::{
    config::http_client,
    directory::{Directory, Filters},
    error::{DirectoryError, truncate_body},
    model::Country,
};

const GET_COUNTRIES: &str = r#"
query GetCountries {
  countries {
    name
    capital
    continent {
      name
    }
    code
    languages {
      name
    }
    currency
    native
    phone
  }
}
"#;

/// Anything able to hand over the full country list.
#[async_trait]
pub trait CountrySource: Send + Sync + Debug {
    async fn fetch_countries(&self) -> Result<Vec<Country>>;
}

#[derive(Debug, Clone)]
pub struct GraphqlCountrySource {
    endpoint: String,
    http: Client,
}

impl GraphqlCountrySource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self { endpoint: endpoint.into(), http: http_client(timeout)? })
    }
}

/// Fetch the full list from `source` and derive the first view from `filters`.
pub async fn load_directory(source: &dyn CountrySource, filters: Filters) -> Result<Directory> {
    let countries = source.fetch_countries().await?;
    Ok(Directory::with_filters(countries, filters))
}

#[derive(Debug, Serialize)]
struct GqlRequest<'a> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GqlCountries {
    countries: Vec<Country>,
}

#[derive(Debug, Deserialize)]
struct GqlResponse {
    data: Option<GqlCountries>,
    #[serde(default)]
    errors: Vec<GqlError>,
}

/// Interpret a GraphQL response body. Any reported error fails the whole
/// request, even when partial data came back.
fn parse_countries(body: &str) -> Result<Vec<Country>> {
    let parsed: GqlResponse =
        serde_json::from_str(body).context("Failed to parse GraphQL countries JSON")?;

    if !parsed.errors.is_empty() {
        let messages = parsed.errors.into_iter().map(|e| e.message).collect();
        return Err(DirectoryError::Graphql(messages).into());
    }

    let data = parsed.data.ok_or(DirectoryError::MissingData)?;
    Ok(data.countries)
}

#[async_trait]
impl CountrySource for GraphqlCountrySource {
    async fn fetch_countries(&self) -> Result<Vec<Country>> {
        tracing::debug!(endpoint = %self.endpoint, "querying countries");

        let res = self
            .http
            .post(&self.endpoint)
            .json(&GqlRequest { query: GET_COUNTRIES, operation_name: "GetCountries" })
            .send()
            .await
            .with_context(|| format!("Failed to send GraphQL request to {}", self.endpoint))?;

        let status = res.status();
        let body = res.text().await.context("Failed to read GraphQL response body")?;

        if !status.is_success() {
            return Err(DirectoryError::HttpStatus {
                service: "GraphQL",
                status,
                body: truncate_body(&body),
            }
            .into());
        }

        let countries = parse_countries(&body)?;
        tracing::info!(count = countries.len(), "loaded countries");
        Ok(countries)
    }
}
