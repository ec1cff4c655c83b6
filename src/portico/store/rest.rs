//! PostgREST client for the hosted `projects` table.
//!
//! Every request goes to `{base_url}/rest/v1/{table}` with the project key in
//! both the `apikey` header and a bearer token. Filters are encoded as
//! PostgREST operators (`eq.`, `not.in.(..)`, `ov.{..}`), the order is always
//! `id.asc`, and totals come from the `Content-Range` header returned under
//! `Prefer: count=exact`.

use super::remote::{NetworkStatus, RemoteStore};
use crate::error::{PorticoError, Result};
use crate::model::{NewProject, Project, ProjectId, RowPatch};
use crate::query::{ProjectQuery, Selection};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const REST_PREFIX: &str = "/rest/v1";
/// PostgREST code for "no (single) row returned".
const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Debug, Clone)]
pub struct RestSettings {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

pub struct RestRemote {
    client: Client,
    endpoint: String,
    network: NetworkStatus,
}

/// Error body PostgREST returns for rejected requests.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl RestRemote {
    pub fn new(settings: RestSettings, network: NetworkStatus) -> Result<Self> {
        let base = settings.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(PorticoError::Config("Remote URL is not configured".into()));
        }
        if settings.api_key.is_empty() {
            return Err(PorticoError::Config("Remote key is not configured".into()));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&settings.api_key)
            .map_err(|e| PorticoError::Config(format!("Invalid remote key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
            .map_err(|e| PorticoError::Config(format!("Invalid remote key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| PorticoError::Config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}/{}", base, REST_PREFIX, settings.table),
            network,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn network(&self) -> &NetworkStatus {
        &self.network
    }

    fn ensure_online(&self) -> Result<()> {
        if self.network.is_online() {
            Ok(())
        } else {
            Err(PorticoError::NetworkOffline)
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().map_err(|e| {
            if e.is_connect() {
                warn!(error = %e, "remote unreachable, marking offline");
                self.network.set_online(false);
            }
            PorticoError::Transport(e.to_string())
        })
    }

    /// Sends a write that returns the affected rows and yields the single row.
    fn write_one(&self, request: RequestBuilder, id: Option<ProjectId>) -> Result<Project> {
        let response = self.send(request.header("Prefer", "return=representation"))?;
        let rows: Vec<Project> = read_body(response, id)?;
        match (rows.into_iter().next(), id) {
            (Some(row), _) => Ok(row),
            (None, Some(id)) => Err(PorticoError::NotFound(id)),
            (None, None) => Err(PorticoError::Transport(
                "Remote store returned no row".into(),
            )),
        }
    }
}

impl RemoteStore for RestRemote {
    fn select(&self, query: &ProjectQuery) -> Result<Selection> {
        self.ensure_online()?;
        let params = query_params(query);
        debug!(?params, "select");

        let response = self.send(
            self.client
                .get(&self.endpoint)
                .header("Prefer", "count=exact")
                .query(&params),
        )?;
        let total = parse_total(
            response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok()),
        );
        let rows: Vec<Project> = read_body(response, query.id)?;
        let total = total.unwrap_or(query.offset.saturating_add(rows.len()));
        Ok(Selection { rows, total })
    }

    fn insert(&self, row: &NewProject) -> Result<Project> {
        self.ensure_online()?;
        self.write_one(self.client.post(&self.endpoint).json(row), None)
    }

    fn update(&self, id: ProjectId, patch: &RowPatch) -> Result<Project> {
        self.ensure_online()?;
        self.write_one(
            self.client
                .patch(&self.endpoint)
                .query(&[("id", format!("eq.{}", id))])
                .json(patch),
            Some(id),
        )
    }

    fn delete(&self, id: ProjectId) -> Result<Project> {
        self.ensure_online()?;
        self.write_one(
            self.client
                .delete(&self.endpoint)
                .query(&[("id", format!("eq.{}", id))]),
            Some(id),
        )
    }

    fn probe(&self) -> Result<usize> {
        let response = self.send(
            self.client
                .get(&self.endpoint)
                .header("Prefer", "count=exact")
                .query(&[("select", "id"), ("limit", "1")]),
        )?;
        let total = parse_total(
            response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok()),
        );
        let rows: Vec<serde_json::Value> = read_body(response, None)?;
        self.network.set_online(true);
        Ok(total.unwrap_or(rows.len()))
    }

    fn is_online(&self) -> bool {
        self.network.is_online()
    }
}

fn read_body<T: serde::de::DeserializeOwned>(
    response: Response,
    id: Option<ProjectId>,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| PorticoError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(map_failure(status.as_u16(), &body, id));
    }
    serde_json::from_str(&body).map_err(PorticoError::Serialization)
}

/// Maps a non-2xx response onto the error taxonomy.
fn map_failure(status: u16, body: &str, id: Option<ProjectId>) -> PorticoError {
    let api: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = api.code.unwrap_or_default();
    let message = match (api.message, api.details) {
        (Some(m), Some(d)) => format!("{} ({})", m, d),
        (Some(m), None) => m,
        (None, _) if !body.is_empty() => body.to_string(),
        (None, _) => format!("HTTP {}", status),
    };

    if let Some(id) = id {
        if status == 404 || code == NO_ROWS_CODE {
            return PorticoError::NotFound(id);
        }
    }
    if status == 409 || code.starts_with("23") {
        return PorticoError::ConstraintViolation(message);
    }
    PorticoError::Transport(format!("HTTP {}: {}", status, message))
}

/// Total from a `Content-Range` value such as `0-2/17` or `*/0`.
fn parse_total(header: Option<&str>) -> Option<usize> {
    header?.rsplit_once('/')?.1.trim().parse().ok()
}

/// Quotes one element of a PostgREST array literal.
fn array_element(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn query_params(query: &ProjectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    let mut push = |key: &str, value: String| params.push((key.to_string(), value));

    if let Some(id) = query.id {
        push("id", format!("eq.{}", id));
    }
    if let Some(archived) = query.archived {
        push("archived", format!("eq.{}", archived));
    }
    if let Some(featured) = query.featured {
        push("featured", format!("eq.{}", featured));
    }
    if let Some(main) = query.main_category {
        push("mainCategory", format!("eq.{}", main.as_str()));
    }
    if let Some(location) = &query.location {
        push("location", format!("eq.{}", location));
    }
    if !query.sub_categories_any.is_empty() {
        let items: Vec<String> = query
            .sub_categories_any
            .iter()
            .map(|s| array_element(s))
            .collect();
        push("subCategory", format!("ov.{{{}}}", items.join(",")));
    }
    if !query.exclude_ids.is_empty() {
        let ids: Vec<String> = query.exclude_ids.iter().map(|id| id.to_string()).collect();
        push("id", format!("not.in.({})", ids.join(",")));
    }
    push("order", "id.asc".to_string());
    if query.offset > 0 {
        push("offset", query.offset.to_string());
    }
    if let Some(limit) = query.limit {
        push("limit", limit.to_string());
    }
    params
}
