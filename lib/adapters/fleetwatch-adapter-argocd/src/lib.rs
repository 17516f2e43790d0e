//! REST client for the controllers' session and application endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use fleetwatch_domain::{Application, Cluster, HealthStatus, MonitorError, SyncStatus};
use fleetwatch_ports::ClusterApiPort;

#[derive(Serialize)]
struct SessionRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct ApplicationList {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct ArgoCdClient {
    client: Client,
    insecure_client: Client,
}

impl ArgoCdClient {
    pub fn new(timeout: Duration) -> Result<Self, MonitorError> {
        let build = |insecure: bool| {
            Client::builder()
                .timeout(timeout)
                .danger_accept_invalid_certs(insecure)
                .build()
                .map_err(|err| MonitorError::Config(format!("cannot build HTTP client: {err}")))
        };
        Ok(Self {
            client: build(false)?,
            insecure_client: build(true)?,
        })
    }

    fn client_for(&self, cluster: &Cluster) -> &Client {
        if cluster.insecure {
            &self.insecure_client
        } else {
            &self.client
        }
    }
}

#[async_trait]
impl ClusterApiPort for ArgoCdClient {
    async fn login(&self, cluster: &Cluster) -> Result<String, MonitorError> {
        let url = format!("{}/api/v1/session", cluster.url);
        let response = self
            .client_for(cluster)
            .post(&url)
            .json(&SessionRequest {
                username: &cluster.username,
                password: &cluster.password,
            })
            .send()
            .await
            .map_err(|err| MonitorError::auth(&cluster.name, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::auth(&cluster.name, format!("login returned {status}")));
        }

        let body: SessionResponse = response.json().await.map_err(|err| {
            MonitorError::auth(&cluster.name, format!("malformed login response: {err}"))
        })?;
        body.token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| MonitorError::auth(&cluster.name, "login response carried no token"))
    }

    async fn list_applications(
        &self,
        cluster: &Cluster,
        token: &str,
    ) -> Result<Vec<Application>, MonitorError> {
        let url = format!("{}/api/v1/applications", cluster.url);
        let response = self
            .client_for(cluster)
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| MonitorError::fetch(&cluster.name, err))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(MonitorError::auth(
                &cluster.name,
                format!("token rejected with {status}"),
            ));
        }
        if !status.is_success() {
            return Err(MonitorError::fetch(
                &cluster.name,
                format!("listing returned {status}"),
            ));
        }

        let list: ApplicationList = response.json().await.map_err(|err| {
            MonitorError::fetch(&cluster.name, format!("malformed listing: {err}"))
        })?;
        Ok(parse_items(&cluster.name, list.items.unwrap_or_default()))
    }
}

fn parse_items(cluster: &str, items: Vec<Value>) -> Vec<Application> {
    items
        .into_iter()
        .filter_map(|item| {
            let app = to_application(item);
            if app.is_none() {
                warn!(cluster, "skipping application without metadata.name");
            }
            app
        })
        .collect()
}

/// Projects a raw application resource. Returns `None` when it has no name.
pub fn to_application(mut item: Value) -> Option<Application> {
    let name = item
        .pointer("/metadata/name")
        .and_then(Value::as_str)?
        .to_string();
    let health = HealthStatus::parse(item.pointer("/status/health/status").and_then(Value::as_str));
    let sync = SyncStatus::parse(item.pointer("/status/sync/status").and_then(Value::as_str));

    Some(Application {
        name,
        health,
        sync,
        metadata: item.get_mut("metadata").map(Value::take).unwrap_or_default(),
        spec: item.get_mut("spec").map(Value::take).unwrap_or_default(),
        status: item.get_mut("status").map(Value::take).unwrap_or_default(),
    })
}
