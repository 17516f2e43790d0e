use std::fmt;

use serde::{Deserialize, Serialize};

use crate::application::Application;

/// Identity and credentials of one remote controller. Immutable after load.
#[derive(Clone, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub insecure: bool,
}

impl Cluster {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            insecure: false,
        }
    }
}

impl fmt::Debug for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// One cluster's outcome for a refresh cycle.
///
/// An empty `applications` list means either "nothing deployed" or "the fetch
/// failed"; the failure itself is only logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    pub cluster_name: String,
    pub cluster_url: String,
    pub applications: Vec<Application>,
}

impl ClusterResult {
    pub fn new(cluster: &Cluster, applications: Vec<Application>) -> Self {
        Self {
            cluster_name: cluster.name.clone(),
            cluster_url: cluster.url.clone(),
            applications,
        }
    }

    /// Link to one application in the controller UI.
    pub fn application_url(&self, app: &str) -> String {
        format!("{}/applications/{}", self.cluster_url, app)
    }
}
