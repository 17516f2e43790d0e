use async_trait::async_trait;
use reqwest::Client;

use fleetwatch_domain::{AlertMessage, AlertSeverity, MonitorError};
use fleetwatch_ports::NotifierPort;

// ntfy renders at most three action buttons.
const MAX_ACTIONS: usize = 3;

/// Publishes to an ntfy topic.
#[derive(Debug, Clone)]
pub struct NtfyNotifier {
    client: Client,
    url: String,
    topic: String,
}

impl NtfyNotifier {
    pub fn new(client: Client, url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            topic: topic.into(),
        }
    }

    pub fn topic_url(&self) -> String {
        format!("{}/{}", self.url, self.topic)
    }
}

/// Header set for one message: title, priority, tags, click target and
/// view actions.
pub fn headers(message: &AlertMessage) -> Vec<(&'static str, String)> {
    let (priority, tags) = match message.severity {
        AlertSeverity::Problem => ("high", "warning"),
        AlertSeverity::Recovered => ("default", "white_check_mark"),
    };
    let mut headers = vec![
        ("Title", message.title.clone()),
        ("Priority", priority.to_string()),
        ("Tags", tags.to_string()),
    ];
    if let Some(first) = message.links.first() {
        headers.push(("Click", first.url.clone()));
    }
    let actions = message
        .links
        .iter()
        .take(MAX_ACTIONS)
        .map(|link| format!("view, {}, {}", link.label.replace([',', ';'], " "), link.url))
        .collect::<Vec<_>>();
    if !actions.is_empty() {
        headers.push(("Actions", actions.join("; ")));
    }
    headers
}

#[async_trait]
impl NotifierPort for NtfyNotifier {
    fn channel(&self) -> &str {
        "ntfy"
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), MonitorError> {
        let body = if message.body.is_empty() {
            message.title.clone()
        } else {
            message.body.clone()
        };
        let mut request = self.client.post(self.topic_url()).body(body);
        for (name, value) in headers(message) {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|err| MonitorError::dispatch(self.channel(), err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::dispatch(
                self.channel(),
                format!("ntfy returned {status}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetwatch_domain::AlertLink;
    use httpmock::Method::POST;
    use httpmock::MockServer;

    fn link(label: &str) -> AlertLink {
        AlertLink {
            label: label.into(),
            url: format!("https://prod.example.com/applications/{label}"),
        }
    }

    #[test]
    fn problem_headers() {
        let message = AlertMessage {
            cluster: "prod".into(),
            severity: AlertSeverity::Problem,
            title: "prod: 4 application(s) need attention".into(),
            body: "...".into(),
            links: vec![link("a"), link("b,c"), link("d"), link("e")],
        };

        let headers = headers(&message);
        let get = |name: &str| {
            headers
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        };

        assert_eq!(get("Priority").as_deref(), Some("high"));
        assert_eq!(
            get("Click").as_deref(),
            Some("https://prod.example.com/applications/a")
        );
        let actions = get("Actions").unwrap();
        assert_eq!(actions.matches("view, ").count(), MAX_ACTIONS);
        assert!(actions.contains("view, b c, "));
    }

    #[test]
    fn recovery_without_links_has_no_click() {
        let message = AlertMessage {
            cluster: "prod".into(),
            severity: AlertSeverity::Recovered,
            title: "prod: all applications healthy again".into(),
            body: String::new(),
            links: Vec::new(),
        };
        let headers = headers(&message);
        assert!(headers.iter().all(|(key, _)| *key != "Click" && *key != "Actions"));
        assert!(headers.contains(&("Priority", "default".to_string())));
    }

    #[test]
    fn topic_url_trims_trailing_slash() {
        let notifier = NtfyNotifier::new(Client::new(), "https://ntfy.sh/", "fleet");
        assert_eq!(notifier.topic_url(), "https://ntfy.sh/fleet");
    }

    fn problem() -> AlertMessage {
        AlertMessage {
            cluster: "prod".into(),
            severity: AlertSeverity::Problem,
            title: "prod: 1 application(s) need attention".into(),
            body: "Degraded (1):\n  - api (Degraded/Synced)".into(),
            links: vec![link("api")],
        }
    }

    fn notifier(server: &MockServer) -> NtfyNotifier {
        let client = Client::builder().no_proxy().build().unwrap();
        NtfyNotifier::new(client, server.base_url(), "fleet")
    }

    #[tokio::test]
    async fn send_publishes_to_topic_with_headers() {
        let server = MockServer::start_async().await;
        let topic = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/fleet")
                    .header("Title", "prod: 1 application(s) need attention")
                    .header("Priority", "high")
                    .header("Tags", "warning")
                    .header("Click", "https://prod.example.com/applications/api")
                    .body("Degraded (1):\n  - api (Degraded/Synced)");
                then.status(200);
            })
            .await;

        notifier(&server).send(&problem()).await.unwrap();

        topic.assert_async().await;
    }

    #[tokio::test]
    async fn empty_body_falls_back_to_title() {
        let server = MockServer::start_async().await;
        let topic = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/fleet")
                    .body("prod: all applications healthy again");
                then.status(200);
            })
            .await;
        let message = AlertMessage {
            cluster: "prod".into(),
            severity: AlertSeverity::Recovered,
            title: "prod: all applications healthy again".into(),
            body: String::new(),
            links: Vec::new(),
        };

        notifier(&server).send(&message).await.unwrap();

        topic.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_publish_is_dispatch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/fleet");
                then.status(500);
            })
            .await;

        let err = notifier(&server).send(&problem()).await.unwrap_err();

        assert!(matches!(err, MonitorError::Dispatch { ref channel, .. } if channel == "ntfy"));
    }
}
