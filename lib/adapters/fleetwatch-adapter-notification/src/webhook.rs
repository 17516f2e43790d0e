use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use fleetwatch_domain::{AlertMessage, AlertSeverity, MonitorError};
use fleetwatch_ports::NotifierPort;

/// Chat incoming-webhook sink (Slack-compatible payload).
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

/// Builds the JSON body: plain `text` plus one attachment carrying the
/// grouped details and the links.
pub fn payload(message: &AlertMessage) -> Value {
    let color = match message.severity {
        AlertSeverity::Problem => "danger",
        AlertSeverity::Recovered => "good",
    };
    let links = message
        .links
        .iter()
        .map(|link| format!("<{}|{}>", link.url, link.label))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut details = message.body.clone();
    if !links.is_empty() {
        if !details.is_empty() {
            details.push('\n');
        }
        details.push_str(&links);
    }

    json!({
        "text": message.title,
        "attachments": [{
            "color": color,
            "text": details,
        }],
    })
}

#[async_trait]
impl NotifierPort for WebhookNotifier {
    fn channel(&self) -> &str {
        "webhook"
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), MonitorError> {
        let response = self
            .client
            .post(&self.url)
            .json(&payload(message))
            .send()
            .await
            .map_err(|err| MonitorError::dispatch(self.channel(), err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::dispatch(
                self.channel(),
                format!("webhook returned {status}"),
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

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn recovery() -> AlertMessage {
        AlertMessage {
            cluster: "prod".into(),
            severity: AlertSeverity::Recovered,
            title: "prod: all applications healthy again".into(),
            body: String::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn payload_carries_title_details_and_links() {
        let message = AlertMessage {
            cluster: "prod".into(),
            severity: AlertSeverity::Problem,
            title: "prod: 1 application(s) need attention".into(),
            body: "Degraded (1):\n  - api (Degraded/Synced)".into(),
            links: vec![AlertLink {
                label: "Open prod".into(),
                url: "https://prod.example.com".into(),
            }],
        };

        let body = payload(&message);

        assert_eq!(body["text"], "prod: 1 application(s) need attention");
        assert_eq!(body["attachments"][0]["color"], "danger");
        let details = body["attachments"][0]["text"].as_str().unwrap();
        assert!(details.starts_with("Degraded (1):"));
        assert!(details.ends_with("<https://prod.example.com|Open prod>"));
    }

    #[test]
    fn recovery_payload_is_green() {
        let body = payload(&recovery());
        assert_eq!(body["attachments"][0]["color"], "good");
        assert_eq!(body["attachments"][0]["text"], "");
    }

    #[tokio::test]
    async fn send_posts_payload_to_hook() {
        let server = MockServer::start_async().await;
        let hook = server
            .mock_async(|when, then| {
                when.method(POST).path("/hooks/fleet").json_body(json!({
                    "text": "prod: all applications healthy again",
                    "attachments": [{"color": "good", "text": ""}],
                }));
                then.status(200);
            })
            .await;
        let notifier = WebhookNotifier::new(client(), server.url("/hooks/fleet"));

        notifier.send(&recovery()).await.unwrap();

        hook.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_delivery_is_dispatch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hooks/fleet");
                then.status(500);
            })
            .await;
        let notifier = WebhookNotifier::new(client(), server.url("/hooks/fleet"));

        let err = notifier.send(&recovery()).await.unwrap_err();

        assert!(matches!(err, MonitorError::Dispatch { ref channel, .. } if channel == "webhook"));
    }

    #[tokio::test]
    async fn unreachable_hook_is_dispatch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let notifier = WebhookNotifier::new(client(), format!("http://{addr}/hook"));

        let err = notifier.send(&recovery()).await.unwrap_err();

        assert!(matches!(err, MonitorError::Dispatch { .. }));
    }
}
