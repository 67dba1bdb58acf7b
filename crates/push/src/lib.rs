use std::{collections::BTreeMap, env, time::Duration};

use async_trait::async_trait;
use model::alert::AlertPayload;
use proximity::{delivery::MessageDelivery, DeliveryError};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct PushCredentials {
    pub gateway_url: String,
    pub server_key: String,
    pub proxy: Option<String>,
}

impl PushCredentials {
    pub fn from_env() -> Option<Self> {
        let gateway_url = env::var("PUSH_GATEWAY_URL").ok()?;
        let server_key = env::var("PUSH_SERVER_KEY").ok()?;
        Some(Self {
            gateway_url,
            server_key,
            proxy: env::var("PUSH_PROXY").ok(),
        })
    }
}

#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    to: &'a str,
    notification: Notification<'a>,
    data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

impl<'a> PushMessage<'a> {
    fn new(address: &'a str, payload: &'a AlertPayload) -> Self {
        Self {
            to: address,
            notification: Notification {
                title: &payload.title,
                body: &payload.body,
            },
            data: &payload.data,
        }
    }
}

/// Per-device result as reported by the gateway. A message to an unknown
/// device still answers `200 OK` and only carries the error here.
#[derive(Debug, Default, Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    results: Vec<GatewayResult>,
}

#[derive(Debug, Deserialize)]
struct GatewayResult {
    error: Option<String>,
}

fn interpret(status: reqwest::StatusCode, body: &str) -> Result<(), DeliveryError> {
    if !status.is_success() {
        return Err(DeliveryError::Rejected {
            status: status.as_u16(),
            reason: if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_owned()
            },
        });
    }

    let response: GatewayResponse = serde_json::from_str(body).unwrap_or_default();
    match response.results.into_iter().find_map(|result| result.error) {
        Some(error) => Err(DeliveryError::Rejected {
            status: status.as_u16(),
            reason: error,
        }),
        None => Ok(()),
    }
}

/// Sends alerts through an HTTP push gateway, one request per device.
pub struct HttpPushDelivery {
    pub credentials: PushCredentials,
    client: reqwest::Client,
}

impl HttpPushDelivery {
    pub fn new(credentials: PushCredentials) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy_url) = &credentials.proxy {
            log::info!("push gateway requests use proxy '{proxy_url}'");
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        Ok(Self {
            client: builder.build()?,
            credentials,
        })
    }
}

#[async_trait]
impl MessageDelivery for HttpPushDelivery {
    async fn deliver(&self, address: &str, payload: &AlertPayload) -> Result<(), DeliveryError> {
        if address.trim().is_empty() {
            return Err(DeliveryError::InvalidAddress);
        }

        let response = self
            .client
            .post(&self.credentials.gateway_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("key={}", self.credentials.server_key),
            )
            .json(&PushMessage::new(address, payload))
            .send()
            .await
            .map_err(DeliveryError::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(DeliveryError::transport)?;
        log::debug!("push gateway answered {status}");
        interpret(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use model::alert::{AlertStatus, SosAlert};
    use reqwest::StatusCode;
    use utility::{geo::GeoPoint, id::Id};

    use super::*;

    fn payload() -> AlertPayload {
        SosAlert {
            id: Id::from("alert-7"),
            user_id: Id::from("u-1"),
            location: GeoPoint {
                latitude: -26.2041,
                longitude: 28.0473,
            },
            timestamp: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            status: AlertStatus::Active,
        }
        .payload()
    }

    #[test]
    fn message_carries_notification_and_data() {
        let payload = payload();
        let json = serde_json::to_value(PushMessage::new("token-1", &payload)).unwrap();
        assert_eq!(json["to"], "token-1");
        assert_eq!(json["notification"]["title"], payload.title.as_str());
        assert_eq!(json["data"]["type"], "sos_alert");
        assert_eq!(json["data"]["alertId"], "alert-7");
    }

    #[test]
    fn accepted_message_is_delivered() {
        let body = r#"{"success":1,"failure":0,"results":[{"message_id":"0:1"}]}"#;
        assert!(interpret(StatusCode::OK, body).is_ok());
        assert!(interpret(StatusCode::OK, "").is_ok());
    }

    #[test]
    fn per_device_error_is_a_rejection() {
        let body = r#"{"success":0,"failure":1,"results":[{"error":"NotRegistered"}]}"#;
        match interpret(StatusCode::OK, body) {
            Err(DeliveryError::Rejected { status, reason }) => {
                assert_eq!(status, 200);
                assert_eq!(reason, "NotRegistered");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn error_status_is_a_rejection() {
        assert!(matches!(
            interpret(StatusCode::UNAUTHORIZED, ""),
            Err(DeliveryError::Rejected { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn blank_address_is_not_sent() {
        let delivery = HttpPushDelivery::new(PushCredentials {
            gateway_url: "http://127.0.0.1:9/send".to_owned(),
            server_key: "key".to_owned(),
            proxy: None,
        })
        .unwrap();
        assert!(matches!(
            delivery.deliver(" ", &payload()).await,
            Err(DeliveryError::InvalidAddress)
        ));
    }
}
