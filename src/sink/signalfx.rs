//! SignalFx is a hosted metrics service
//!
//! This sink posts points to SignalFx's JSON datapoint API. Points are grouped
//! by kind and shipped in a single request:
//!
//! ```text
//! {"gauge":[{"metric":"cpu.usage_idle","value":99.5,"dimensions":{"host":"a"},"timestamp":1000000}]}
//! ```
//!
//! Timestamps go out in milliseconds. There is no retry; a failed request
//! fails the run.

use hyper::Client;
use hyper::header::{ContentType, Headers, UserAgent};
use hyper::net::HttpsConnector;
use hyper_native_tls::NativeTlsClient;
use metric::{Point, TagMap, Value};
use serde_json;
use sink::{Error, Sink};
use std::collections::BTreeMap;
use std::io::Read;
use url::Url;

/// Where points go unless the configuration says otherwise.
pub const DEFAULT_ENDPOINT: &str = "https://ingest.signalfx.com/v2/datapoint";

/// The header SignalFx reads the access token from.
pub const TOKEN_HEADER: &str = "X-SF-Token";

fn default_user_agent() -> String {
    format!("sfxpipe/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for the SignalFx sink
///
/// Read from the `[signalfx]` table of the configuration file.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalFxConfig {
    /// The organization access token. Required.
    pub auth_token: String,
    /// Overrides the `User-Agent` header.
    pub user_agent: Option<String>,
    /// Overrides `DEFAULT_ENDPOINT`.
    pub endpoint: Option<String>,
}

impl SignalFxConfig {
    /// Create a new `SignalFxConfig` with the default endpoint and user agent.
    pub fn new<S>(auth_token: S) -> SignalFxConfig
    where
        S: Into<String>,
    {
        SignalFxConfig {
            auth_token: auth_token.into(),
            user_agent: None,
            endpoint: None,
        }
    }
}

/// The SignalFx sink
pub struct SignalFx {
    client: Client,
    auth_token: String,
    user_agent: String,
    endpoint: String,
}

impl SignalFx {
    /// Construct a new SignalFx sink
    ///
    /// No connection is made here. This fails if the token is empty, the
    /// endpoint is not an http or https URL, or TLS cannot be set up.
    pub fn new(config: SignalFxConfig) -> Result<SignalFx, Error> {
        if config.auth_token.is_empty() {
            return Err(Error::Connect("auth_token must not be empty".to_string()));
        }
        let endpoint = config
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        match Url::parse(&endpoint) {
            Ok(ref url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(Error::Connect(format!(
                    "endpoint {} must use http or https",
                    url
                )))
            }
            Err(e) => {
                return Err(Error::Connect(format!(
                    "endpoint {:?} is not a valid URL: {}",
                    endpoint, e
                )))
            }
        }
        let tls = NativeTlsClient::new()
            .map_err(|e| Error::Connect(format!("could not initialize TLS: {}", e)))?;

        Ok(SignalFx {
            client: Client::with_connector(HttpsConnector::new(tls)),
            auth_token: config.auth_token,
            user_agent: config.user_agent.unwrap_or_else(default_user_agent),
            endpoint: endpoint,
        })
    }

    /// The URL points are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The `User-Agent` sent with each request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[derive(Serialize)]
struct Datapoint<'a> {
    metric: &'a str,
    value: Value,
    dimensions: &'a TagMap,
    timestamp: i64,
}

/// Serialize a batch into a SignalFx request body.
pub fn encode(points: &[Point]) -> Result<String, serde_json::Error> {
    let mut body: BTreeMap<&'static str, Vec<Datapoint>> = BTreeMap::new();
    for p in points {
        body.entry(p.kind.as_str())
            .or_insert_with(Vec::new)
            .push(Datapoint {
                metric: &p.name,
                value: p.value,
                dimensions: &p.tags,
                timestamp: p.timestamp_ms(),
            });
    }
    serde_json::to_string(&body)
}

impl Sink for SignalFx {
    fn send(&mut self, points: &[Point]) -> Result<(), Error> {
        if points.is_empty() {
            debug!("no points to send to {}", self.endpoint);
            return Ok(());
        }
        let body = encode(points)?;
        trace!("BODY: {}", body);

        let mut headers = Headers::new();
        headers.set(ContentType::json());
        headers.set(UserAgent(self.user_agent.clone()));
        headers.set_raw(TOKEN_HEADER, vec![self.auth_token.clone().into_bytes()]);

        let mut res = self.client
            .post(self.endpoint.as_str())
            .headers(headers)
            .body(body.as_str())
            .send()?;
        let mut reply = String::new();
        if let Err(e) = res.read_to_string(&mut reply) {
            debug!("could not read response body from {}: {}", self.endpoint, e);
        }

        if res.status.is_success() {
            info!("sent {} points to {}", points.len(), self.endpoint);
            Ok(())
        } else {
            Err(Error::Rejected {
                status: res.status.to_u16(),
                body: reply,
            })
        }
    }
}
