use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use f5export_common::config::Config;
use f5export_common::network::link;
use f5export_protocols::icontrol::{
    AUTH_TOKEN_HEADER, LOGIN_PATH, LoginRequest, LoginResponse, Payload, VERSION_PATH,
    VersionResponse,
};

use super::{Device, DeviceError};

enum Auth {
    Token(String),
    Basic { username: String, password: String },
}

/// Blocking iControl REST client for one BIG-IP.
pub struct BigIpClient {
    client: Client,
    base_url: Url,
    auth: Auth,
}

impl BigIpClient {
    /// Opens an authenticated session.
    ///
    /// A token is requested from the login endpoint; devices that do not offer
    /// one get HTTP basic auth instead. The session is confirmed with a version
    /// query before returning, so bad credentials fail here and not on the
    /// first inventory call.
    pub fn connect(cfg: &Config) -> Result<Self, DeviceError> {
        info!("Connecting to BIG-IP at {}", cfg.hostname);
        let connect_err = |reason: String| DeviceError::Connect {
            host: cfg.hostname.clone(),
            reason,
        };

        let base_url = base_url(&cfg.hostname).map_err(|e| connect_err(format!("invalid hostname: {e}")))?;
        if !cfg.verify_tls {
            warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .timeout(cfg.timeout)
            .danger_accept_invalid_certs(!cfg.verify_tls)
            .no_proxy()
            .build()
            .map_err(|e| connect_err(format!("cannot build HTTP client: {e}")))?;

        let auth = login(&client, &base_url, cfg).map_err(connect_err)?;
        let device = Self {
            client,
            base_url,
            auth,
        };

        let version: VersionResponse = super::fetch_object(&device, VERSION_PATH)
            .map_err(|e| connect_err(format!("session check failed: {e}")))?;
        info!(
            "Connected to {} ({} {}, build {})",
            device.base_url,
            version.product().unwrap_or_else(|| "BIG-IP".to_string()),
            version.version().unwrap_or_else(|| "unknown version".to_string()),
            version.build().unwrap_or_else(|| "unknown".to_string()),
        );

        Ok(device)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Token(token) => request.header(AUTH_TOKEN_HEADER, token),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

impl Device for BigIpClient {
    fn fetch(&self, path: &str) -> Result<Payload, DeviceError> {
        let path = link::path_of(path);
        let url = self.base_url.join(&path).map_err(|e| DeviceError::Connect {
            host: self.base_url.to_string(),
            reason: format!("invalid path {path}: {e}"),
        })?;

        let response = self
            .authorize(self.client.get(url))
            .send()
            .map_err(|source| DeviceError::Http {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Status {
                path,
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().map_err(|source| DeviceError::Http {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path, "fetched {body}");

        Ok(Payload::from_json(body))
    }
}

fn login(client: &Client, base_url: &Url, cfg: &Config) -> Result<Auth, String> {
    let url = base_url.join(LOGIN_PATH).map_err(|e| e.to_string())?;
    let response = client
        .post(url)
        .json(&LoginRequest::new(&cfg.username, &cfg.password))
        .send()
        .map_err(|e| format!("login request failed: {e}"))?;

    match response.status() {
        status if status.is_success() => {
            let body: LoginResponse = response
                .json()
                .map_err(|e| format!("malformed login response: {e}"))?;
            debug!("Obtained authentication token for {}", cfg.username);
            Ok(Auth::Token(body.token.token))
        }
        StatusCode::NOT_FOUND => {
            debug!("Token login not available, using basic auth");
            Ok(Auth::Basic {
                username: cfg.username.clone(),
                password: cfg.password.clone(),
            })
        }
        status => Err(format!("login rejected with HTTP {status}")),
    }
}

/// `bigip.example.net:8443` becomes `https://bigip.example.net:8443/`.
fn base_url(hostname: &str) -> Result<Url, url::ParseError> {
    if hostname.contains("://") {
        Url::parse(hostname)
    } else {
        Url::parse(&format!("https://{hostname}/"))
    }
}
