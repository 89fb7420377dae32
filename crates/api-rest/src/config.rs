//! REST server configuration: listen address and CORS policy.

use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use symptom_core::{SymptomError, SymptomResult};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Port used when neither `SYMPTOM_REST_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 5000;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is not set: local frontend dev server and the
/// deployed frontend.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "https://doctor-ai-phi-three.vercel.app",
];

#[derive(Clone, Debug)]
pub struct RestConfig {
    addr: SocketAddr,
    allowed_origins: Vec<HeaderValue>,
}

impl RestConfig {
    /// Build the configuration from already-read environment values.
    ///
    /// `addr` wins over `port`; `origins` is a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns `SymptomError::Config` for an unparsable address, port or origin, and for the `*`
    /// wildcard origin.
    pub fn from_env_values(
        addr: Option<String>,
        port: Option<String>,
        origins: Option<String>,
    ) -> SymptomResult<Self> {
        let addr = match non_blank(addr) {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .map_err(|e| SymptomError::Config(format!("SYMPTOM_REST_ADDR `{addr}`: {e}")))?,
            None => {
                let port = match non_blank(port) {
                    Some(port) => port
                        .parse::<u16>()
                        .map_err(|e| SymptomError::Config(format!("PORT `{port}`: {e}")))?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let origins: Vec<String> = match non_blank(origins) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };
        let allowed_origins = origins
            .iter()
            .map(|o| {
                if o == "*" {
                    return Err(SymptomError::Config(
                        "CORS origin `*` cannot be combined with credentials; list origins explicitly"
                            .into(),
                    ));
                }
                HeaderValue::from_str(o)
                    .map_err(|e| SymptomError::Config(format!("CORS origin `{o}`: {e}")))
            })
            .collect::<SymptomResult<Vec<_>>>()?;

        Ok(Self {
            addr,
            allowed_origins,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn allowed_origins(&self) -> &[HeaderValue] {
        &self.allowed_origins
    }

    /// CORS policy for the configured origins, allowing credentials and JSON requests.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed_origins.clone()))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_credentials(true)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_port_5000_with_known_origins() {
        let cfg = RestConfig::from_env_values(None, None, None).unwrap();
        assert_eq!(cfg.addr(), "0.0.0.0:5000".parse().unwrap());
        assert_eq!(cfg.allowed_origins().len(), DEFAULT_ALLOWED_ORIGINS.len());
    }

    #[test]
    fn explicit_address_wins_over_port() {
        let cfg = RestConfig::from_env_values(
            Some("127.0.0.1:8080".into()),
            Some("9000".into()),
            None,
        )
        .unwrap();
        assert_eq!(cfg.addr(), "127.0.0.1:8080".parse().unwrap());

        let cfg = RestConfig::from_env_values(None, Some("9000".into()), None).unwrap();
        assert_eq!(cfg.addr().port(), 9000);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let cfg = RestConfig::from_env_values(
            None,
            None,
            Some(" http://a.test , ,http://b.test".into()),
        )
        .unwrap();
        assert_eq!(
            cfg.allowed_origins(),
            &[
                HeaderValue::from_static("http://a.test"),
                HeaderValue::from_static("http://b.test")
            ]
        );
    }

    #[test]
    fn bad_values_are_config_errors() {
        assert!(matches!(
            RestConfig::from_env_values(Some("not-an-addr".into()), None, None),
            Err(SymptomError::Config(_))
        ));
        assert!(matches!(
            RestConfig::from_env_values(None, Some("70000".into()), None),
            Err(SymptomError::Config(_))
        ));
    }

    #[test]
    fn wildcard_origin_is_a_config_error() {
        for origins in ["*", "http://a.test, *"] {
            assert!(matches!(
                RestConfig::from_env_values(None, None, Some(origins.into())),
                Err(SymptomError::Config(_))
            ));
        }
    }

    #[test]
    fn explicit_origins_build_a_cors_layer() {
        let cfg = RestConfig::from_env_values(None, None, Some("http://a.test".into()))
            .expect("config should build");
        let _layer = cfg.cors_layer();
    }
}
