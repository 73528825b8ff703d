use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use url::Url;

use crate::{
    Config,
    error::LookupError,
    model::{ErrorPayload, HistoryQuery, HistoryResult, RainQuery, RainResult},
};

/// Source of rain and history data.
#[async_trait]
pub trait DsirBackend: Send + Sync + Debug {
    async fn rain_data(&self, query: &RainQuery) -> Result<RainResult, LookupError>;

    async fn history_data(&self, query: &HistoryQuery) -> Result<HistoryResult, LookupError>;
}

/// Talks to the `/data` and `/historydata` endpoints of a dsir server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, LookupError> {
        let mut base = Url::parse(base_url)?;
        // join() drops the last path segment unless the base ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, http: Client::new() })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn get_json<T, Q>(&self, endpoint: &str, params: &Q) -> Result<T, LookupError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.base.join(endpoint)?;
        log::debug!("GET {url}");

        let res = self.http.get(url).query(params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let payload = serde_json::from_str::<ErrorPayload>(&body).ok();
            log::debug!("{endpoint} failed with status {status}: {payload:?}");
            return Err(LookupError::Status { status, payload });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DsirBackend for HttpBackend {
    async fn rain_data(&self, query: &RainQuery) -> Result<RainResult, LookupError> {
        self.get_json("data", &query.to_params()).await
    }

    async fn history_data(&self, query: &HistoryQuery) -> Result<HistoryResult, LookupError> {
        self.get_json("historydata", &query.to_params()).await
    }
}

/// Construct the HTTP backend pointed at the configured server.
pub fn backend_from_config(config: &Config) -> anyhow::Result<Box<dyn DsirBackend>> {
    let base_url = config.base_url();
    let backend = HttpBackend::new(&base_url).map_err(|e| {
        anyhow::anyhow!(
            "Invalid server url '{base_url}': {e}\n\
             Hint: run `dsir configure` or set DSIR_BASE_URL."
        )
    })?;

    Ok(Box::new(backend))
}
