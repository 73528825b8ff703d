//! Fakes shared by the lookup tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::Value;

use crate::{
    backend::DsirBackend,
    error::{LookupError, TemplateError},
    model::{ErrorPayload, HistoryQuery, HistoryResult, RainQuery, RainResult},
    templates::{TemplateName, Templates},
};

/// What the fake server answers.
#[derive(Debug, Clone)]
pub enum Canned {
    Ok(Value),
    /// Non-2xx status with an optional JSON `{message}` body.
    Fail(StatusCode, Option<&'static str>),
}

impl Canned {
    fn to_result<T: serde::de::DeserializeOwned>(&self) -> Result<T, LookupError> {
        match self {
            Canned::Ok(body) => Ok(serde_json::from_value(body.clone())?),
            Canned::Fail(status, message) => Err(LookupError::Status {
                status: *status,
                payload: message.map(|m| ErrorPayload { message: m.to_string(), status: None }),
            }),
        }
    }
}

#[derive(Debug)]
pub struct FakeBackend {
    pub answer: Canned,
    pub rain_queries: Mutex<Vec<RainQuery>>,
    pub history_queries: Mutex<Vec<HistoryQuery>>,
}

impl FakeBackend {
    pub fn new(answer: Canned) -> Self {
        Self { answer, rain_queries: Mutex::default(), history_queries: Mutex::default() }
    }
}

#[async_trait]
impl DsirBackend for FakeBackend {
    async fn rain_data(&self, query: &RainQuery) -> Result<RainResult, LookupError> {
        self.rain_queries.lock().push(query.clone());
        self.answer.to_result()
    }

    async fn history_data(&self, query: &HistoryQuery) -> Result<HistoryResult, LookupError> {
        self.history_queries.lock().push(query.clone());
        self.answer.to_result()
    }
}

/// Records every render call and returns `[name]` as the HTML.
#[derive(Debug, Default)]
pub struct RecordingTemplates {
    pub calls: Mutex<Vec<(TemplateName, Option<Value>)>>,
}

impl Templates for RecordingTemplates {
    fn render(&self, name: TemplateName, data: Option<&Value>) -> Result<String, TemplateError> {
        self.calls.lock().push((name, data.cloned()));
        Ok(format!("[{name}]"))
    }
}
