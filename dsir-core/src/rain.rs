use std::sync::Arc;

use crate::{
    backend::DsirBackend,
    container::Container,
    error::{LookupError, TemplateError},
    model::{FailureReason, RainQuery, RainResult},
    templates::{TemplateName, Templates},
};

/// Shown for failures the server gave no recognised reason for. Not a template.
pub const UNKNOWN_ERROR_HTML: &str = "<p>Unknown error!</p>";

/// What a rain lookup ended up showing.
#[derive(Debug, Clone, PartialEq)]
pub enum RainView {
    /// Rain day with measurable precipitation.
    Rain(RainResult),
    /// Rain day with zero or missing precipitation.
    Event(RainResult),
    NoLocation,
    NoRain,
    Unknown,
}

impl RainView {
    pub fn select(outcome: Result<RainResult, LookupError>) -> Self {
        match outcome {
            Ok(result) if result.has_precip() => RainView::Rain(result),
            Ok(result) => RainView::Event(result),
            Err(err) => match err.reason() {
                FailureReason::NoResults | FailureReason::NoLocation => RainView::NoLocation,
                FailureReason::NoRain => RainView::NoRain,
                FailureReason::Other(_) | FailureReason::Unrecognised => RainView::Unknown,
            },
        }
    }

    pub fn template(&self) -> Option<TemplateName> {
        match self {
            RainView::Rain(_) => Some(TemplateName::Rain),
            RainView::Event(_) => Some(TemplateName::RainEvent),
            RainView::NoLocation => Some(TemplateName::NoLocation),
            RainView::NoRain => Some(TemplateName::NoRain),
            RainView::Unknown => None,
        }
    }

    pub fn render(&self, templates: &dyn Templates) -> Result<String, TemplateError> {
        let Some(name) = self.template() else {
            return Ok(UNKNOWN_ERROR_HTML.to_string());
        };

        match self {
            RainView::Rain(result) | RainView::Event(result) => {
                templates.render(name, Some(result.as_value()))
            }
            _ => templates.render(name, None),
        }
    }
}

/// Looks up the last rain day for an address and renders it.
#[derive(Debug, Clone)]
pub struct RainLookup {
    backend: Arc<dyn DsirBackend>,
    templates: Arc<dyn Templates>,
}

impl RainLookup {
    pub fn new(backend: Arc<dyn DsirBackend>, templates: Arc<dyn Templates>) -> Self {
        Self { backend, templates }
    }

    /// Fetch `/data` for `address` and replace `container` with the matching view.
    ///
    /// Request failures become views; only a template failure is an error, in
    /// which case the container keeps its previous content.
    pub async fn find_rain<C>(
        &self,
        address: &str,
        threshold: f64,
        container: &C,
    ) -> Result<RainView, TemplateError>
    where
        C: Container + ?Sized,
    {
        let query = RainQuery::new(address, threshold);
        let outcome = self.backend.rain_data(&query).await;
        if let Err(err) = &outcome {
            log::debug!("rain lookup for {address:?} failed: {err}");
        }

        let view = RainView::select(outcome);
        log::debug!("rain lookup for {address:?} selected {:?}", view.template());

        let html = view.render(self.templates.as_ref())?;
        container.replace(html);
        Ok(view)
    }
}
