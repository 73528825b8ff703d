use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

use crate::{
    backend::DsirBackend,
    container::Container,
    error::TemplateError,
    model::{HistoryQuery, HistoryResult},
    templates::{TemplateName, Templates},
};

/// What a history lookup ended up showing.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    History(HistoryResult),
    Error,
}

impl HistoryView {
    pub fn template(&self) -> TemplateName {
        match self {
            HistoryView::History(_) => TemplateName::History,
            HistoryView::Error => TemplateName::HistoryError,
        }
    }

    pub fn render(&self, templates: &dyn Templates) -> Result<String, TemplateError> {
        match self {
            HistoryView::History(payload) => templates.render(self.template(), Some(payload)),
            HistoryView::Error => templates.render(self.template(), None),
        }
    }
}

/// Looks up an airport's weather on a given day and renders it.
#[derive(Debug, Clone)]
pub struct HistoryLookup {
    backend: Arc<dyn DsirBackend>,
    templates: Arc<dyn Templates>,
}

impl HistoryLookup {
    pub fn new(backend: Arc<dyn DsirBackend>, templates: Arc<dyn Templates>) -> Self {
        Self { backend, templates }
    }

    /// Fetch `/historydata` and replace `container` with the payload or the error template.
    pub async fn airport_history<C>(
        &self,
        airport: &str,
        date: &str,
        container: &C,
    ) -> Result<HistoryView, TemplateError>
    where
        C: Container + ?Sized,
    {
        let query = HistoryQuery::new(airport, date);

        let view = match self.backend.history_data(&query).await {
            Ok(payload) => HistoryView::History(payload),
            Err(err) => {
                log::debug!("history lookup for {airport} on {date} failed: {err}");
                HistoryView::Error
            }
        };

        let html = view.render(self.templates.as_ref())?;
        container.replace(html);
        Ok(view)
    }
}

/// Weather Underground daily history page for an airport on a date (`YYYY-MM-DD`).
pub fn daily_history_url(airport: &str, date: &str) -> Result<String, chrono::ParseError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;

    Ok(format!(
        "http://www.wunderground.com/history/airport/{}/{}/{}/{}/DailyHistory.html",
        airport.to_uppercase(),
        day.year(),
        day.month(),
        day.day(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        container::MemoryContainer,
        error::LookupError,
        templates::TemplateRegistry,
        test_support::{Canned, FakeBackend, RecordingTemplates},
    };
    use reqwest::StatusCode;
    use serde_json::json;

    fn history_lookup(
        answer: Canned,
    ) -> (HistoryLookup, Arc<FakeBackend>, Arc<RecordingTemplates>) {
        let backend = Arc::new(FakeBackend::new(answer));
        let templates = Arc::new(RecordingTemplates::default());
        (HistoryLookup::new(backend.clone(), templates.clone()), backend, templates)
    }

    #[tokio::test]
    async fn success_passes_payload_unmodified() {
        let payload = json!({
            "airport": "KSEA",
            "date": "2020-01-01",
            "precip": 0.3,
            "events": ["rain", "fog"],
            "nested": {"anything": [1, 2, 3]},
        });
        let (lookup, backend, templates) = history_lookup(Canned::Ok(payload.clone()));
        let container = MemoryContainer::new();

        let view = lookup.airport_history("KSEA", "2020-01-01", &container).await.unwrap();

        assert_eq!(view, HistoryView::History(payload.clone()));
        assert_eq!(container.contents(), "[history]");
        assert_eq!(*templates.calls.lock(), vec![(TemplateName::History, Some(payload))]);
        assert_eq!(
            *backend.history_queries.lock(),
            vec![HistoryQuery::new("KSEA", "2020-01-01")]
        );
    }

    #[tokio::test]
    async fn any_failure_renders_error_template_without_data() {
        let answers = [
            Canned::Fail(StatusCode::INTERNAL_SERVER_ERROR, None),
            Canned::Fail(StatusCode::NOT_FOUND, Some("no location")),
            Canned::Fail(StatusCode::BAD_REQUEST, Some("no rain")),
        ];

        for answer in answers {
            let (lookup, _, templates) = history_lookup(answer);
            let container = MemoryContainer::with_content("<p>old</p>");

            let view = lookup.airport_history("KSEA", "2020-01-01", &container).await.unwrap();

            assert_eq!(view, HistoryView::Error);
            assert_eq!(container.contents(), "[history-error]");
            assert_eq!(*templates.calls.lock(), vec![(TemplateName::HistoryError, None)]);
        }
    }

    #[derive(Debug)]
    struct OfflineBackend;

    #[async_trait::async_trait]
    impl DsirBackend for OfflineBackend {
        async fn rain_data(
            &self,
            _query: &crate::model::RainQuery,
        ) -> Result<crate::model::RainResult, LookupError> {
            Err(LookupError::Url(url::ParseError::EmptyHost))
        }

        async fn history_data(&self, _query: &HistoryQuery) -> Result<HistoryResult, LookupError> {
            Err(LookupError::Url(url::ParseError::EmptyHost))
        }
    }

    #[tokio::test]
    async fn non_status_failure_renders_error_template() {
        let templates = Arc::new(TemplateRegistry::new().unwrap());
        let lookup = HistoryLookup::new(Arc::new(OfflineBackend), templates);
        let container = MemoryContainer::new();

        let view = lookup.airport_history("KSEA", "2020-01-01", &container).await.unwrap();

        assert_eq!(view, HistoryView::Error);
        assert!(container.contents().contains("no history is available"));
    }

    #[test]
    fn builds_daily_history_url() {
        assert_eq!(
            daily_history_url("ksea", "2015-07-04").unwrap(),
            "http://www.wunderground.com/history/airport/KSEA/2015/7/4/DailyHistory.html"
        );
    }

    #[test]
    fn daily_history_url_rejects_bad_dates() {
        assert!(daily_history_url("KSEA", "2015-13-01").is_err());
        assert!(daily_history_url("KSEA", "yesterday").is_err());
    }
}
