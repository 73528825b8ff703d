//! Named HTML templates.
//!
//! Lookups never talk to handlebars directly; they go through the
//! [`Templates`] trait so a registry can be swapped for a recording fake.

use handlebars::{Handlebars, handlebars_helper};
use serde_json::Value;
use std::{fmt, fs, path::Path};

use crate::{error::TemplateError, history::daily_history_url};

/// Every template the lookups know how to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    /// Rain found, with a positive precipitation amount.
    Rain,
    /// Rain day found but no measurable precipitation (a weather event).
    RainEvent,
    NoLocation,
    NoRain,
    History,
    HistoryError,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Rain => "dsir",
            TemplateName::RainEvent => "dsir-event",
            TemplateName::NoLocation => "no-location",
            TemplateName::NoRain => "no-rain",
            TemplateName::History => "history",
            TemplateName::HistoryError => "history-error",
        }
    }

    pub const fn all() -> &'static [TemplateName] {
        &[
            TemplateName::Rain,
            TemplateName::RainEvent,
            TemplateName::NoLocation,
            TemplateName::NoRain,
            TemplateName::History,
            TemplateName::HistoryError,
        ]
    }

    fn default_source(&self) -> &'static str {
        match self {
            TemplateName::Rain => DSIR_TEMPLATE,
            TemplateName::RainEvent => DSIR_EVENT_TEMPLATE,
            TemplateName::NoLocation => NO_LOCATION_TEMPLATE,
            TemplateName::NoRain => NO_RAIN_TEMPLATE,
            TemplateName::History => HISTORY_TEMPLATE,
            TemplateName::HistoryError => HISTORY_ERROR_TEMPLATE,
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a named template. `None` means the template gets no data at all.
pub trait Templates: Send + Sync + fmt::Debug {
    fn render(&self, name: TemplateName, data: Option<&Value>) -> Result<String, TemplateError>;
}

handlebars_helper!(history_url: |airport: str, date: str| {
    daily_history_url(airport, date).unwrap_or_default()
});

/// Handlebars-backed template set.
pub struct TemplateRegistry {
    hbs: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Registry holding only the built-in templates.
    pub fn new() -> Result<Self, TemplateError> {
        let mut hbs = Handlebars::new();
        hbs.register_helper("history_url", Box::new(history_url));

        let mut registry = Self { hbs };
        for name in TemplateName::all() {
            registry.register(*name, name.default_source())?;
        }
        Ok(registry)
    }

    /// Built-in templates, replaced by any `<name>.hbs` file found in `dir`.
    pub fn with_overrides(dir: &Path) -> Result<Self, TemplateError> {
        let mut registry = Self::new()?;

        for name in TemplateName::all() {
            let path = dir.join(format!("{}.hbs", name.as_str()));
            if !path.is_file() {
                continue;
            }
            log::debug!("loading template override {}", path.display());
            let source = fs::read_to_string(&path)?;
            registry.register(*name, &source)?;
        }

        Ok(registry)
    }

    /// Replace the source of one template.
    pub fn register(&mut self, name: TemplateName, source: &str) -> Result<(), TemplateError> {
        self.hbs.register_template_string(name.as_str(), source).map_err(|source| {
            TemplateError::Register { name: name.to_string(), source: Box::new(source) }
        })
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.hbs.get_templates().keys().collect();
        names.sort();
        f.debug_struct("TemplateRegistry").field("templates", &names).finish()
    }
}

impl Templates for TemplateRegistry {
    fn render(&self, name: TemplateName, data: Option<&Value>) -> Result<String, TemplateError> {
        if !self.hbs.has_template(name.as_str()) {
            return Err(TemplateError::Missing(name.to_string()));
        }

        let html = match data {
            Some(data) => self.hbs.render(name.as_str(), data)?,
            None => self.hbs.render(name.as_str(), &())?,
        };
        Ok(html)
    }
}

const DSIR_TEMPLATE: &str = r#"<div class="dsir">
  <p class="dsir-days">{{dsir}}</p>
  <p>days since it rained at <strong>{{address}}</strong>.</p>
  <p>On {{date}} it rained {{precip}} inches.</p>
</div>"#;

const DSIR_EVENT_TEMPLATE: &str = r#"<div class="dsir">
  <p class="dsir-days">{{dsir}}</p>
  <p>days since it rained at <strong>{{address}}</strong>.</p>
  <p>There was rain on {{date}} but not enough to measure.</p>
</div>"#;

const NO_LOCATION_TEMPLATE: &str = r#"<div class="dsir-error">
  <p>Sorry, we couldn't find that location. Try a more specific address.</p>
</div>"#;

const NO_RAIN_TEMPLATE: &str = r#"<div class="dsir-error">
  <p>We looked back five years and didn't find any rain!</p>
</div>"#;

const HISTORY_TEMPLATE: &str = r#"<div class="history">
  <h2>{{airport}} on {{date}}</h2>
  <ul>
    <li>High: {{max_temp}}</li>
    <li>Low: {{min_temp}}</li>
    <li>Precipitation: {{precip}}</li>
    {{#each events}}<li class="event">{{this}}</li>{{/each}}
  </ul>
  {{#if airport}}{{#if date}}<a href="{{history_url airport date}}">Full daily history</a>{{/if}}{{/if}}
</div>"#;

const HISTORY_ERROR_TEMPLATE: &str = r#"<div class="history-error">
  <p>Sorry, no history is available for that airport and date.</p>
</div>"#;
