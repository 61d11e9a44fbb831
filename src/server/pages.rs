// src/server/pages.rs
//! HTML pages, rendered with Handlebars from templates compiled into the binary.

use crate::config::BackendKind;
use crate::error::AppError;
use handlebars::Handlebars;
use serde_json::json;

const PORTAL_TEMPLATE: &str = "portal";
const UNAVAILABLE_TEMPLATE: &str = "unavailable";

pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    /// Registers the embedded templates.
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        for (name, source) in [
            (PORTAL_TEMPLATE, include_str!("../../templates/portal.hbs")),
            (
                UNAVAILABLE_TEMPLATE,
                include_str!("../../templates/unavailable.hbs"),
            ),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(|e| AppError::TemplateRender {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { registry })
    }

    pub fn portal(&self, backend: BackendKind) -> Result<String, AppError> {
        self.render(PORTAL_TEMPLATE, &json!({ "backend": backend.to_string() }))
    }

    /// The setup page shown while no backend is configured.
    pub fn unavailable(&self, reason: &str) -> Result<String, AppError> {
        self.render(UNAVAILABLE_TEMPLATE, &json!({ "reason": reason }))
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, AppError> {
        self.registry
            .render(name, data)
            .map_err(|e| AppError::TemplateRender {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}
