//! HTML page rendering with Tera
//!
//! Templates are embedded at compile time so the binary runs from any directory.

use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::SmartTravelError;

pub const INDEX: &str = "index.html";
pub const HISTORY: &str = "history.html";

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../templates/base.html")),
    (INDEX, include_str!("../templates/index.html")),
    (HISTORY, include_str!("../templates/history.html")),
];

/// Compiled page templates, cheap to clone
#[derive(Debug, Clone)]
pub struct PageRenderer {
    tera: Arc<Tera>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, SmartTravelError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        debug!("Compiled {} page templates", TEMPLATES.len());
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render `template` with every top-level field of `data` in the context
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, SmartTravelError> {
        let context = Context::from_serialize(data)?;
        Ok(self.tera.render(template, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_compile() {
        assert!(PageRenderer::new().is_ok());
    }

    #[test]
    fn test_index_escapes_input() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render(
                INDEX,
                &json!({
                    "cities": [{"name": "<script>"}],
                    "form": {"start_city": "", "end_city": ""},
                    "errors": {},
                    "plan": null,
                    "notice": null,
                }),
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("id=\"results\""));
    }

    #[test]
    fn test_history_empty() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render(HISTORY, &json!({ "queries": [], "notice": null }))
            .unwrap();
        assert!(html.contains("No trips planned yet."));
    }

    #[test]
    fn test_missing_template_is_error() {
        let renderer = PageRenderer::new().unwrap();
        let err = renderer.render("nope.html", &json!({})).unwrap_err();
        assert!(matches!(err, SmartTravelError::Template { .. }));
    }
}
