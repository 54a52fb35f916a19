use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error as ThisError;

/// Location of the page templates relative to the working directory of the service.
pub const TEMPLATES_GLOB: &str = "tera_templates/**/*";

#[derive(Debug, ThisError)]
pub enum RenderError {
    #[error("Invalid view model for {template}")]
    InvalidModel {
        template: String,
        #[source]
        source: tera::Error,
    },
    #[error("Failed to render {template}")]
    Template {
        template: String,
        #[source]
        source: tera::Error,
    },
}

/// Render a named template with a key-value model into a html page.
pub trait ViewRenderer: Send + Sync {
    fn has_template(&self, template: &str) -> bool;

    fn render<M>(&self, template: &str, model: &M) -> Result<String, RenderError>
    where
        M: Serialize;
}

pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn new(tera: Tera) -> Self {
        Self { tera }
    }

    /// Load the templates matching the glob, html templates are auto-escaped.
    pub fn from_glob(glob: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::new(glob)?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self::new(tera))
    }
}

impl ViewRenderer for TeraRenderer {
    fn has_template(&self, template: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template)
    }

    fn render<M>(&self, template: &str, model: &M) -> Result<String, RenderError>
    where
        M: Serialize,
    {
        let context = Context::from_serialize(model).map_err(|source| RenderError::InvalidModel {
            template: template.to_owned(),
            source,
        })?;
        self.tera
            .render(template, &context)
            .map_err(|source| RenderError::Template {
                template: template.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        app_config::DEFAULT_SELECT_TEMPLATE,
        services::{SelectPageModel, SelectableProvider, SELECT_PAGE_TITLE},
    };
    use serde_json::json;
    use shine_test::test;

    fn renderer() -> TeraRenderer {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (
                "list.html",
                "<h1>{{ title }}</h1>{% for p in providers %}<a href=\"{{ p.redirect }}\">{{ p.linkText }}</a>{% endfor %}",
            ),
            ("broken.html", "{{ missing.value }}"),
        ])
        .unwrap();
        tera.autoescape_on(vec![".html"]);
        TeraRenderer::new(tera)
    }

    #[test]
    fn render_model() {
        let renderer = renderer();
        assert!(renderer.has_template("list.html"));
        assert!(!renderer.has_template("select-provider.html"));

        let model = json!({
            "title": "Pick <one>",
            "providers": [{ "linkText": "Acme", "redirect": "https://sp.example/x?idp=a" }]
        });
        let html = renderer.render("list.html", &model).unwrap();
        assert!(html.starts_with("<h1>Pick &lt;one&gt;</h1>"));
        assert!(html.contains(">Acme</a>"));
    }

    #[test]
    fn render_select_page() {
        let renderer = TeraRenderer::from_glob(TEMPLATES_GLOB).unwrap();
        assert!(renderer.has_template(DEFAULT_SELECT_TEMPLATE));

        let model = SelectPageModel {
            title: SELECT_PAGE_TITLE,
            providers: vec![
                SelectableProvider {
                    link_text: "A&B".into(),
                    redirect: "https://sp.example/saml/sp/discovery?lang=en&idp=ab".into(),
                },
                SelectableProvider {
                    link_text: "Globex".into(),
                    redirect: "https://sp.example/saml/sp/discovery?idp=globex".into(),
                },
            ],
        };
        let html = renderer.render(DEFAULT_SELECT_TEMPLATE, &model).unwrap();
        log::debug!("{html}");
        assert!(html.contains("<title>Select an Identity Provider</title>"));
        assert!(html.contains("<h1>Select an Identity Provider</h1>"));
        assert!(!html.contains("No identity provider"));

        let first = html.find(">A&amp;B</a>").unwrap();
        let second = html.find(">Globex</a>").unwrap();
        assert!(first < second);
        assert!(html.contains("?lang=en&amp;idp=ab\""));
        assert!(html.contains("?idp=globex\""));

        let empty = SelectPageModel {
            title: SELECT_PAGE_TITLE,
            providers: vec![],
        };
        let html = renderer.render(DEFAULT_SELECT_TEMPLATE, &empty).unwrap();
        assert!(html.contains("<h1>Select an Identity Provider</h1>"));
        assert!(html.contains("<p>No identity provider is available.</p>"));
        assert!(!html.contains("<a href"));
    }

    #[test]
    fn render_failures() {
        let renderer = renderer();
        let err = renderer.render("broken.html", &json!({})).unwrap_err();
        assert!(matches!(err, RenderError::Template { template, .. } if template == "broken.html"));

        let err = renderer.render("unknown.html", &json!({})).unwrap_err();
        assert!(matches!(err, RenderError::Template { .. }));

        // the model has to be a map
        let err = renderer.render("list.html", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, RenderError::InvalidModel { .. }));
    }
}
