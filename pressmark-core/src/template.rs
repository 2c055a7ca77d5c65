use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::site::Page;

const SHELL_NAME: &str = "page.html";

/// The one HTML document every page is rendered into. The `.html` template
/// name turns on tera's autoescaping, so the title is escaped while the body
/// goes through `safe`.
const SHELL: &str = r#"<!DOCTYPE html>
<html>
<head>
	<meta charset="UTF-8">
	<title>{{ title }}</title>
</head>
<body>
{{ body | safe }}
</body>
</html>
"#;

#[derive(Debug, Error)]
#[error("template error")]
pub struct TemplateError(#[from] tera::Error);

#[derive(Serialize)]
struct ShellContext<'a> {
    title: &'a str,
    body: &'a str,
}

pub struct PageShell {
    tera: Tera,
}

impl PageShell {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_template(SHELL_NAME, SHELL)?;

        Ok(Self { tera })
    }

    /// Render a page into a complete HTML document
    pub fn render(&self, page: &Page) -> Result<String, TemplateError> {
        let context = Context::from_serialize(ShellContext {
            title: &page.title,
            body: &page.body,
        })?;

        Ok(self.tera.render(SHELL_NAME, &context)?)
    }
}
