//! Runtime templates for pages, navigation pages, and content fragments.
//!
//! Templates are Jinja, rendered with minijinja. The page and nav templates
//! are compiled once per build into a single [`Environment`]; content
//! fragments are compiled on demand against the same environment, so they
//! share its filters and output rules:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `{{ title }}`, `{{ page.url }}` | interpolate a value |
//! | `{% for p in sub_pages %}…{% endfor %}` | iterate; `loop.index`, `loop.first`, `loop.last` are bound |
//! | `{% if logo and name %}…{% else %}…{% endif %}` | conditionals with Jinja tests and operators |
//! | `{{ title\|upper }}` | filters |
//! | `{# note #}` | comment |
//!
//! Every interpolated value is HTML-escaped unless it is marked safe. The
//! rendered page body handed to the page and nav templates as `content` is
//! safe; `{{ x|safe }}` opts a value out by hand. A missing value renders as
//! nothing, attribute access on it stays missing, and a missing loop source
//! iterates zero times.

use crate::artifact::TemplateRole;
use crate::context::Context;
use maud::html;
use minijinja::{Environment, Error as JinjaError, Output, State, UndefinedBehavior, Value, escape_formatter};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A template failed to compile or render; line details come from minijinja.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct TemplateError(#[from] JinjaError);

impl TemplateError {
    pub fn kind(&self) -> minijinja::ErrorKind {
        self.0.kind()
    }
}

fn template_name(role: TemplateRole) -> &'static str {
    match role {
        TemplateRole::Page => "page.html",
        TemplateRole::Nav => "nav.html",
    }
}

/// Escape everything that is not already marked safe; render null as nothing.
fn html_formatter(out: &mut Output<'_>, state: &State<'_, '_>, value: &Value) -> Result<(), JinjaError> {
    if value.is_undefined() || value.is_none() {
        return Ok(());
    }
    if value.is_safe() {
        return escape_formatter(out, state, value);
    }
    let escaped = html! { (value.to_string()) }.into_string();
    escape_formatter(out, state, &Value::from_safe_string(escaped))
}

/// Merge contexts in increasing priority order into one render scope.
fn scope(layers: &[&Context], content: Option<&str>) -> Value {
    let mut merged: BTreeMap<String, Value> = BTreeMap::new();
    for layer in layers {
        for (key, value) in layer.iter() {
            merged.insert(key.to_string(), Value::from_serialize(value));
        }
    }
    if let Some(content) = content {
        merged.insert("content".to_string(), Value::from_safe_string(content.to_string()));
    }
    Value::from(merged)
}

/// The compiled page and nav templates for one build.
pub struct Templates {
    env: Environment<'static>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates").finish_non_exhaustive()
    }
}

impl Templates {
    /// An environment with no templates registered yet.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.set_keep_trailing_newline(true);
        env.set_formatter(html_formatter);
        Self { env }
    }

    /// Compile and register the template for `role`.
    pub fn add(&mut self, role: TemplateRole, source: impl Into<String>) -> Result<(), TemplateError> {
        self.env.add_template_owned(template_name(role), source.into())?;
        Ok(())
    }

    /// Compile both templates at once.
    pub fn compile(page: &str, nav: &str) -> Result<Self, TemplateError> {
        let mut templates = Self::new();
        templates.add(TemplateRole::Page, page)?;
        templates.add(TemplateRole::Nav, nav)?;
        Ok(templates)
    }

    /// Render the template for `role` with `content` bound as safe HTML.
    pub fn render(&self, role: TemplateRole, layers: &[&Context], content: &str) -> Result<String, TemplateError> {
        let template = self.env.get_template(template_name(role))?;
        Ok(template.render(scope(layers, Some(content)))?)
    }

    /// Compile and render a one-off template such as a page's own content.
    pub fn render_fragment(&self, source: &str, layers: &[&Context]) -> Result<String, TemplateError> {
        Ok(self.env.render_str(source, scope(layers, None))?)
    }
}
