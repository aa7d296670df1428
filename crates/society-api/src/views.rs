//! Handlebars page registry
//!
//! Templates are compiled into the binary and registered once at startup.

use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use thiserror::Error;

use society_core::domain::Month;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.hbs")),
    ("index", include_str!("../templates/index.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("admin/dashboard", include_str!("../templates/admin/dashboard.hbs")),
    ("admin/owners", include_str!("../templates/admin/owners.hbs")),
    ("admin/societies", include_str!("../templates/admin/societies.hbs")),
    ("admin/flats", include_str!("../templates/admin/flats.hbs")),
    ("admin/bills", include_str!("../templates/admin/bills.hbs")),
    ("owner/dashboard", include_str!("../templates/owner/dashboard.hbs")),
    ("owner/flats", include_str!("../templates/owner/flats.hbs")),
    ("owner/bills", include_str!("../templates/owner/bills.hbs")),
    ("owner/tenants", include_str!("../templates/owner/tenants.hbs")),
    ("tenant/dashboard", include_str!("../templates/tenant/dashboard.hbs")),
    ("tenant/flat", include_str!("../templates/tenant/flat.hbs")),
];

handlebars_helper!(month_label: |month: str| {
    Month::from_str(month).map(|m| m.label()).unwrap_or_else(|| month.to_string())
});

pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, ViewError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_helper("month_label", Box::new(month_label));
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, ViewError> {
        Ok(self.registry.render(name, data)?)
    }
}
