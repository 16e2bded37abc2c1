use std::fmt;
use std::fs;
use std::path::Path;

use askama_escape::Escaper;
use askama::Template;

use crate::billing::BillingContext;
use crate::run::RunError;

#[derive(Template)]
#[template(path = "invoice.tex")]
struct InvoiceDoc<'a> {
    ctx: &'a BillingContext,
}

/// Render with the built-in layout.
pub fn render(ctx: &BillingContext) -> Result<String, askama::Error> {
    InvoiceDoc { ctx }.render()
}

/// Render into an external LaTeX layout. The layout carries `\VAR{name}`
/// placeholders for the context attributes; anything else passes through
/// untouched.
pub fn render_file(path: &Path, ctx: &BillingContext) -> Result<String, RunError> {
    if !path.is_file() {
        return Err(RunError::MissingTemplate {
            path: path.display().to_string(),
        });
    }
    let layout = fs::read_to_string(path)?;
    Ok(expand(&layout, ctx))
}

fn expand(layout: &str, ctx: &BillingContext) -> String {
    let mut rendered = layout.to_string();
    for (name, value) in ctx.attributes() {
        rendered = rendered.replace(&format!("\\VAR{{{}}}", name), &value);
    }
    rendered
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tex;

impl Escaper for Tex {
    fn write_escaped<W>(&self, mut fmt: W, string: &str) -> fmt::Result
    where
        W: fmt::Write,
    {
        for c in string.chars() {
            match c {
                '%' => fmt.write_str("\\%")?,
                '$' => fmt.write_str("\\$")?,
                _ => fmt.write_char(c)?,
            }
        }
        Ok(())
    }
}
