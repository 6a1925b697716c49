//! Template CLI commands

use anyhow::Result;

use super::output::Output;
use crate::storage::Site;
use crate::template::TemplateList;

/// Lists custom then default templates
pub fn list(output: &Output) -> Result<()> {
    let site = Site::open_current()?;
    let catalog = site.catalog()?;

    if output.is_json() {
        return output.data(&catalog);
    }

    let resolver = site.resolver()?;
    print_group(
        output,
        "Custom templates",
        &resolver.custom_dir().display().to_string(),
        catalog.custom.as_ref(),
    );
    output.blank();
    print_group(
        output,
        "Default templates",
        &resolver.default_dir().display().to_string(),
        catalog.default.as_ref(),
    );

    Ok(())
}

fn print_group(output: &Output, heading: &str, dir: &str, list: Option<&TemplateList>) {
    output.row(&[format!("{} ({})", heading, dir).as_str()]);

    match list {
        None => output.row(&["  (directory not readable)"]),
        Some(list) if list.is_empty() => output.row(&["  (none)"]),
        Some(list) => {
            for entry in list.values() {
                let identifier = format!("  {}", entry.identifier);
                let path = entry.path.display().to_string();
                if output.is_verbose() {
                    output.row(&[identifier.as_str(), entry.display.as_str(), path.as_str()]);
                } else {
                    output.row(&[identifier.as_str(), entry.display.as_str()]);
                }
            }
        }
    }
}

/// Prints the file a template name resolves to
pub fn resolve(output: &Output, name: &str) -> Result<()> {
    let site = Site::open_current()?;
    let resolver = site.resolver()?;

    let path = resolver
        .resolve(name)
        .ok_or_else(|| anyhow::anyhow!("Template not found: {}", name))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "template": name,
            "path": path,
        }))
    } else {
        output.row(&[path.display().to_string().as_str()]);
        Ok(())
    }
}
