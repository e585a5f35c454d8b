use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::scene::TableScene;

pub const SVG_PLACEHOLDER: &str = "{{ svg }}";
pub const SCRIPT_PLACEHOLDER: &str = "{{ script }}";

pub fn render_page(template: &str, svg: &str, script: &str) -> String {
    template
        .replace(SCRIPT_PLACEHOLDER, script)
        .replace(SVG_PLACEHOLDER, svg)
}

/// Assemble the page served at `/` from `templates/index.html` and
/// `static/table.js` under `asset_root`.
pub fn load_page(asset_root: &Path, scene: &TableScene) -> Result<String> {
    let template_path = asset_root.join("templates").join("index.html");
    let template = fs::read_to_string(&template_path)
        .with_context(|| format!("failed to read {}", template_path.display()))?;
    let script_path = asset_root.join("static").join("table.js");
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read {}", script_path.display()))?;
    let svg = scene
        .to_svg_string()
        .context("failed to serialize table scene")?;
    Ok(render_page(&template, &svg, &script))
}
