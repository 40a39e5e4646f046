//! The `coursequiz render` command.

use std::path::PathBuf;

use anyhow::Result;

use coursequiz_core::parser;
use coursequiz_render::{html, text};

pub fn execute(page_path: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let page = parser::parse_page(&page_path)?;

    let rendered = match format.as_str() {
        "text" | "txt" => text::render_page_text(&page),
        "html" => html::generate_page_html(&page),
        other => anyhow::bail!("unknown format: {other} (expected text or html)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)?;
            eprintln!("Rendered {} to: {}", page.meta.id, path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
