//! Projects command: prints the project list as a tree.

use std::io::Write;

use anyhow::{Context, Result};
use tl_core::ProjectTree;

use crate::Config;

/// Writes every project, indented two spaces per level.
pub fn render<W: Write>(writer: &mut W, tree: &ProjectTree) -> std::io::Result<()> {
    for row in tree.rows() {
        let indent = "  ".repeat(row.depth);
        writeln!(writer, "{indent}{}", tree.node(row.id).label)?;
    }
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let mut tree = ProjectTree::load(&config.project_list_path)
        .context("set `project_list_path` in the config file or TL_PROJECT_LIST_PATH")?;

    if tree.is_empty() {
        writeln!(writer, "No projects.")?;
        return Ok(());
    }

    tree.expand_all();
    render(writer, &tree)?;
    Ok(())
}
