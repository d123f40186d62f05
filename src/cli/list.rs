use asvs::{Level, RequirementView, Standard, domain::ChapterId};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::instrument;

use super::terminal::{Colorize, terminal_width, truncate};

const DEFAULT_WIDTH: usize = 100;

/// Command arguments for `asvs list`.
#[derive(Debug, Parser)]
#[command(about = "List requirements with filters")]
pub struct List {
    /// Show only requirements that apply to this level (1, 2 or 3).
    #[arg(long)]
    level: Option<Level>,

    /// Show only requirements in this chapter (e.g. V2).
    #[arg(long)]
    chapter: Option<ChapterId>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Limit number of rows returned.
    #[arg(long)]
    limit: Option<usize>,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip(standard))]
    pub fn run(self, standard: &Standard) -> anyhow::Result<()> {
        let rows = self.select(standard);
        tracing::debug!(rows = rows.len(), "filtered requirements");

        match self.output {
            OutputFormat::Table => render_table(&rows),
            OutputFormat::Json => render_json(&rows)?,
        }
        Ok(())
    }

    /// Requirements passing every filter, in row order, up to the limit.
    pub(super) fn select<'a>(&self, standard: &'a Standard) -> Vec<RequirementView<'a>> {
        standard
            .requirements()
            .filter(|view| self.matches(view))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }

    pub(super) fn matches(&self, view: &RequirementView) -> bool {
        self.level
            .is_none_or(|level| view.requirement.levels().contains(level))
            && self
                .chapter
                .as_ref()
                .is_none_or(|chapter| view.chapter.id() == chapter)
    }
}

fn render_table(rows: &[RequirementView]) {
    if rows.is_empty() {
        println!("No requirements match.");
        return;
    }

    let ids: Vec<_> = rows.iter().map(RequirementView::unique_id).collect();
    let id_width = ids.iter().map(String::len).max().unwrap_or(0);
    let levels_width = "L1,L2,L3".len();
    let width = terminal_width().map_or(DEFAULT_WIDTH, usize::from);
    let description_width = width.saturating_sub(id_width + levels_width + 4).max(20);

    println!(
        "{}",
        format!(
            "{:<id_width$}  {:<levels_width$}  DESCRIPTION",
            "ID", "LEVELS"
        )
        .dim()
    );
    for (view, id) in rows.iter().zip(ids) {
        println!(
            "{}  {}  {}",
            format!("{id:<id_width$}").info(),
            format!("{:<levels_width$}", view.requirement.levels().to_string()).success(),
            truncate(view.requirement.description(), description_width)
        );
    }
}

fn render_json(rows: &[RequirementView]) -> anyhow::Result<()> {
    let entries: Vec<_> = rows
        .iter()
        .map(|view| {
            let requirement = view.requirement;
            json!({
                "id": view.unique_id(),
                "chapter": view.chapter.unique_id(),
                "section": view.section_view().unique_id(),
                "description": requirement.description(),
                "link": requirement.link(),
                "levels": requirement.levels().iter().map(Level::number).collect::<Vec<_>>(),
                "cwe": requirement.cwe(),
                "nist": requirement.nist(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
