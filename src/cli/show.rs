use asvs::{
    Chapter, Level, RequirementView, SectionView, Standard,
    domain::{ChapterId, RequirementId, SectionId},
};
use clap::Parser;
use serde_json::json;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display a chapter, section or requirement")]
pub struct Show {
    /// The unique id to display, e.g. V2, V2.1 or V2.1.3
    id: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// An entity found by its unique id.
pub(super) enum Found<'a> {
    Chapter(&'a Chapter),
    Section(SectionView<'a>),
    Requirement(RequirementView<'a>),
}

impl Show {
    #[instrument(level = "debug", skip(standard))]
    pub fn run(self, standard: &Standard) -> anyhow::Result<()> {
        let Some(found) = find(standard, &self.id)? else {
            anyhow::bail!("{} not found", self.id);
        };

        match self.output {
            OutputFormat::Pretty => output_pretty(standard, &found),
            OutputFormat::Json => output_json(standard, &found)?,
        }
        Ok(())
    }
}

/// Resolve `id` by the number of dotted components it has.
///
/// Tokens are normalised first, so `V02.1` finds `V2.1`.
pub(super) fn find<'a>(standard: &'a Standard, id: &str) -> anyhow::Result<Option<Found<'a>>> {
    let found = match id.matches('.').count() {
        0 => {
            let id = id.parse::<ChapterId>()?.to_string();
            standard
                .chapters()
                .iter()
                .find(|chapter| chapter.unique_id() == id)
                .map(Found::Chapter)
        }
        1 => {
            let id = id.parse::<SectionId>()?.to_string();
            standard
                .sections()
                .find(|view| view.unique_id() == id)
                .map(Found::Section)
        }
        _ => {
            let id = id.parse::<RequirementId>()?.to_string();
            standard
                .requirements()
                .find(|view| view.unique_id() == id)
                .map(Found::Requirement)
        }
    };
    Ok(found)
}

fn output_pretty(standard: &Standard, found: &Found) {
    match found {
        Found::Chapter(chapter) => {
            println!("# {} {}", chapter.unique_id().info(), chapter.name());
            println!("\n{}", "Sections".dim());
            for view in standard
                .sections()
                .filter(|view| view.chapter.id() == chapter.id())
            {
                println!("  • {} {}", view.unique_id().info(), view.section.name());
            }
        }
        Found::Section(section) => {
            let id = section.unique_id();
            println!("# {} {}", id.info(), section.section.name());
            println!("  Chapter: {} {}", section.chapter.unique_id(), section.chapter.name());
            println!("\n{}", "Requirements".dim());
            for view in standard
                .requirements()
                .filter(|view| view.section_view().unique_id() == id)
            {
                println!(
                    "  • {} [{}] {}",
                    view.unique_id().info(),
                    view.requirement.levels().to_string().success(),
                    view.requirement.description()
                );
            }
        }
        Found::Requirement(view) => {
            let requirement = view.requirement;
            println!("# {}", view.unique_id().info());
            println!("{}\n", requirement.description());

            println!("{}", "Metadata".dim());
            println!("  Chapter: {} {}", view.chapter.unique_id(), view.chapter.name());
            println!(
                "  Section: {} {}",
                view.section_view().unique_id(),
                view.section.name()
            );
            let levels = requirement.levels();
            if levels.is_empty() {
                println!("  Levels:  {}", "none".dim());
            } else {
                println!("  Levels:  {}", levels.to_string().success());
            }
            if let Some(cwe) = requirement.cwe() {
                println!("  CWE:     {cwe}");
            }
            if let Some(nist) = requirement.nist() {
                println!("  NIST:    {nist}");
            }
            if let Some(link) = requirement.link() {
                println!("  Link:    {link}");
            }
        }
    }
}

fn output_json(standard: &Standard, found: &Found) -> anyhow::Result<()> {
    let output = match found {
        Found::Chapter(chapter) => {
            let sections: Vec<_> = standard
                .sections()
                .filter(|view| view.chapter.id() == chapter.id())
                .map(|view| view.unique_id())
                .collect();
            json!({
                "id": chapter.unique_id(),
                "name": chapter.name(),
                "sections": sections,
            })
        }
        Found::Section(section) => {
            let id = section.unique_id();
            let requirements: Vec<_> = standard
                .requirements()
                .filter(|view| view.section_view().unique_id() == id)
                .map(|view| view.unique_id())
                .collect();
            json!({
                "id": id,
                "name": section.section.name(),
                "chapter": section.chapter.unique_id(),
                "requirements": requirements,
            })
        }
        Found::Requirement(view) => {
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
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
