use asvs::{Level, Standard};
use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, Parser)]
#[command(about = "Summarise chapters, sections and level coverage")]
pub struct Summary {}

impl Summary {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, standard: &Standard) {
        println!(
            "{} chapters, {} sections, {} requirements",
            standard.chapters().len(),
            standard.sections().count(),
            standard.len()
        );

        let per_level: Vec<_> = Level::ALL
            .into_iter()
            .map(|level| {
                let count = standard
                    .requirements()
                    .filter(|view| view.requirement.levels().contains(level))
                    .count();
                format!("{}: {count}", level.to_string().success())
            })
            .collect();
        println!("{}\n", per_level.join("  "));

        for chapter in standard.chapters() {
            let sections = standard
                .sections()
                .filter(|view| view.chapter.id() == chapter.id())
                .count();
            let requirements = standard
                .requirements()
                .filter(|view| view.chapter.id() == chapter.id())
                .count();
            println!(
                "{:<5} {} {}",
                chapter.unique_id().info(),
                chapter.name(),
                format!("({sections} sections, {requirements} requirements)").dim()
            );
        }
    }
}
