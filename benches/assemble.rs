//! Assembles a synthetic standard far larger than the published one, both
//! from pre-decoded rows and from CSV text.

#![allow(missing_docs)]

use asvs::{Config, RawRow, Standard};
use criterion::{Criterion, criterion_group, criterion_main};

const CHAPTERS: u32 = 50;
const SECTIONS: u32 = 20;
const REQUIREMENTS: u32 = 20;

fn rows() -> Vec<RawRow> {
    let mut rows = Vec::new();
    for chapter in 1..=CHAPTERS {
        for section in 1..=SECTIONS {
            for requirement in 1..=REQUIREMENTS {
                rows.push(RawRow {
                    chapter_id: format!("V{chapter}"),
                    chapter_name: format!("Chapter {chapter}"),
                    section_id: format!("V{chapter}.{section}"),
                    section_name: format!("Section {section}"),
                    req_id: format!("V{chapter}.{section}.{requirement}"),
                    req_description: format!(
                        "Verify property {requirement}. ([C{section}](https://owasp.org/c{section}))"
                    ),
                    levels: [
                        if requirement % 3 == 0 { "✓" } else { "" }.to_string(),
                        "✓".to_string(),
                        "✓".to_string(),
                    ],
                    cwe: requirement.to_string(),
                    nist: String::new(),
                });
            }
        }
    }
    rows
}

fn csv_text(rows: &[RawRow]) -> String {
    let mut text = String::from(
        "chapter_id,chapter_name,section_id,section_name,req_id,req_description,level1,level2,level3,cwe,nist\n",
    );
    for row in rows {
        text.push_str(&format!(
            "{},{},{},{},{},\"{}\",{},{},{},{},{}\n",
            row.chapter_id,
            row.chapter_name,
            row.section_id,
            row.section_name,
            row.req_id,
            row.req_description,
            row.levels[0],
            row.levels[1],
            row.levels[2],
            row.cwe,
            row.nist,
        ));
    }
    text
}

fn assemble(c: &mut Criterion) {
    let config = Config::default();
    let rows = rows();
    let text = csv_text(&rows);

    c.bench_function("assemble rows", |b| {
        b.iter(|| Standard::from_rows(&rows, &config).unwrap());
    });

    c.bench_function("read csv", |b| {
        b.iter(|| asvs::storage::read(text.as_bytes(), &config).unwrap());
    });
}

criterion_group!(benches, assemble);
criterion_main!(benches);
