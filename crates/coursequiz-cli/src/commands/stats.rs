//! The `coursequiz stats` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coursequiz_core::model::{Difficulty, Question};
use coursequiz_core::parser;

/// Question counts for one row of the breakdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    basic: usize,
    intermediate: usize,
    advanced: usize,
    untagged: usize,
}

impl Counts {
    fn add(&mut self, question: &Question) {
        match question.difficulty {
            Some(Difficulty::Basic) => self.basic += 1,
            Some(Difficulty::Intermediate) => self.intermediate += 1,
            Some(Difficulty::Advanced) => self.advanced += 1,
            None => self.untagged += 1,
        }
    }

    fn total(&self) -> usize {
        self.basic + self.intermediate + self.advanced + self.untagged
    }

    fn row(&self, label: &str) -> Vec<Cell> {
        vec![
            Cell::new(label),
            Cell::new(self.total()),
            Cell::new(self.basic),
            Cell::new(self.intermediate),
            Cell::new(self.advanced),
            Cell::new(self.untagged),
        ]
    }
}

fn breakdown(questions: &[Question]) -> (BTreeMap<String, Counts>, Counts) {
    let mut by_section: BTreeMap<String, Counts> = BTreeMap::new();
    let mut totals = Counts::default();
    for question in questions {
        let section = question.section.clone().unwrap_or_else(|| "-".to_string());
        by_section.entry(section).or_default().add(question);
        totals.add(question);
    }
    (by_section, totals)
}

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = parser::parse_bank(&bank_path)?;
    let (by_section, totals) = breakdown(&bank.questions);

    println!("{} ({} questions)", bank.name, bank.questions.len());

    let mut table = Table::new();
    table.set_header(vec![
        "Section",
        "Questions",
        "Basic",
        "Intermediate",
        "Advanced",
        "Untagged",
    ]);
    for (section, counts) in &by_section {
        table.add_row(counts.row(section));
    }
    table.add_row(totals.row("Total"));
    println!("{table}");

    let mut topics: BTreeMap<&str, usize> = BTreeMap::new();
    for question in &bank.questions {
        if let Some(topic) = question.topic.as_deref() {
            *topics.entry(topic).or_default() += 1;
        }
    }
    if !topics.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Topic", "Questions"]);
        for (topic, count) in topics {
            table.add_row(vec![Cell::new(topic), Cell::new(count)]);
        }
        println!("{table}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64, section: Option<&str>, difficulty: Option<Difficulty>) -> Question {
        let mut q = Question::new(id, "Prompt", vec!["a".into(), "b".into()], 0, "");
        q.section = section.map(String::from);
        q.difficulty = difficulty;
        q
    }

    #[test]
    fn counts_by_section_and_difficulty() {
        let questions = vec![
            question(1, Some("1.1"), Some(Difficulty::Basic)),
            question(2, Some("1.1"), Some(Difficulty::Advanced)),
            question(3, Some("1.2"), Some(Difficulty::Basic)),
            question(4, None, None),
        ];
        let (by_section, totals) = breakdown(&questions);

        assert_eq!(by_section.len(), 3);
        assert_eq!(by_section["1.1"].total(), 2);
        assert_eq!(by_section["1.1"].advanced, 1);
        assert_eq!(by_section["-"].untagged, 1);
        assert_eq!(totals.basic, 2);
        assert_eq!(totals.total(), 4);
    }
}
