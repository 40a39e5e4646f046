//! Plain-text rendering for terminals.

use coursequiz_core::inline_check::InlineCheck;
use coursequiz_core::model::Question;
use coursequiz_core::page::{Faq, NavLink, Page, Section, WorkedExample};
use coursequiz_core::scoring::Outcome;
use coursequiz_core::session::{QuizSession, SessionSummary};

const RULE: &str = "------------------------------------------------------------";

/// Option list with answer markers once the question is revealed.
fn option_lines(question: &Question, selected: Option<usize>, revealed: bool) -> String {
    let mut out = String::new();
    for (i, option) in question.options.iter().enumerate() {
        let marker = match (revealed, selected) {
            (true, _) if question.is_correct(i) => "✓",
            (true, Some(s)) if s == i => "✗",
            _ => " ",
        };
        out.push_str(&format!("  {marker} {}) {option}\n", i + 1));
    }
    out
}

fn explanation_block(question: &Question) -> String {
    if question.explanation.is_empty() {
        String::new()
    } else {
        format!("\n  {}\n", question.explanation)
    }
}

/// One-line verdict for an answer.
pub fn feedback_line(question: &Question, selected: usize) -> String {
    if question.is_correct(selected) {
        "Correct!".to_string()
    } else {
        format!(
            "Incorrect. The correct answer is {}) {}.",
            question.correct_index + 1,
            question.correct_option().unwrap_or_default()
        )
    }
}

/// The current state of one quiz question.
pub fn question_card(session: &QuizSession, index: usize) -> String {
    let Some(question) = session.questions().get(index) else {
        return String::new();
    };
    let selected = session.answer_for(index);
    let revealed = session.is_revealed(index);

    let mut out = format!("\nQuestion {} of {}", index + 1, session.len());
    if session.is_flagged(index) {
        out.push_str(" [flagged]");
    }
    out.push('\n');
    out.push_str(&format!("{}\n", question.prompt));
    out.push_str(&option_lines(question, selected, revealed));
    if revealed {
        if let Some(s) = selected {
            out.push_str(&format!("\n{}\n", feedback_line(question, s)));
        }
        out.push_str(&explanation_block(question));
    }
    out
}

/// The current state of an inline check.
pub fn check_card(check: &InlineCheck) -> String {
    let question = check.question();
    let mut out = String::from("\nQuick check\n");
    out.push_str(&format!("{}\n", question.prompt));
    out.push_str(&option_lines(question, check.selected(), check.is_revealed()));
    if let Some(s) = check.selected() {
        out.push_str(&format!("\n{}\n", feedback_line(question, s)));
        out.push_str(&explanation_block(question));
    }
    out
}

pub fn summary_line(summary: &SessionSummary) -> String {
    format!(
        "{} answered, {} unanswered, {} flagged",
        summary.answered, summary.unanswered, summary.flagged
    )
}

/// Final score with grade feedback.
pub fn outcome_text(outcome: &Outcome, pass_mark: u8) -> String {
    let verdict = if outcome.passed(pass_mark) {
        "PASSED"
    } else {
        "NOT PASSED"
    };
    format!(
        "\nScore: {}/{} ({}%) {verdict} (pass mark {pass_mark}%)\n{}\n",
        outcome.correct,
        outcome.total,
        outcome.percentage,
        outcome.grade().message()
    )
}

/// Title block: course breadcrumb, title and description.
pub fn page_header(page: &Page) -> String {
    let mut out = String::new();
    let crumbs: Vec<&str> = [page.meta.course.as_deref(), page.meta.module.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !crumbs.is_empty() {
        out.push_str(&format!("{}\n", crumbs.join(" / ")));
    }
    let underline = "=".repeat(page.meta.title.chars().count());
    out.push_str(&format!("{}\n{underline}\n", page.meta.title));
    if !page.meta.description.is_empty() {
        out.push_str(&format!("{}\n", page.meta.description));
    }
    out
}

/// Summary boxes and the learning outcomes checklist.
pub fn page_intro(page: &Page) -> String {
    let mut out = String::new();
    for summary in &page.summary {
        out.push_str(&format!("\n[{}]\n", summary.title));
        for point in &summary.points {
            out.push_str(&format!("  - {point}\n"));
        }
    }
    if !page.outcomes.is_empty() {
        out.push_str("\nLearning outcomes\n");
        for outcome in &page.outcomes {
            out.push_str(&format!("  [ ] {outcome}\n"));
        }
    }
    out
}

pub fn section_text(section: &Section) -> String {
    let mut out = format!("\n{RULE}\n{}. {}\n\n", section.number, section.title);
    for paragraph in &section.paragraphs {
        out.push_str(&format!("{paragraph}\n\n"));
    }
    out
}

pub fn worked_examples_text(examples: &[WorkedExample]) -> String {
    if examples.is_empty() {
        return String::new();
    }
    let mut out = format!("\n{RULE}\nWorked examples\n");
    for example in examples {
        out.push_str(&format!("\n{}\n", example.title));
        if !example.scenario.is_empty() {
            out.push_str(&format!("{}\n", example.scenario));
        }
        for (i, step) in example.steps.iter().enumerate() {
            out.push_str(&format!("  {}. {step}\n", i + 1));
        }
        if !example.result.is_empty() {
            out.push_str(&format!("Result: {}\n", example.result));
        }
    }
    out
}

pub fn faqs_text(faqs: &[Faq]) -> String {
    if faqs.is_empty() {
        return String::new();
    }
    let mut out = format!("\n{RULE}\nFrequently asked questions\n");
    for faq in faqs {
        out.push_str(&format!("\nQ: {}\nA: {}\n", faq.question, faq.answer));
    }
    out
}

fn nav_link(label: &str, link: &Option<NavLink>) -> Option<String> {
    link.as_ref()
        .map(|l| format!("{label}: {} ({})", l.label, l.path))
}

pub fn nav_text(page: &Page) -> String {
    let links: Vec<String> = [
        nav_link("Previous", &page.nav.previous),
        nav_link("Next", &page.nav.next),
    ]
    .into_iter()
    .flatten()
    .collect();
    if links.is_empty() {
        String::new()
    } else {
        format!("\n{RULE}\n{}\n", links.join("\n"))
    }
}

/// The whole page as static text. Inline checks and the quiz are listed
/// without their answers.
pub fn render_page_text(page: &Page) -> String {
    let mut out = page_header(page);
    out.push_str(&page_intro(page));

    for section in &page.sections {
        out.push_str(&section_text(section));
        if let Some(question) = section.check.as_ref().and_then(|id| page.check(id)) {
            out.push_str("Quick check\n");
            out.push_str(&format!("{}\n", question.prompt));
            out.push_str(&option_lines(question, None, false));
        }
    }

    out.push_str(&worked_examples_text(&page.worked_examples));
    out.push_str(&faqs_text(&page.faqs));

    if let Some(quiz) = &page.quiz {
        out.push_str(&format!(
            "\n{RULE}\n{} ({} questions)\n",
            quiz.title,
            quiz.questions.len()
        ));
    }

    out.push_str(&nav_text(page));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursequiz_core::page::{Navigation, PageMeta, PageQuiz, SummaryBox};

    fn question() -> Question {
        Question::new(
            1,
            "Which test comes first?",
            vec!["Insulation".into(), "Continuity".into(), "RCD".into()],
            1,
            "Continuity is proven before insulation resistance.",
        )
    }

    fn page() -> Page {
        let mut check = question();
        check.id = "check-1".into();
        Page {
            meta: PageMeta {
                id: "it-1".into(),
                title: "Testing Sequence".into(),
                description: "Order of tests".into(),
                course: Some("Inspection & Testing".into()),
                module: Some("Module 1".into()),
            },
            summary: vec![SummaryBox {
                title: "In 30 seconds".into(),
                points: vec!["Dead tests before live tests".into()],
            }],
            outcomes: vec!["State the test order".into()],
            sections: vec![Section {
                number: 1,
                title: "Dead tests".into(),
                paragraphs: vec!["Continuity first.".into()],
                check: Some("check-1".into()),
            }],
            checks: vec![check],
            worked_examples: vec![WorkedExample {
                title: "Ring final".into(),
                scenario: "A 32A ring".into(),
                steps: vec!["Measure end-to-end".into()],
                result: "r1 = 0.5".into(),
            }],
            faqs: vec![Faq {
                question: "Why continuity first?".into(),
                answer: "Later tests rely on it.".into(),
            }],
            quiz: Some(PageQuiz {
                title: "Section 1 Knowledge Check".into(),
                questions: vec![question()],
            }),
            nav: Navigation {
                previous: None,
                next: Some(NavLink {
                    label: "Section 2".into(),
                    path: "../it-2".into(),
                }),
            },
        }
    }

    #[test]
    fn question_card_hides_answer_until_revealed() {
        let mut session = QuizSession::new(vec![question()]).unwrap();
        let before = question_card(&session, 0);
        assert!(before.contains("Question 1 of 1"));
        assert!(before.contains("2) Continuity"));
        assert!(!before.contains('✓'));
        assert!(!before.contains("proven before"));

        session.select_option(0, 0);
        let after = question_card(&session, 0);
        assert!(after.contains("✗ 1) Insulation"));
        assert!(after.contains("✓ 2) Continuity"));
        assert!(after.contains("Incorrect. The correct answer is 2) Continuity."));
        assert!(after.contains("proven before"));
    }

    #[test]
    fn check_card_reveals_on_answer() {
        let mut check = InlineCheck::new(question()).unwrap();
        assert!(!check_card(&check).contains("Correct!"));
        check.select_option(1);
        let card = check_card(&check);
        assert!(card.contains("Correct!"));
        assert!(card.contains("proven before"));
    }

    #[test]
    fn outcome_text_reports_pass() {
        let text = outcome_text(&Outcome::new(8, 10), 80);
        assert!(text.contains("8/10 (80%) PASSED"));
        let text = outcome_text(&Outcome::new(1, 10), 80);
        assert!(text.contains("NOT PASSED"));
    }

    #[test]
    fn page_text_contains_every_part() {
        let text = render_page_text(&page());
        assert!(text.contains("Inspection & Testing / Module 1"));
        assert!(text.contains("[In 30 seconds]"));
        assert!(text.contains("[ ] State the test order"));
        assert!(text.contains("1. Dead tests"));
        assert!(text.contains("Quick check"));
        assert!(text.contains("Worked examples"));
        assert!(text.contains("Q: Why continuity first?"));
        assert!(text.contains("Section 1 Knowledge Check (1 questions)"));
        assert!(text.contains("Next: Section 2 (../it-2)"));
        // Static text never gives away the answer.
        assert!(!text.contains("proven before"));
    }
}
