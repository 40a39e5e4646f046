//! HTML output for course pages and attempt reports.
//!
//! Every document is self-contained with its CSS and JS inlined. Page quizzes
//! run client-side with the same rules as the terminal session: one question
//! at a time, the first answer is final, Next stays disabled until the
//! current question is answered.

use anyhow::{Context, Result};
use std::path::Path;

use coursequiz_core::model::Question;
use coursequiz_core::page::{Page, Section};
use coursequiz_core::report::AttemptReport;
use coursequiz_core::session::QuestionStatus;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn document_head(html: &mut String, title: &str, description: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    if !description.is_empty() {
        html.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            html_escape(description)
        ));
    }
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Answer buttons for one question. The correct index travels in a data
/// attribute so the page script can reveal it after the first click.
fn option_buttons(question: &Question) -> String {
    let mut out = String::from("<ol class=\"options\">\n");
    for (i, option) in question.options.iter().enumerate() {
        out.push_str(&format!(
            "<li><button type=\"button\" class=\"option\" data-index=\"{i}\">{}</button></li>\n",
            html_escape(option)
        ));
    }
    out.push_str("</ol>\n");
    out
}

fn inline_check_block(question: &Question) -> String {
    let mut out = format!(
        "<div class=\"inline-check\" data-question=\"{}\" data-correct=\"{}\">\n",
        html_escape(&question.id.to_string()),
        question.correct_index
    );
    out.push_str("<p class=\"label\">Quick check</p>\n");
    out.push_str(&format!("<p class=\"prompt\">{}</p>\n", html_escape(&question.prompt)));
    out.push_str(&option_buttons(question));
    out.push_str("<p class=\"feedback\" hidden></p>\n");
    out.push_str(&format!(
        "<p class=\"explanation\" hidden>{}</p>\n",
        html_escape(&question.explanation)
    ));
    out.push_str("</div>\n");
    out
}

fn section_block(page: &Page, section: &Section) -> String {
    let mut out = format!(
        "<section class=\"content\" id=\"section-{}\">\n<h2><span class=\"number\">{}</span> {}</h2>\n",
        section.number,
        section.number,
        html_escape(&section.title)
    );
    for paragraph in &section.paragraphs {
        out.push_str(&format!("<p>{}</p>\n", html_escape(paragraph)));
    }
    if let Some(question) = section.check.as_ref().and_then(|id| page.check(id)) {
        out.push_str(&inline_check_block(question));
    }
    out.push_str("</section>\n");
    out
}

/// Quiz questions as JSON for the page script. `</` is escaped so the data
/// cannot close its own script element.
fn quiz_data(questions: &[Question]) -> String {
    serde_json::to_string(questions)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c")
}

/// Generate a complete course page.
pub fn generate_page_html(page: &Page) -> String {
    let mut html = String::new();
    document_head(&mut html, &page.meta.title, &page.meta.description);

    // Header
    html.push_str("<header>\n");
    let crumbs: Vec<String> = [page.meta.course.as_deref(), page.meta.module.as_deref()]
        .into_iter()
        .flatten()
        .map(html_escape)
        .collect();
    if !crumbs.is_empty() {
        html.push_str(&format!("<p class=\"meta\">{}</p>\n", crumbs.join(" / ")));
    }
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&page.meta.title)));
    if !page.meta.description.is_empty() {
        html.push_str(&format!(
            "<p class=\"lead\">{}</p>\n",
            html_escape(&page.meta.description)
        ));
    }
    html.push_str("</header>\n<main>\n");

    for summary in &page.summary {
        html.push_str(&format!(
            "<aside class=\"summary\">\n<h3>{}</h3>\n<ul>\n",
            html_escape(&summary.title)
        ));
        for point in &summary.points {
            html.push_str(&format!("<li>{}</li>\n", html_escape(point)));
        }
        html.push_str("</ul>\n</aside>\n");
    }

    if !page.outcomes.is_empty() {
        html.push_str("<section class=\"outcomes\">\n<h2>Learning outcomes</h2>\n<ul>\n");
        for outcome in &page.outcomes {
            html.push_str(&format!(
                "<li><label><input type=\"checkbox\"> {}</label></li>\n",
                html_escape(outcome)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    for section in &page.sections {
        html.push_str(&section_block(page, section));
    }

    if !page.worked_examples.is_empty() {
        html.push_str("<section class=\"worked-examples\">\n<h2>Worked examples</h2>\n");
        for example in &page.worked_examples {
            html.push_str(&format!(
                "<article class=\"example\">\n<h3>{}</h3>\n",
                html_escape(&example.title)
            ));
            if !example.scenario.is_empty() {
                html.push_str(&format!("<p>{}</p>\n", html_escape(&example.scenario)));
            }
            if !example.steps.is_empty() {
                html.push_str("<ol>\n");
                for step in &example.steps {
                    html.push_str(&format!("<li>{}</li>\n", html_escape(step)));
                }
                html.push_str("</ol>\n");
            }
            if !example.result.is_empty() {
                html.push_str(&format!(
                    "<p class=\"result\"><strong>Result:</strong> {}</p>\n",
                    html_escape(&example.result)
                ));
            }
            html.push_str("</article>\n");
        }
        html.push_str("</section>\n");
    }

    if !page.faqs.is_empty() {
        html.push_str("<section class=\"faqs\">\n<h2>Frequently asked questions</h2>\n<dl>\n");
        for faq in &page.faqs {
            html.push_str(&format!(
                "<dt>{}</dt>\n<dd>{}</dd>\n",
                html_escape(&faq.question),
                html_escape(&faq.answer)
            ));
        }
        html.push_str("</dl>\n</section>\n");
    }

    if let Some(quiz) = &page.quiz {
        html.push_str("<section class=\"quiz\" id=\"quiz\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", html_escape(&quiz.title)));
        html.push_str("<p class=\"progress\"></p>\n");
        html.push_str("<div class=\"quiz-body\"></div>\n");
        html.push_str(
            "<div class=\"quiz-controls\"><button type=\"button\" class=\"next\" disabled>Next</button></div>\n",
        );
        html.push_str(
            "<div class=\"quiz-result\" hidden><p class=\"score\"></p><button type=\"button\" class=\"restart\">Try again</button></div>\n",
        );
        html.push_str(&format!(
            "<script type=\"application/json\" id=\"quiz-data\">{}</script>\n",
            quiz_data(&quiz.questions)
        ));
        html.push_str("</section>\n");
    }

    html.push_str("</main>\n");

    if page.nav.previous.is_some() || page.nav.next.is_some() {
        html.push_str("<nav class=\"page-nav\">\n");
        if let Some(link) = &page.nav.previous {
            html.push_str(&format!(
                "<a class=\"previous\" href=\"{}\">&larr; {}</a>\n",
                html_escape(&link.path),
                html_escape(&link.label)
            ));
        }
        if let Some(link) = &page.nav.next {
            html.push_str(&format!(
                "<a class=\"next\" href=\"{}\">{} &rarr;</a>\n",
                html_escape(&link.path),
                html_escape(&link.label)
            ));
        }
        html.push_str("</nav>\n");
    }

    html.push_str("<script>\n");
    html.push_str(PAGE_JS);
    html.push_str("</script>\n");
    html.push_str("</body>\n</html>");
    html
}

/// Write a course page to a file.
pub fn write_page_html(page: &Page, path: &Path) -> Result<()> {
    write_document(&generate_page_html(page), path)
}

/// Generate an attempt report with a score bar and per-question table.
pub fn generate_attempt_html(report: &AttemptReport) -> String {
    let mut html = String::new();
    let title = format!("{} results", report.source.name);
    document_head(&mut html, &title, "");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.source.name)));
    html.push_str(&format!(
        "<p class=\"meta\">{} questions | pass mark {}% | {}</p>\n",
        report.outcome.total,
        report.pass_mark,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n<main>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str(&format!(
        "<p class=\"score {}\">{}/{} ({}%) {}{}</p>\n",
        if report.passed { "pass" } else { "fail" },
        report.outcome.correct,
        report.outcome.total,
        report.outcome.percentage,
        if report.passed { "Passed" } else { "Not passed" },
        if report.timed_out { " (time expired)" } else { "" }
    ));
    html.push_str(&format!("<p>{}</p>\n", html_escape(report.grade.message())));
    html.push_str(&score_bar(report.outcome.percentage, report.pass_mark));
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n<h2>Answers</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str(
        "<thead><tr><th>#</th><th>Question</th><th>Answer</th><th>Correct</th><th>Result</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");
    for (i, answer) in report.answers.iter().enumerate() {
        let (class, text) = match answer.status {
            QuestionStatus::Correct => ("pass", "correct"),
            QuestionStatus::Incorrect => ("fail", "incorrect"),
            QuestionStatus::Unanswered => ("skip", "unanswered"),
        };
        let selected = answer
            .selected
            .map(|s| (s + 1).to_string())
            .unwrap_or_else(|| "-".to_string());
        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}{}</td><td>{selected}</td><td>{}</td><td>{text}</td></tr>\n",
            i + 1,
            html_escape(&answer.prompt),
            if answer.flagged { " <span class=\"flag\">flagged</span>" } else { "" },
            answer.correct_index + 1,
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</main>\n</body>\n</html>");
    html
}

/// Write an attempt report to a file.
pub fn write_attempt_html(report: &AttemptReport, path: &Path) -> Result<()> {
    write_document(&generate_attempt_html(report), path)
}

fn write_document(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Horizontal score bar with a marker at the pass mark.
fn score_bar(percentage: u8, pass_mark: u8) -> String {
    let max_width = 400usize;
    let height = 30usize;
    let width = usize::from(percentage) * max_width / 100;
    let mark_x = usize::from(pass_mark) * max_width / 100;

    let color = if percentage >= pass_mark {
        "#22c55e"
    } else if percentage >= 40 {
        "#eab308"
    } else {
        "#ef4444"
    };

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width + 60,
        height + 10
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"5\" width=\"{max_width}\" height=\"{height}\" fill=\"var(--border)\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"5\" width=\"{width}\" height=\"{height}\" fill=\"{color}\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <line x1=\"{mark_x}\" y1=\"0\" x2=\"{mark_x}\" y2=\"{}\" stroke=\"currentColor\" stroke-width=\"2\"/>\n",
        height + 10
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{percentage}%</text>\n",
        max_width + 8,
        5 + height / 2
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --accent: #2563eb; --pass: #dcfce7; --fail: #fde2e2; --skip: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --accent: #60a5fa; --pass: #064e3b; --fail: #7f1d1d; --skip: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 52rem; padding: 2rem; background: var(--bg); color: var(--fg); line-height: 1.6; }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.lead { font-size: 1.15rem; }
.summary { border-left: 4px solid var(--accent); padding: 0.5rem 1rem; margin: 1rem 0; background: var(--skip); }
.number { color: var(--accent); }
.inline-check, .quiz { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin: 1.5rem 0; }
.inline-check .label { font-weight: bold; margin: 0; }
.options { list-style: none; padding: 0; }
.option { width: 100%; text-align: left; padding: 0.5rem 1rem; margin: 0.25rem 0; border: 1px solid var(--border); border-radius: 6px; background: var(--bg); color: var(--fg); cursor: pointer; }
.option:disabled { cursor: default; }
.option.correct { background: var(--pass); }
.option.incorrect { background: var(--fail); }
.page-nav { display: flex; justify-content: space-between; margin-top: 3rem; }
dt { font-weight: bold; margin-top: 1rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.skip { background: var(--skip); }
.flag { font-size: 0.8rem; color: #b45309; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const PAGE_JS: &str = r#"
function reveal(container, correct, selected) {
  container.querySelectorAll('.option').forEach(btn => {
    const i = Number(btn.dataset.index);
    btn.disabled = true;
    if (i === correct) btn.classList.add('correct');
    else if (i === selected) btn.classList.add('incorrect');
  });
}

document.querySelectorAll('.inline-check').forEach(check => {
  const correct = Number(check.dataset.correct);
  check.querySelectorAll('.option').forEach(btn => {
    btn.addEventListener('click', () => {
      if (check.dataset.answered) return;
      check.dataset.answered = 'true';
      const selected = Number(btn.dataset.index);
      reveal(check, correct, selected);
      const feedback = check.querySelector('.feedback');
      feedback.textContent = selected === correct ? 'Correct!' : 'Not quite.';
      feedback.hidden = false;
      check.querySelector('.explanation').hidden = false;
    });
  });
});

(function () {
  const root = document.getElementById('quiz');
  if (!root) return;
  const questions = JSON.parse(document.getElementById('quiz-data').textContent);
  const body = root.querySelector('.quiz-body');
  const progress = root.querySelector('.progress');
  const next = root.querySelector('.next');
  const result = root.querySelector('.quiz-result');
  let current = 0;
  let answers = {};

  function render() {
    const q = questions[current];
    progress.textContent = 'Question ' + (current + 1) + ' of ' + questions.length;
    body.innerHTML = '';
    const prompt = document.createElement('p');
    prompt.className = 'prompt';
    prompt.textContent = q.prompt;
    body.appendChild(prompt);
    const list = document.createElement('ol');
    list.className = 'options';
    q.options.forEach((text, i) => {
      const li = document.createElement('li');
      const btn = document.createElement('button');
      btn.type = 'button';
      btn.className = 'option';
      btn.dataset.index = i;
      btn.textContent = text;
      btn.addEventListener('click', () => {
        if (current in answers) return;
        answers[current] = i;
        reveal(body, q.correct_index, i);
        if (q.explanation) {
          const exp = document.createElement('p');
          exp.className = 'explanation';
          exp.textContent = q.explanation;
          body.appendChild(exp);
        }
        next.disabled = false;
      });
      li.appendChild(btn);
      list.appendChild(li);
    });
    body.appendChild(list);
    next.disabled = true;
    next.textContent = current + 1 === questions.length ? 'Finish' : 'Next';
  }

  function finish() {
    const correct = questions.filter((q, i) => answers[i] === q.correct_index).length;
    const pct = Math.floor((correct * 100 + questions.length / 2) / questions.length);
    body.innerHTML = '';
    progress.textContent = '';
    next.hidden = true;
    result.querySelector('.score').textContent = 'You scored ' + correct + '/' + questions.length + ' (' + pct + '%)';
    result.hidden = false;
  }

  next.addEventListener('click', () => {
    if (!(current in answers)) return;
    if (current + 1 < questions.length) { current += 1; render(); } else { finish(); }
  });

  root.querySelector('.restart').addEventListener('click', () => {
    current = 0;
    answers = {};
    result.hidden = true;
    next.hidden = false;
    render();
  });

  if (questions.length > 0) render();
})();
"#;
