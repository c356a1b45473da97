//! Solutions export.
//!
//! Renders a [`Document`] as Pandoc Markdown with every answer marked, for
//! instructors. Bodies are markup already and are copied through as raw
//! HTML, which Pandoc accepts inline.

use crate::error::CompileError;
use crate::expr::format_float;
use crate::ids::IdScheme;
use crate::model::{Document, Entity, Group, NumericalAnswer, Question, QuestionKind};
use crate::structure;

const HRULE: &str = "------------------------------------------------------------------------------\n\n";
const INDENT: &str = "    ";

/// How groups and points appear in the solutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolutionsOptions {
    /// Prefix every question with its point value.
    pub show_points: bool,
    /// Show only `pick` members of each group as representative examples
    /// instead of the whole pool.
    pub sample_groups: bool,
}

/// Render the solutions of a document as Pandoc Markdown.
///
/// The entity sequence must be well formed; group errors are the same
/// [`CompileError`]s the compiler reports.
pub fn solutions_markdown(
    document: &Document,
    options: &SolutionsOptions,
) -> Result<String, CompileError> {
    structure::build(document, &IdScheme::default())?;

    let mut md = String::new();
    let title = if document.title.is_empty() {
        "Quiz"
    } else {
        document.title.as_str()
    };
    let title = format!("{}: solutions", md_escape(title));
    md.push_str("---\n");
    md.push_str(&format!(
        "title: \"{}\"\n",
        title.replace('\\', "\\\\").replace('"', "\\\"")
    ));
    md.push_str("...\n\n");

    if !document.description.is_empty() {
        md.push_str(&document.description);
        md.push_str("\n\n");
        md.push_str(HRULE);
    }
    let body_start = md.len();

    let mut entities = document.entities.iter();
    while let Some(entity) = entities.next() {
        match entity {
            Entity::TextRegion(region) => {
                if let Some(title) = region.title.as_deref().filter(|t| !t.is_empty()) {
                    if md.len() > body_start && !md.ends_with(HRULE) {
                        md.push_str(HRULE);
                    }
                    md.push_str(&format!("## {}\n\n", md_escape(&title.replace('\n', " "))));
                }
                if !region.body.is_empty() {
                    md.push_str(&region.body);
                    md.push_str("\n\n");
                }
                md.push_str(HRULE);
            }
            Entity::GroupStart(group) => {
                let members: Vec<&Question> = entities
                    .by_ref()
                    .take_while(|e| !matches!(e, Entity::GroupEnd))
                    .filter_map(|e| match e {
                        Entity::Question(q) => Some(q),
                        _ => None,
                    })
                    .collect();
                write_group(&mut md, body_start, group, &members, options);
            }
            Entity::Question(question) => write_question(&mut md, question, false, options),
            Entity::GroupEnd => {}
        }
    }

    if md.len() > body_start && md.ends_with(HRULE) {
        md.truncate(md.len() - HRULE.len());
    }
    Ok(md)
}

fn write_group(
    md: &mut String,
    body_start: usize,
    group: &Group,
    members: &[&Question],
    options: &SolutionsOptions,
) {
    let pick = group.pick as usize;
    let plural = if pick == 1 { "question" } else { "questions" };

    if options.sample_groups {
        if pick == 1 {
            md.push_str("### Randomized question: representative example is shown\n\n");
        } else {
            md.push_str(&format!(
                "### Randomized {plural}: {pick} representative examples are shown\n\n"
            ));
        }
        for question in members.iter().take(pick) {
            write_question(md, question, false, options);
        }
        return;
    }

    if md.len() > body_start && !md.ends_with(HRULE) {
        md.push_str(HRULE);
    }
    md.push_str(&format!("### Randomized {plural}: randomly select {pick}\n\n"));
    let pooled = members.len() != pick;
    if pooled {
        for _ in 0..pick {
            md.push_str("@.  `<randomly selected>`\n\n");
        }
    }
    for question in members {
        write_question(md, question, pooled, options);
    }
    md.push_str(HRULE);
}

fn write_question(md: &mut String, question: &Question, pooled: bool, options: &SolutionsOptions) {
    md.push_str(if pooled { "*   " } else { "@.  " });
    if options.show_points {
        md.push_str(&format!("**[{}]** ", format_float(question.points)));
    }
    md.push_str(&indented(&question.prompt, 4));
    md.push_str("\n\n");

    match question.kind {
        QuestionKind::TrueFalse | QuestionKind::MultipleChoice => {
            for choice in &question.choices {
                let mark = if choice.correct { "(x)" } else { "( )" };
                answer_line(md, &format!("{mark} {}", indented(&choice.body, 8)));
                if let Some(feedback) = &choice.feedback {
                    feedback_line(md, feedback);
                }
            }
        }
        QuestionKind::MultipleAnswers => {
            for choice in &question.choices {
                let mark = if choice.correct { "[x]" } else { "[ ]" };
                answer_line(md, &format!("{mark} {}", indented(&choice.body, 8)));
                if let Some(feedback) = &choice.feedback {
                    feedback_line(md, feedback);
                }
            }
        }
        QuestionKind::ShortAnswer => {
            let accepted: Vec<&str> = question
                .correct_choices()
                .map(|c| c.body.as_str())
                .collect();
            answer_line(md, &format!("Answer: {}", accepted.join(" **|** ")));
        }
        QuestionKind::Numerical => {
            if let Some(answer) = &question.numerical {
                answer_line(md, &format!("Answer: {}", numerical_math(answer)));
            }
        }
        QuestionKind::GapMatch => {
            if let Some(data) = &question.gap_match {
                for gap in &data.gaps {
                    let texts: Vec<&str> = data
                        .assignments
                        .iter()
                        .filter(|a| &a.gap == gap)
                        .filter_map(|a| data.options.iter().find(|o| o.id == a.option))
                        .map(|o| o.text.as_str())
                        .collect();
                    let filled = if texts.is_empty() {
                        "(empty)".to_string()
                    } else {
                        texts.join(" **|** ")
                    };
                    answer_line(md, &format!("{gap}: {filled}"));
                }
            }
        }
        QuestionKind::Essay | QuestionKind::FileUpload => {}
    }

    if let Some(solution) = &question.feedback.general {
        answer_line(md, &format!("Solution: {}", indented(solution, 8)));
    }
}

fn answer_line(md: &mut String, text: &str) {
    md.push_str(INDENT);
    md.push_str("*   ");
    md.push_str(text);
    md.push_str("\n\n");
}

fn feedback_line(md: &mut String, feedback: &str) {
    md.push_str(INDENT);
    md.push_str(INDENT);
    md.push_str("*Feedback:* ");
    md.push_str(&indented(feedback, 8));
    md.push_str("\n\n");
}

/// `$target \pm tolerance \quad \Rightarrow \quad [min, max]$`, or just the
/// target for exact answers.
fn numerical_math(answer: &NumericalAnswer) -> String {
    let (min, max) = answer.bounds();
    let range = format!("[{}, {}]", format_float(min), format_float(max));
    match *answer {
        NumericalAnswer::Tolerance { target, tolerance } if tolerance == 0.0 => {
            format!("${}$", format_float(target))
        }
        NumericalAnswer::Tolerance { target, tolerance } => format!(
            "${} \\pm {} \\quad \\Rightarrow \\quad {range}$",
            format_float(target),
            format_float(tolerance)
        ),
        NumericalAnswer::Range { .. } => format!("${range}$"),
    }
}

/// Continuation lines of a list item are indented to stay inside it.
fn indented(text: &str, width: usize) -> String {
    text.replace('\n', &format!("\n{}", " ".repeat(width)))
}

/// Escape Markdown punctuation in plain text.
pub fn md_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '-' | '.' | '!'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::model::Feedback;

    fn render(entities: Vec<Entity>) -> String {
        solutions_markdown(&document(entities), &SolutionsOptions::default()).unwrap()
    }

    #[test]
    fn front_matter_escapes_title() {
        let mut doc = document(vec![Entity::Question(essay("1"))]);
        doc.title = "Week 1 \"final\"".into();
        let md = solutions_markdown(&doc, &SolutionsOptions::default()).unwrap();
        assert!(md.starts_with("---\ntitle: \"Week 1 \\\"final\\\": solutions\"\n...\n\n"));
    }

    #[test]
    fn md_escape_punctuation() {
        assert_eq!(md_escape("a_b*c"), "a\\_b\\*c");
        assert_eq!(md_escape("1. (x)"), "1\\. \\(x\\)");
        assert_eq!(md_escape("plain"), "plain");
    }

    #[test]
    fn single_and_multiple_choice_marks() {
        let mut mc = multiple_choice("1", "a", &["b"]);
        mc.choices[1] = with_feedback(mc.choices[1].clone(), "no");
        let md = render(vec![
            Entity::Question(mc),
            Entity::Question(multiple_answers("2", &["a", "b"], &["c"])),
        ]);
        assert_eq!(md.matches("*   (x) ").count(), 1);
        assert_eq!(md.matches("*   ( ) ").count(), 1);
        assert!(md.contains("        *Feedback:* <p>no</p>\n\n"));
        assert_eq!(md.matches("*   [x] ").count(), 2);
        assert_eq!(md.matches("*   [ ] ").count(), 1);
        assert_eq!(md.matches("@.  ").count(), 2);
    }

    #[test]
    fn answers_for_text_kinds() {
        let md = render(vec![
            Entity::Question(short_answer("1", &["Santa", "Saint Nick"])),
            Entity::Question(numerical("2", 0.7, 0.1)),
            Entity::Question(numerical("3", 42.0, 0.0)),
            Entity::Question(gap_match("4")),
        ]);
        assert!(md.contains("    *   Answer: Santa **|** Saint Nick\n\n"));
        assert!(md.contains(
            "    *   Answer: $0.7 \\pm 0.1 \\quad \\Rightarrow \\quad [0.6, 0.8]$\n\n"
        ));
        assert!(md.contains("    *   Answer: $42$\n\n"));
        assert!(md.contains("    *   G1: winter\n\n"));
        assert!(md.contains("    *   G2: summer\n\n"));
    }

    #[test]
    fn points_and_solution() {
        let mut q = essay("1");
        q.points = 2.5;
        q.feedback = Feedback {
            general: Some("<p>Mention light.</p>".into()),
            ..Feedback::default()
        };
        let doc = document(vec![Entity::Question(q)]);
        let md = solutions_markdown(
            &doc,
            &SolutionsOptions {
                show_points: true,
                ..SolutionsOptions::default()
            },
        )
        .unwrap();
        assert!(md.contains("@.  **[2.5]** "));
        assert!(md.contains("    *   Solution: <p>Mention light.</p>\n\n"));
    }

    #[test]
    fn pooled_group_lists_every_member() {
        let md = render(vec![
            Entity::Question(essay("1")),
            Entity::GroupStart(group("g", 1)),
            Entity::Question(essay("2")),
            Entity::Question(essay("3")),
            Entity::GroupEnd,
        ]);
        assert!(md.contains(&format!("{HRULE}### Randomized question: randomly select 1\n\n")));
        assert_eq!(md.matches("@.  `<randomly selected>`").count(), 1);
        assert_eq!(md.matches("\n*   ").count(), 2);
        assert!(!md.ends_with(HRULE), "trailing rule is dropped");
    }

    #[test]
    fn sampled_group_shows_pick_members() {
        let doc = document(vec![
            Entity::GroupStart(group("g", 2)),
            Entity::Question(essay("2")),
            Entity::Question(essay("3")),
            Entity::Question(essay("4")),
            Entity::GroupEnd,
        ]);
        let md = solutions_markdown(
            &doc,
            &SolutionsOptions {
                sample_groups: true,
                ..SolutionsOptions::default()
            },
        )
        .unwrap();
        assert!(md.contains("### Randomized questions: 2 representative examples are shown\n\n"));
        assert_eq!(md.matches("@.  ").count(), 2);
        assert!(!md.contains("randomly selected"));
    }

    #[test]
    fn text_regions_become_headings() {
        let md = render(vec![
            Entity::Question(essay("1")),
            Entity::TextRegion(text("intro")),
            Entity::Question(essay("2")),
        ]);
        assert!(md.contains(&format!("{HRULE}## Text intro\n\n<p>Read intro</p>\n\n{HRULE}@.  ")));
    }

    #[test]
    fn malformed_groups_are_errors() {
        let doc = document(vec![Entity::Question(essay("1")), Entity::GroupEnd]);
        assert_eq!(
            solutions_markdown(&doc, &SolutionsOptions::default()).unwrap_err(),
            CompileError::UnmatchedGroupEnd { position: 1 }
        );
    }
}
