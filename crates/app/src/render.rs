use std::fmt::Write as _;

use study_core::model::{Course, Material};
use study_core::quiz::{QuizSession, TimerState, choice_label, wrong_only, wrong_or_unanswered};

/// Full text view of a session: status lines, then every question.
pub fn session(session: &QuizSession) -> String {
    let mut out = String::new();
    let locked = session.is_locked();
    let reveal = session.reveal_answers();
    let score = session.score();

    if locked {
        let _ = writeln!(out, "Final Score: {}/{}", score.correct, score.total);
    }
    if session.mode().is_exam() {
        match session.timer_state() {
            TimerState::Running => {
                let _ = writeln!(out, "⏳ Time Left: {}", session.remaining_display());
            }
            TimerState::Expired | TimerState::StoppedBySubmit => {
                let _ = writeln!(out, "✅ Exam Submitted");
            }
            TimerState::Idle => {}
        }
    }
    if locked && score.is_perfect() {
        let _ = writeln!(out, "✅ Perfect score. You're locked in.");
    }

    for (idx, question) in session.questions().iter().enumerate() {
        let selected = session.answer(question.id);
        let _ = writeln!(out);
        let _ = writeln!(out, "Topic: {}", question.topic.label());
        let _ = writeln!(out, "{}. {}", idx + 1, question.prompt);
        for (i, choice) in question.choices.iter().enumerate() {
            let picked = selected == Some(i);
            let marker = if picked && !reveal { ">" } else { " " };
            let mut line = format!("  {marker} {}. {choice}", choice_label(i));
            if reveal && question.is_correct(i) {
                line.push_str("   ✔ Correct");
            } else if reveal && picked {
                line.push_str("   ❌ Your answer");
            }
            let _ = writeln!(out, "{line}");
        }
        if reveal {
            let _ = writeln!(
                out,
                "  Correct Answer: {}",
                choice_label(question.correct_index)
            );
        }
    }

    out
}

/// One-line summary of what can be done next.
pub fn actions(session: &QuizSession) -> String {
    if !session.is_locked() {
        return format!(
            "Answered {}/{}. Type `<n> <letter>` to answer, `submit` when done.",
            session.answers().len(),
            session.len()
        );
    }
    format!(
        "`retry` ({} wrong), `retry all` ({} wrong + unanswered), `reveal`, `reset`, `new`, `exam`, `quit`",
        wrong_only(session).len(),
        wrong_or_unanswered(session).len()
    )
}

pub fn course_line(course: &Course, days_left: Option<i64>) -> String {
    let mut line = format!("#{} {}", course.id(), course.name());
    if let Some(date) = course.exam_date() {
        let _ = write!(line, " | exam {date}");
        match days_left {
            Some(days) if days > 0 => {
                let _ = write!(line, " (in {days} days)");
            }
            Some(0) => line.push_str(" (today)"),
            Some(_) => line.push_str(" (passed)"),
            None => {}
        }
    }
    line
}

/// Title, timestamp and the first line of the body, shortened.
pub fn material_line(material: &Material) -> String {
    const PREVIEW_CHARS: usize = 60;
    let first_line = material.raw_text.lines().next().unwrap_or_default();
    let mut preview: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || material.raw_text.lines().nth(1).is_some() {
        preview.push('…');
    }
    format!(
        "#{} {} ({}) {preview}",
        material.id,
        material.display_title(),
        material.created_at.format("%Y-%m-%d %H:%M")
    )
}
