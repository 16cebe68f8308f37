//! Terminal rendering of core state.

use powerdrill_core::{format_clock, gate_lines, Mode, Progress, Question, Summary};

const CATS: &str = "😺 🐱 🐾 😻";

pub fn gate(mode: Mode) {
    println!();
    for line in gate_lines(mode) {
        println!("{line}");
    }
}

pub fn celebrate() {
    println!("  {CATS}");
}

pub fn question(q: &Question, progress: Option<Progress>, remaining_ms: u64, mode: Mode) {
    println!();
    let (number, cap) = progress
        .map(|p| (p.question_number, p.question_cap))
        .unwrap_or((q.index + 1, q.index + 1));
    println!(
        "[{}]  Q {number} / {cap}  {}",
        mode.display_name(),
        format_clock(remaining_ms as i64)
    );
    println!("Q: {}", q.prompt);
    let choices: Vec<String> = q
        .options
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}) {v}", i + 1))
        .collect();
    println!("   {}", choices.join("   "));
}

pub fn summary(s: &Summary, show_review: bool) {
    println!();
    println!("Great job!");
    let mut line = format!(
        "Score: {} / {} • Time: {}",
        s.score,
        s.total,
        format_clock(s.elapsed_ms as i64)
    );
    if let Some(note) = s.note() {
        line.push_str(" • ");
        line.push_str(note);
    }
    println!("{line}");

    if s.reward_minutes > 0 {
        println!("Nice run! You earned {} minutes. Enjoy!", s.reward_minutes);
    }

    if !show_review {
        return;
    }
    if s.wrong.is_empty() {
        println!("Perfect run, nothing to review!");
    } else {
        println!("Review these:");
        for (i, w) in s.wrong.iter().enumerate() {
            println!("  {}. {} → You: {} • Correct: {}", i + 1, w.label, w.picked, w.correct);
        }
    }
}
