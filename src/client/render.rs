use crate::client::form::FormState;
use crate::domain::model::CheckResult;

const BAR_WIDTH: usize = 25;

/// Presentation tier for a grammar score. The thresholds are UI policy only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            ScoreTier::High
        } else if score >= 60 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            ScoreTier::High => "#4caf50",
            ScoreTier::Medium => "#ff9800",
            ScoreTier::Low => "#f44336",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            ScoreTier::High => "\x1b[32m",
            ScoreTier::Medium => "\x1b[33m",
            ScoreTier::Low => "\x1b[31m",
        }
    }
}

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: bool,
}

fn panel(title: &str, body: &str) -> String {
    let mut out = format!("== {} ==\n", title);
    for line in body.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    if body.is_empty() {
        out.push('\n');
    }
    out
}

pub fn original_panel(result: &CheckResult) -> String {
    panel("Original Text", &result.original_text)
}

pub fn corrected_panel(result: &CheckResult) -> String {
    panel("Corrected Text", &result.corrected_text)
}

/// The bar is clamped for drawing; the number shown is the score as received.
pub fn score_panel(result: &CheckResult, options: RenderOptions) -> String {
    let score = result.grammar_score;
    let tier = ScoreTier::for_score(score);
    let filled = (score.min(100) as usize * BAR_WIDTH) / 100;
    let bar = format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let line = format!("{} {} out of 100", bar, score);
    let line = if options.color {
        format!("{}{}{}", tier.ansi(), line, RESET)
    } else {
        line
    };
    panel("Grammar Score", &line)
}

pub fn explanation_panel(result: &CheckResult) -> String {
    panel("Explanation", &result.explanation)
}

pub fn render_result(result: &CheckResult, options: RenderOptions) -> String {
    [
        original_panel(result),
        corrected_panel(result),
        score_panel(result, options),
        explanation_panel(result),
    ]
    .join("\n")
}

pub fn render_state(state: &FormState, options: RenderOptions) -> String {
    match state {
        FormState::Idle => String::new(),
        FormState::Loading => "Checking grammar...\n".to_string(),
        FormState::Success(result) => render_result(result, options),
        FormState::Error(message) if options.color => {
            format!("\x1b[31mError: {}{}\n", message, RESET)
        }
        FormState::Error(message) => format!("Error: {}\n", message),
    }
}
