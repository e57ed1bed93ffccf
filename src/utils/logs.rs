use console::{measure_text_width, Style};

use crate::scoring::{RelevanceRating, ScoreResult};

pub const TREE_BRANCH: char = '\u{251C}';
pub const TREE_END: char = '\u{2514}';
pub const TREE_HORIZ: char = '\u{2500}';
pub const TREE_VERT: char = '\u{2502}';

const TREE_PREFIX_WIDTH: usize = 4;
const VALUE_COLUMN: usize = 32;

fn tree_branch() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_BRANCH, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_end() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_END, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_indent() -> String {
    dim().apply_to(format!("{}   ", TREE_VERT)).to_string()
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn ml_prefix() -> String {
    yellow().apply_to("[ML]").to_string()
}

pub fn pad_label(label: &str, depth: usize) -> String {
    let prefix_width = depth * TREE_PREFIX_WIDTH;
    let target_width = VALUE_COLUMN.saturating_sub(prefix_width);
    let current_width = measure_text_width(label);
    if current_width < target_width {
        format!("{}{}", label, " ".repeat(target_width - current_width))
    } else {
        format!("{} ", label)
    }
}

// Lifecycle lines go to stderr so `--json` output stays machine readable.

pub fn log_ml_step(step: &str) {
    eprintln!("{} {}", ml_prefix(), dim().apply_to(step));
}

pub fn log_ml_model_loaded(name: &str, seconds: f32) {
    eprintln!(
        "{} loaded {} in {}",
        ml_prefix(),
        cyan().apply_to(name),
        bold().apply_to(format!("{seconds:.1}s"))
    );
}

pub fn log_ml_ready() {
    eprintln!("{} models ready!", ml_prefix());
}

pub fn log_ml_disabled() {
    eprintln!(
        "{} {}",
        ml_prefix(),
        yellow().apply_to("models disabled, scoring by rules only")
    );
}

pub fn log_ml_error(error: &str) {
    eprintln!(
        "{} {} {}",
        ml_prefix(),
        red().apply_to("error:"),
        dim().apply_to(error)
    );
}

fn score_style(score: u32, max: u32) -> Style {
    let ratio = if max == 0 {
        0.0
    } else {
        score as f32 / max as f32
    };
    if ratio >= 0.7 {
        green().bold()
    } else if ratio >= 0.4 {
        yellow().bold()
    } else {
        red().bold()
    }
}

fn rating_style(rating: RelevanceRating) -> Style {
    match rating {
        RelevanceRating::High => green(),
        RelevanceRating::Medium => yellow(),
        RelevanceRating::Low => red(),
        RelevanceRating::NotEvaluated => dim(),
    }
}

/// The human-readable report for one scored essay.
pub fn render_report(result: &ScoreResult, max_score: u32) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "{}",
        magenta().apply_to(bold().apply_to("[ESSAY ASSESSMENT]"))
    ));

    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("RESULT")));
    lines.push(format!(
        "{}{}{}",
        tree_branch(),
        pad_label("final score", 1),
        score_style(result.final_score, max_score)
            .apply_to(format!("{}/{}", result.final_score, max_score))
    ));
    lines.push(format!(
        "{}{}{}",
        tree_branch(),
        pad_label("theme relevance", 1),
        rating_style(result.relevance_rating).apply_to(result.relevance_rating)
    ));
    lines.push(format!(
        "{}{}{}",
        tree_end(),
        pad_label("lines", 1),
        dim().apply_to(result.line_count)
    ));

    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("MESSAGE")));
    lines.push(format!("{}{}", tree_end(), result.message));

    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("COMPETENCIES")));
    if result.competency_scores.is_empty() {
        lines.push(format!("{}{}", tree_end(), dim().apply_to("none")));
    } else {
        let count = result.competency_scores.len();
        for (i, score) in result.competency_scores.iter().enumerate() {
            let branch = if i == count - 1 {
                tree_end()
            } else {
                tree_branch()
            };
            lines.push(format!(
                "{}{}{}",
                branch,
                pad_label(&score.name, 1),
                bold().apply_to(score)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("RECOMMENDATIONS")));
    if result.errors.is_empty() {
        lines.push(format!(
            "{}{}",
            tree_end(),
            green().apply_to("no significant issues detected. congratulations!")
        ));
    } else {
        let count = result.errors.len();
        for (i, note) in result.errors.iter().enumerate() {
            let branch = if i == count - 1 {
                tree_end()
            } else {
                tree_branch()
            };
            lines.push(format!("{}{}", branch, yellow().apply_to(note)));
        }
    }

    lines.join("\n")
}

pub fn print_report(result: &ScoreResult, max_score: u32) {
    println!("{}\n", render_report(result, max_score));
}

/// First line of the essay, trimmed for the verbose header.
pub fn log_essay_header(theme: &str, preview: &str, line_count: usize) {
    let preview = if preview.chars().count() > 60 {
        format!("{}...", preview.chars().take(57).collect::<String>())
    } else {
        preview.to_string()
    };
    eprintln!(
        "{} \"{}\"",
        cyan().apply_to("[THEME]"),
        bold().apply_to(theme)
    );
    eprintln!("{}{}", tree_indent(), dim().apply_to(preview));
    eprintln!(
        "{}{}{}",
        tree_end(),
        pad_label("lines", 1),
        dim().apply_to(line_count)
    );
}
