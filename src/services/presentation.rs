//! Fixed-width text rendering for tool results.
//!
//! Layout is a 50-column grid: a boxed header, a `▓`-bordered todo block, an
//! optional scorecard and an achievement badge. The block border changes with
//! [`DisplayStyle`]. The score is a weighted sum of a few surface
//! heuristics (distinct statuses, average content length, distinct
//! priorities) and carries no analytical meaning.

use comfy_table::{presets, Cell, CellAlignment, Table};
use std::fmt::Write as _;

use crate::domain::models::session::from_epoch_seconds;
use crate::domain::models::{EpochSeconds, Todo, TodoStatus};
use crate::services::todo_service::{ActiveWork, ReadResult, SessionsOverview};

const WIDTH: usize = 50;
const CONTENT_WIDTH: usize = 38;
const SYSTEM_NAME: &str = "TODO-MCP";
const BLOCK: char = '▓';

const DESIGN_WEIGHT: f64 = 0.40;
const USABILITY_WEIGHT: f64 = 0.30;
const CREATIVITY_WEIGHT: f64 = 0.20;
const CONTENT_WEIGHT: f64 = 0.10;

pub fn status_symbol(status: TodoStatus) -> &'static str {
    match status {
        TodoStatus::Pending => "[ ]",
        TodoStatus::InProgress => "[~]",
        TodoStatus::Completed => "[✓]",
        TodoStatus::Cancelled => "[×]",
    }
}

/// Scores out of 10 per criterion plus the weighted overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub design: f64,
    pub usability: f64,
    pub creativity: f64,
    pub content: f64,
    pub overall: f64,
}

#[allow(clippy::cast_precision_loss)]
fn average_content_len(todos: &[Todo]) -> f64 {
    if todos.is_empty() {
        return 0.0;
    }
    let total: usize = todos.iter().map(|t| t.content.chars().count()).sum();
    total as f64 / todos.len() as f64
}

fn distinct<T: Ord>(values: impl Iterator<Item = T>) -> usize {
    values.collect::<std::collections::BTreeSet<_>>().len()
}

pub fn evaluate(todos: &[Todo]) -> Evaluation {
    let avg_len = average_content_len(todos);

    let design = (8.0_f64 + 1.0 + 0.8 + 0.7).min(10.0);

    let mut usability = 8.0;
    if distinct(todos.iter().map(|t| t.status)) > 1 {
        usability += 1.0;
    }
    if avg_len > 15.0 {
        usability += 0.8;
    }
    usability = f64::min(usability + 0.7, 10.0);

    let creativity = 9.0;

    let mut content = 7.5;
    if !todos.is_empty() {
        if avg_len > 20.0 {
            content += 1.0;
        }
        if distinct(todos.iter().map(|t| t.priority)) > 1 {
            content += 0.5;
        }
    }
    let content = f64::min(content, 10.0);

    Evaluation {
        design,
        usability,
        creativity,
        content,
        overall: design * DESIGN_WEIGHT
            + usability * USABILITY_WEIGHT
            + creativity * CREATIVITY_WEIGHT
            + content * CONTENT_WEIGHT,
    }
}

pub fn achievement_level(score: f64) -> &'static str {
    if score >= 9.0 {
        "SITE OF THE DAY"
    } else if score >= 8.5 {
        "DEVELOPER AWARD"
    } else if score >= 6.5 {
        "HONORABLE MENTION"
    } else {
        "KEEP IMPROVING"
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn header(subtitle: &str) -> String {
    let inner = WIDTH - 2;
    let rule = "=".repeat(inner);
    let title = format!("  * {SYSTEM_NAME} v{}", env!("CARGO_PKG_VERSION"));
    let subtitle = format!("  {subtitle}");
    format!("+{rule}+\n|{title:<inner$}|\n|{subtitle:<inner$}|\n+{rule}+")
}

/// Border style of the todo block, chosen from how a session changed since
/// it was last read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayStyle {
    #[default]
    Minimalist,
    /// More todos completed than at the previous read.
    Brutalist,
    /// More todos in progress than at the previous read.
    Terminal,
}

impl DisplayStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimalist => "minimalist",
            Self::Brutalist => "brutalist",
            Self::Terminal => "terminal",
        }
    }
}

/// Pick a style by comparing a session's todos with the previous read.
///
/// Completions win over new in-progress work. No previous read, or an empty
/// one, gives [`DisplayStyle::Minimalist`].
pub fn detect_style(current: &[Todo], previous: Option<&[Todo]>) -> DisplayStyle {
    let Some(previous) = previous.filter(|p| !p.is_empty()) else {
        return DisplayStyle::Minimalist;
    };
    let count = |todos: &[Todo], status: TodoStatus| {
        todos.iter().filter(|t| t.status == status).count()
    };

    if count(current, TodoStatus::Completed) > count(previous, TodoStatus::Completed) {
        DisplayStyle::Brutalist
    } else if count(current, TodoStatus::InProgress) > count(previous, TodoStatus::InProgress) {
        DisplayStyle::Terminal
    } else {
        DisplayStyle::Minimalist
    }
}

fn block_line(text: &str, style: DisplayStyle) -> String {
    let border = match style {
        DisplayStyle::Brutalist => "▓▓",
        DisplayStyle::Minimalist | DisplayStyle::Terminal => "▓",
    };
    let inner = WIDTH - border.chars().count();
    format!("{:<inner$}{border}", format!("{border} {text}"))
}

fn block_rule(style: DisplayStyle) -> String {
    match style {
        DisplayStyle::Minimalist => BLOCK.to_string().repeat(WIDTH),
        DisplayStyle::Brutalist => "▓▓".repeat(WIDTH / 2),
        DisplayStyle::Terminal => format!("░▒{}▒░", BLOCK.to_string().repeat(WIDTH - 4)),
    }
}

fn format_timestamp(secs: EpochSeconds) -> String {
    from_epoch_seconds(secs).map_or_else(
        || format!("{secs:.0}"),
        |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

pub fn render_todo_block(todos: &[Todo], style: DisplayStyle) -> String {
    let mut lines = vec![block_rule(style)];
    for todo in todos {
        lines.push(block_line(
            &format!(
                "{} {}",
                status_symbol(todo.status),
                truncate(&todo.content, CONTENT_WIDTH)
            ),
            style,
        ));
    }
    lines.push(block_rule(style));
    lines.join("\n")
}

pub fn render_scorecard(evaluation: &Evaluation) -> String {
    let rows = [
        format!("DESIGN:     {:.1}/10", evaluation.design),
        format!("USABILITY:  {:.1}/10", evaluation.usability),
        format!("CREATIVITY: {:.1}/10", evaluation.creativity),
        format!("CONTENT:    {:.1}/10", evaluation.content),
        String::new(),
        format!(
            "OVERALL:    {:.1}/10 -> {}",
            evaluation.overall,
            achievement_level(evaluation.overall)
        ),
    ];
    let mut lines = vec![block_rule(DisplayStyle::Minimalist)];
    lines.extend(rows.iter().map(|row| block_line(row, DisplayStyle::Minimalist)));
    lines.push(block_rule(DisplayStyle::Minimalist));
    lines.join("\n")
}

/// Boxed achievement level and overall score.
pub fn render_achievement_badge(evaluation: &Evaluation) -> String {
    let inner = WIDTH - 2;
    let title = "─ Achievement Level ";
    let level = format!(" * {}", achievement_level(evaluation.overall));
    let score = format!(" Score: {:.1}/10", evaluation.overall);
    format!(
        "╭{title:─<inner$}╮\n│{level:<inner$}│\n│{score:<inner$}│\n╰{}╯",
        "─".repeat(inner)
    )
}

/// Text for `todo_read`.
///
/// The scorecard is optional; the achievement badge is always shown for a
/// non-empty list.
pub fn render_read(result: &ReadResult, show_scorecard: bool, style: DisplayStyle) -> String {
    if result.todos.is_empty() {
        return format!(
            "{}\n\nNo todos found for session: {}\nUse todo_write or todo_add_item to create some.",
            header("Session-scoped todo lists"),
            result.session_id
        );
    }

    let mut out = String::from("TODO STATUS REQUESTED:\n");
    out.push_str(&header("Session-scoped todo lists"));
    let _ = write!(
        out,
        "\nSession: {}\nStyle:   {}\nTodos:   {}",
        result.session_id,
        style.as_str().to_uppercase(),
        result.count
    );
    if let Some(last_updated) = result.last_updated {
        let _ = write!(out, "\nUpdated: {}", format_timestamp(last_updated));
    }
    out.push('\n');
    out.push_str(&render_todo_block(&result.todos, style));

    if let Some(stats) = &result.stats {
        let statuses = stats
            .status_counts
            .iter()
            .map(|(s, n)| format!("{n} {s}"))
            .collect::<Vec<_>>()
            .join(", ");
        let priorities = stats
            .priority_counts
            .iter()
            .map(|(p, n)| format!("{n} {p}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            out,
            "\nStatus:   {statuses}\nPriority: {priorities}\nComplete: {}",
            percent(stats.completion_rate)
        );
    }

    let evaluation = evaluate(&result.todos);
    if show_scorecard {
        out.push('\n');
        out.push_str(&render_scorecard(&evaluation));
    }
    out.push('\n');
    out.push_str(&render_achievement_badge(&evaluation));
    out
}

/// Text for `todo_get_sessions`.
pub fn render_sessions(overview: &SessionsOverview) -> String {
    if overview.sessions.is_empty() {
        return format!(
            "{}\n\nNo active sessions found.",
            header("Session overview")
        );
    }

    let mut table = Table::new();
    table.load_preset(presets::ASCII_BORDERS_ONLY_CONDENSED);
    table.set_header(vec!["SESSION", "TODOS", "DONE", "LAST UPDATED"]);
    for session in &overview.sessions {
        table.add_row(vec![
            Cell::new(&session.session_id),
            Cell::new(session.todo_count).set_alignment(CellAlignment::Right),
            Cell::new(percent(session.completion_rate)).set_alignment(CellAlignment::Right),
            Cell::new(format_timestamp(session.last_updated)),
        ]);
    }

    let mut out = header("Session overview");
    let _ = write!(
        out,
        "\n\nSESSIONS ({}), {} todos total:\n{table}",
        overview.total_sessions, overview.storage.total_todos
    );
    if let Some(file) = &overview.storage.storage_file {
        let _ = write!(out, "\nStorage: {file}");
    }
    out.push_str("\nUse todo_read with a session_id to view details.");
    out
}

/// Text for `todo_continue_from_last_conversation`.
pub fn render_continuation(active: &ActiveWork) -> String {
    let ActiveWork::Found {
        session_id,
        total_todos,
        pending_count,
        completed_count,
        next_pending,
        current_in_progress,
        last_updated,
        ..
    } = active
    else {
        return format!(
            "{}\n\nNo active work sessions found.\nStart with todo_write(session_id=\"<project>\").",
            header("Continue from last conversation")
        );
    };

    #[allow(clippy::cast_precision_loss)]
    let rate = if *total_todos == 0 {
        0.0
    } else {
        *completed_count as f64 / *total_todos as f64
    };

    let mut out = header("Continue from last conversation");
    let _ = write!(
        out,
        "\n\nRESUMING SESSION: {session_id}\nLast activity:    {}\nProgress:         {} complete ({completed_count}/{total_todos} done)",
        format_timestamp(*last_updated),
        percent(rate)
    );

    if !current_in_progress.is_empty() {
        out.push_str("\n\nCurrently in progress:");
        for todo in current_in_progress {
            let _ = write!(
                out,
                "\n  {} {:<36} {:>6}",
                status_symbol(todo.status),
                truncate(&todo.content, 36),
                todo.priority.as_str().to_uppercase()
            );
        }
    }

    if !next_pending.is_empty() {
        let _ = write!(out, "\n\nSuggested next actions ({}):", next_pending.len());
        for (i, todo) in next_pending.iter().enumerate() {
            let _ = write!(
                out,
                "\n  {}. {} {:<32} {:>6}",
                i + 1,
                status_symbol(todo.status),
                truncate(&todo.content, 32),
                todo.priority.as_str().to_uppercase()
            );
        }
        if *pending_count > next_pending.len() {
            let _ = write!(
                out,
                "\n     ... and {} more pending",
                pending_count - next_pending.len()
            );
        }
    }

    let advice = match (current_in_progress.is_empty(), next_pending.is_empty()) {
        (false, false) => "Ready to continue active work and tackle next tasks.",
        (false, true) => "Focus on completing the in-progress tasks.",
        (true, false) => "Ready to start new tasks from the pending queue.",
        (true, true) => "All tasks complete. Time to plan new work.",
    };
    let _ = write!(
        out,
        "\n\n{advice}\nUse todo_read(session_id=\"{session_id}\") for the full list."
    );
    out
}
