use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::table::{TableKind, TableModel};
use crate::task::TaskRecord;

#[derive(Debug, Clone)]
pub struct ActionLink {
    pub href: String,
    pub label: &'static str,
    pub class: &'static str,
}

/// A cell is either escaped text, trusted server-validated markup content,
/// or the fixed action links. Escaping happens only in `render_cell`, so a
/// field added later cannot bypass it by accident.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Raw(String),
    Actions(Vec<ActionLink>),
}

#[derive(Debug, Clone)]
pub struct RowSpec {
    pub task_id: Option<u64>,
    pub cells: Vec<Cell>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn action_links(id: u64, kind: TableKind) -> Vec<ActionLink> {
    let mut links = vec![
        ActionLink {
            href: format!("/task/{id}/"),
            label: "Details",
            class: "btn btn-small btn-secondary",
        },
        ActionLink {
            href: format!("/task/{id}/edit/"),
            label: "Edit",
            class: "btn btn-small",
        },
        ActionLink {
            href: format!("/task/{id}/delete/"),
            label: "Delete",
            class: "btn btn-small btn-danger",
        },
    ];

    match kind {
        TableKind::Completed => links.push(ActionLink {
            href: format!("/task/{id}/restore/"),
            label: "Restore",
            class: "btn btn-small btn-warning",
        }),
        TableKind::Uncompleted => links.push(ActionLink {
            href: format!("/task/{id}/complete/"),
            label: "Complete",
            class: "btn btn-small btn-success",
        }),
    }

    links
}

pub fn task_row(task: &TaskRecord, kind: TableKind) -> RowSpec {
    let completion_date = task
        .completion_date
        .clone()
        .unwrap_or_else(|| "-".to_string());

    RowSpec {
        task_id: Some(task.id),
        cells: vec![
            Cell::Raw(task.id.to_string()),
            Cell::Text(task.title.clone()),
            Cell::Raw(task.date_added.clone()),
            Cell::Text(task.priority.name.clone()),
            Cell::Raw(completion_date),
            Cell::Actions(action_links(task.id, kind)),
        ],
    }
}

/// Produces the full replacement body markup: one placeholder row for an
/// empty list, otherwise one row per record.
pub fn render_body(tasks: &[TaskRecord], kind: TableKind) -> String {
    if tasks.is_empty() {
        return format!(
            "<tr><td colspan=\"6\">{}</td></tr>",
            escape_html(kind.empty_text())
        );
    }

    tasks
        .iter()
        .map(|task| render_row(&task_row(task, kind)))
        .collect()
}

pub fn render_row(row: &RowSpec) -> String {
    let mut out = String::new();
    match row.task_id {
        Some(id) => {
            let _ = write!(out, "<tr data-task-id=\"{id}\">");
        }
        None => out.push_str("<tr>"),
    }
    for cell in &row.cells {
        out.push_str("<td>");
        out.push_str(&render_cell(cell));
        out.push_str("</td>");
    }
    out.push_str("</tr>");
    out
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => escape_html(text),
        Cell::Raw(raw) => raw.clone(),
        Cell::Actions(links) => links.iter().map(render_link).collect(),
    }
}

fn render_link(link: &ActionLink) -> String {
    format!(
        "<a href=\"{}\" class=\"{}\">{}</a>",
        link.href,
        link.class,
        escape_html(link.label)
    )
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    /// Terminal rendering of the fetched records: the data columns of the
    /// table, with the active sort column's glyph appended to its label.
    #[tracing::instrument(skip(self, table, tasks))]
    pub fn print_task_table(&mut self, table: &TableModel, tasks: &[TaskRecord]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if tasks.is_empty() {
            writeln!(out, "{}", table.kind.empty_text())?;
            return Ok(());
        }

        let headers: Vec<String> = table
            .headers
            .iter()
            .filter(|header| header.sortable)
            .map(|header| {
                if header.icon.is_empty() {
                    header.label.clone()
                } else {
                    format!("{} {}", header.label, header.icon)
                }
            })
            .collect();

        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let id = self.paint(&task.id.to_string(), "33");
            let completion_date = task
                .completion_date
                .clone()
                .unwrap_or_else(|| "-".to_string());

            rows.push(vec![
                id,
                task.title.clone(),
                task.date_added.clone(),
                task.priority.name.clone(),
                completion_date,
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
