use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::config::Config;
use crate::sort::SortOrder;

pub const LOADING_CLASS: &str = "loading";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Completed,
    Uncompleted,
}

impl TableKind {
    pub fn of(element_id: &str, completed_id: &str) -> Self {
        if element_id == completed_id {
            Self::Completed
        } else {
            Self::Uncompleted
        }
    }

    pub fn empty_text(self) -> &'static str {
        match self {
            Self::Completed => "No completed tasks.",
            Self::Uncompleted => "No uncompleted tasks.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    pub field: String,
    pub label: String,
    pub sortable: bool,
    pub icon: String,
}

impl Header {
    pub fn sortable(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            sortable: true,
            icon: String::new(),
        }
    }

    pub fn fixed(label: &str) -> Self {
        Self {
            field: String::new(),
            label: label.to_string(),
            sortable: false,
            icon: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableBody {
    pub html: String,
    pub classes: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct IconGlyphs {
    pub ascending: String,
    pub descending: String,
}

impl IconGlyphs {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            ascending: cfg
                .get("icon.ascending")
                .unwrap_or_else(|| "\u{25b2}".to_string()),
            descending: cfg
                .get("icon.descending")
                .unwrap_or_else(|| "\u{25bc}".to_string()),
        }
    }

    pub fn for_order(&self, order: SortOrder) -> &str {
        match order {
            SortOrder::Asc => &self.ascending,
            SortOrder::Desc => &self.descending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableModel {
    pub element_id: String,
    pub kind: TableKind,
    pub headers: Vec<Header>,
    pub body: TableBody,
}

impl TableModel {
    pub fn new(element_id: &str, kind: TableKind, headers: Vec<Header>) -> Self {
        Self {
            element_id: element_id.to_string(),
            kind,
            headers,
            body: TableBody::default(),
        }
    }

    /// The standard task-list table: five sortable data columns plus the
    /// fixed action column.
    pub fn task_table(element_id: &str, cfg: &Config) -> Self {
        let completed_id = cfg
            .get("table.completed.id")
            .unwrap_or_else(|| "completed-tasks-table".to_string());
        let kind = TableKind::of(element_id, &completed_id);

        Self::new(
            element_id,
            kind,
            vec![
                Header::sortable("id", "ID"),
                Header::sortable("title", "Title"),
                Header::sortable("date_added", "Date Added"),
                Header::sortable("priority", "Priority"),
                Header::sortable("completion_date", "Completion Date"),
                Header::fixed("Actions"),
            ],
        )
    }

    pub fn sortable_fields(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|header| header.sortable)
            .map(|header| header.field.clone())
            .collect()
    }

    /// Marks the active column with the direction glyph and clears every
    /// other icon slot. Idempotent.
    pub fn set_sort_icons(&mut self, active_field: &str, order: SortOrder, glyphs: &IconGlyphs) {
        for header in &mut self.headers {
            if header.sortable && header.field == active_field {
                header.icon = glyphs.for_order(order).to_string();
            } else {
                header.icon.clear();
            }
        }
    }
}

pub struct LoadingGuard {
    table: Rc<RefCell<TableModel>>,
}

impl LoadingGuard {
    pub fn begin(table: Rc<RefCell<TableModel>>) -> Self {
        table
            .borrow_mut()
            .body
            .classes
            .insert(LOADING_CLASS.to_string());
        Self { table }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.table.borrow_mut().body.classes.remove(LOADING_CLASS);
    }
}
