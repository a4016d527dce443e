//! Record List Views: case-insensitive search plus fixed-size pages.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::employee::model::EmployeeRow;
use crate::position::model::PositionRow;

pub const PAGE_SIZE: usize = 10;

/// Decides whether a row matches an already lowercased search term.
pub trait Searchable {
    fn matches(&self, needle: &str) -> bool;
}

impl Searchable for EmployeeRow {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

impl Searchable for PositionRow {
    fn matches(&self, needle: &str) -> bool {
        self.position.to_lowercase().contains(needle)
            || self
                .parent_position
                .as_deref()
                .is_some_and(|parent| parent.to_lowercase().contains(needle))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub search: String,
    /// A search is active and nothing matched it.
    pub no_results: bool,
}

/// Query string of the list endpoints.
#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// New search term; an unchanged term keeps the current page.
    pub search: Option<String>,
    /// 1-based page; ignored when the search term changed in the same call.
    pub page: Option<usize>,
    /// Drops the search term and returns to page 1.
    #[serde(default)]
    pub clear: bool,
}

impl ListQuery {
    pub fn apply(&self, view: &mut ListView) {
        let mut reset = false;
        if self.clear {
            view.clear_search();
            reset = true;
        } else if let Some(term) = self.search.as_deref() {
            reset = view.set_search(term);
        }
        if let (false, Some(page)) = (reset, self.page) {
            view.go_to(page);
        }
    }
}

pub fn total_pages(items: usize, page_size: usize) -> usize {
    items.div_ceil(page_size)
}

/// Search term and current page of one list. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    search: String,
    page: usize,
    page_size: usize,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl ListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// A changed term always sends the view back to page 1.
    pub fn set_search(&mut self, term: &str) -> bool {
        if self.search == term {
            return false;
        }
        self.search = term.to_string();
        self.page = 1;
        true
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Pulls the current page back onto the last page that still exists,
    /// e.g. after a deletion emptied the final page.
    pub fn clamp(&mut self, filtered_len: usize) {
        let last = total_pages(filtered_len, self.page_size).max(1);
        if self.page > last {
            self.page = last;
        }
    }

    pub fn render<T: Searchable + Clone>(&mut self, rows: &[T]) -> Page<T> {
        let needle = self.search.trim().to_lowercase();
        let filtered: Vec<&T> = if needle.is_empty() {
            rows.iter().collect()
        } else {
            rows.iter().filter(|row| row.matches(&needle)).collect()
        };

        self.clamp(filtered.len());
        let start = (self.page - 1) * self.page_size;
        let items = filtered
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|row| (*row).clone())
            .collect();

        Page {
            items,
            page: self.page,
            total_pages: total_pages(filtered.len(), self.page_size),
            total_items: filtered.len(),
            search: self.search.clone(),
            no_results: !needle.is_empty() && filtered.is_empty(),
        }
    }
}
