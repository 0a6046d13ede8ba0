//! Page-number pagination as used by every list endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A 1-based page request. Construct with [`PageRequest::new`] so zero values
/// are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page:      u32,
  pub page_size: u32,
}

impl Default for PageRequest {
  fn default() -> Self { Self { page: 1, page_size: DEFAULT_PAGE_SIZE } }
}

impl PageRequest {
  pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
    Self {
      page:      page.unwrap_or(1).max(1),
      page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
    }
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.page_size)
  }

  pub fn limit(&self) -> u64 { u64::from(self.page_size) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page:        u32,
  pub page_size:   u32,
  pub total:       u64,
  pub total_pages: u64,
}

impl Pagination {
  pub fn new(request: PageRequest, total: u64) -> Self {
    let size = u64::from(request.page_size);
    Self {
      page: request.page,
      page_size: request.page_size,
      total,
      total_pages: total.div_ceil(size).max(1),
    }
  }
}

/// One page of results plus the numbers needed to render a pager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub data:       Vec<T>,
  pub pagination: Pagination,
}
