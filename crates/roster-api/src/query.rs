//! Query-string helpers shared by the list endpoints.

use std::{fmt, str::FromStr};

use roster_core::{page::PageRequest, validation::ValidationErrors};
use serde::{Deserialize, Deserializer, de};

use crate::error::ApiError;

/// Treat `?key=` the same as an absent key.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: FromStr,
  T::Err: fmt::Display,
{
  let opt = Option::<String>::deserialize(de)?;
  match opt.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
  }
}

/// Build a [`PageRequest`], rejecting explicit zeroes.
pub fn page_request(
  page: Option<u32>,
  page_size: Option<u32>,
) -> Result<PageRequest, ApiError> {
  let mut errs = ValidationErrors::new();
  if page == Some(0) {
    errs.add("page", "page must be at least 1");
  }
  if page_size == Some(0) {
    errs.add("pageSize", "pageSize must be at least 1");
  }
  ApiError::check(errs)?;
  Ok(PageRequest::new(page, page_size))
}
