//! Static enumerations used to populate filter and form selects.

use serde::{Deserialize, Serialize};

/// Sentinel used by select inputs to mean "no constraint".
pub const ALL_OPTION: &str = "all";

/// Response for `GET /categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Response for `GET /departments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentsResponse {
    pub departments: Vec<String>,
}

/// Returns `None` for blank values and the "all" sentinel, else the trimmed value.
pub fn selected_option(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_OPTION))
}
