/// Data layer: cell model and row predicates.
///
/// Architecture:
/// ```text
///   headers + rows
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  CellValue, Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  column lookup + comparison → bool per row
///   └──────────┘
/// ```

pub mod filter;
pub mod model;
