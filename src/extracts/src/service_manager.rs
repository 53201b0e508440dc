//! Unit status from the service manager.
//!
//! The listing format of `systemctl list-units` is not a stable interface, so the line
//! parsing sits behind [`UnitLineParser`] and the whole query behind [`UnitLister`].

pub mod parser;
pub mod systemctl;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use parser::{parse_listing, ColumnUnitParser, UnitLineParser};
pub use systemctl::SystemctlUnitLister;

/// Unit name -> status (`"active"` or anything else) for every matching unit.
#[async_trait]
pub trait UnitLister: Send + Sync {
    async fn list_units(&self) -> BTreeMap<String, String>;
}
