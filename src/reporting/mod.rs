pub mod formatter;
pub mod html;
pub mod json;
pub mod table;

pub use table::Table;
