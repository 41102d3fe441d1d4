pub mod items;
pub mod write_offs;
