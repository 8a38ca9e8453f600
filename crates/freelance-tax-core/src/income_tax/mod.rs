pub mod advance_tax;
pub mod regime;
pub mod slabs;
