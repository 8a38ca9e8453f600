pub mod advice;
pub mod summary;
pub mod transactions;
