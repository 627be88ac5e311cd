pub mod remittances;
pub mod shared;
pub mod tasks;
pub mod worklogs;
