pub mod dashboard;
pub mod expenses;
pub mod history;
pub mod login;
pub mod pos;
pub mod settings;
