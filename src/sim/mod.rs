pub mod event;
pub mod explorer;
pub mod layout;
pub mod oracle;
