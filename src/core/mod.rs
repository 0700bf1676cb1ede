pub mod clock;
pub mod confirm;
pub mod event;
pub mod geodesy;
pub mod ledger;
pub mod link;
pub mod log;
pub mod service;
pub mod token;
pub mod verify;
