pub mod areas;
pub mod export;
pub mod form;
pub mod preview;
pub mod session;
