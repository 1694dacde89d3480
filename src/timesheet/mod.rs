mod service;

pub use service::TimeSheet;
