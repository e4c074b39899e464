//! Registered application table entry

/// An `APPID` record. Applications are identified by the record name alone;
/// XDATA groups refer to them by that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppId;
