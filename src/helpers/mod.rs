//! Pure data helpers used by the presentation layer
//!
//! - [`formatting`]: Durations, initials and chat ordering keys
//! - [`sizing`]: Photo size selection and fit-to-box scaling
//! - [`encoding`]: URL-safe base64

pub mod encoding;
pub mod formatting;
pub mod sizing;
