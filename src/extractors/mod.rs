//! Request extractors.

mod caller;
pub use caller::{Caller, ROLE_HEADER, USER_ID_HEADER};
