//! `strata-members` — society member records and their store boundary.
//!
//! Members are owned by the account subsystem; the payment pipeline only
//! reads them and updates contact details. Registration/login mechanics are
//! out of scope.

pub mod member;
pub mod store;

pub use member::Member;
pub use store::{InMemoryMemberStore, MemberStore};
