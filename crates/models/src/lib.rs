//! Domain types for the users mock: the user record as stored and echoed on the
//! wire, and the field rules every create/update must satisfy.

pub mod user;
pub mod validation;

pub use user::UserRecord;
pub use validation::validate;
