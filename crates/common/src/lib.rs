//! Shared plumbing for the users mock workspace: logging setup, startup
//! environment checks and small wire types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
    }
}
