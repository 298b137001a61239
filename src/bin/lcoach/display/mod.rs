mod banner;
mod error;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use tables::{
    print_answer_key, print_catalog, print_consistency, print_practice_summary, print_status,
};

#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: crate::io::stderr_is_tty(),
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self { interactive: false }
        } else {
            self
        }
    }
}
