pub mod html;
mod styling;

use styling::{dim, magenta_bold};

/// Prints the buildbrief banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("📬 buildbrief"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Jenkins CI report generator")
    );
}
