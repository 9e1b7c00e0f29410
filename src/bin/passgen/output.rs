//! What ends up on stdout.

use std::io::Write;

use anyhow::Context;

use crate::Salt;

static RULE: &str = "--------------------------------------------------";

pub(crate) fn print_random_string(mut output: impl Write, random: &str) -> anyhow::Result<()> {
    writeln!(output, "{random}").context("failed to write random string to stdout")
}

/// Print a derived password. A freshly generated salt is printed alongside it, since it is needed
/// to derive the same password again.
pub(crate) fn print_password(
    mut output: impl Write,
    password: &passgen::Secret,
    salt: &Salt,
) -> anyhow::Result<()> {
    let written = match salt {
        Salt::Given(_) => writeln!(output, "{}", password.as_str()),
        Salt::Generated(salt) => writeln!(
            output,
            "{RULE}\nSalt:     {salt}\nPassword: {}\n{RULE}\n{}: Save the Salt! It is required to \
             recover this password.",
            password.as_str(),
            console::style("IMPORTANT").bold(),
        ),
    };
    written.context("failed to write password to stdout")
}
