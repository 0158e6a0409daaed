//! Display rendering of the assembled argument vector.

/// Join the argument vector into a copy/paste-able shell command. The third
/// positional argument is the query expression and gets single-quoted; all
/// other arguments are emitted as-is.
pub fn shell_command(args: &[String]) -> String {
    let mut quoted: Vec<String> = args.to_vec();
    if let Some(expr) = quoted.get_mut(2) {
        *expr = format!("'{expr}'");
    }
    quoted.join(" ")
}
