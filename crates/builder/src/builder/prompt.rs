//! Operator confirmation.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Ask a yes/no question on the terminal. `default` answers an empty reply;
/// anything other than an affirmative reply counts as no.
pub fn query_yes_no(question: &str, default: bool) -> Result<bool> {
    let stdin = io::stdin();
    ask(question, default, &mut stdin.lock(), &mut io::stdout())
}

fn ask(
    question: &str,
    default: bool,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    write!(output, "{question} {hint} ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(default);
    }
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(reply: &str, default: bool) -> bool {
        let mut out = Vec::new();
        ask("Proceed?", default, &mut Cursor::new(reply), &mut out).unwrap()
    }

    #[test]
    fn empty_reply_takes_the_default() {
        assert!(!answer("\n", false));
        assert!(answer("\n", true));
    }

    #[test]
    fn affirmative_replies() {
        assert!(answer("y\n", false));
        assert!(answer("YES\n", false));
    }

    #[test]
    fn anything_else_is_a_no() {
        assert!(!answer("n\n", true));
        assert!(!answer("maybe\n", true));
        assert!(!answer("yep\n", true));
    }

    #[test]
    fn prompt_shows_the_default() {
        let mut out = Vec::new();
        ask("Proceed?", false, &mut Cursor::new("\n"), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Proceed? [y/N] ");
    }
}
