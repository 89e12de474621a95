//! Modal request/response capability used by edit and remove-all.

use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::warn;

/// Asks the user for replacement text or a yes/no confirmation.
///
/// Dismissing a prompt is always reported as `None` / `false`.
pub trait Prompter {
    fn ask_text(&mut self, current: &str) -> Option<String>;
    fn ask_confirm(&mut self, message: &str) -> bool;
}

/// Line-oriented prompter over any reader/writer pair.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter { input, output }
    }

    /// Write the prompt. A prompt the user never saw counts as dismissed.
    fn show(&mut self, prompt: fmt::Arguments<'_>) -> bool {
        match self
            .output
            .write_fmt(prompt)
            .and_then(|()| self.output.flush())
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not write prompt, treating it as dismissed");
                false
            }
        }
    }

    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Prompter reading from stdin and writing to stdout.
pub type StdinPrompter = LinePrompter<io::StdinLock<'static>, io::Stdout>;

pub fn stdin_prompter() -> StdinPrompter {
    LinePrompter::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask_text(&mut self, current: &str) -> Option<String> {
        if !self.show(format_args!("Update the task [{}]: ", current)) {
            return None;
        }
        // An empty line keeps the current text.
        self.read_answer().filter(|answer| !answer.is_empty())
    }

    fn ask_confirm(&mut self, message: &str) -> bool {
        if !self.show(format_args!("{} [y/N]: ", message)) {
            return false;
        }
        matches!(
            self.read_answer().map(|a| a.trim().to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        )
    }
}

/// Prompter that replays answers collected elsewhere, such as a modal
/// dialog or a test script.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    pub text: Option<String>,
    pub confirm: bool,
    pub asked: usize,
}

impl Scripted {
    pub fn text(answer: Option<&str>) -> Self {
        Scripted {
            text: answer.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn confirm(answer: bool) -> Self {
        Scripted {
            confirm: answer,
            ..Default::default()
        }
    }
}

impl Prompter for Scripted {
    fn ask_text(&mut self, _current: &str) -> Option<String> {
        self.asked += 1;
        self.text.clone()
    }

    fn ask_confirm(&mut self, _message: &str) -> bool {
        self.asked += 1;
        self.confirm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_prompter_text() {
        let mut out = Vec::new();
        let mut p = LinePrompter::new(&b"new text\n"[..], &mut out);
        assert_eq!(p.ask_text("old").as_deref(), Some("new text"));
        drop(p);
        assert_eq!(String::from_utf8(out).unwrap(), "Update the task [old]: ");
    }

    #[test]
    fn test_line_prompter_empty_and_eof_cancel() {
        let mut p = LinePrompter::new(&b"\n"[..], io::sink());
        assert_eq!(p.ask_text("old"), None);
        let mut p = LinePrompter::new(&b""[..], io::sink());
        assert_eq!(p.ask_text("old"), None);
    }

    #[test]
    fn test_line_prompter_confirm() {
        let mut p = LinePrompter::new(&b"Y\nno\n"[..], io::sink());
        assert!(p.ask_confirm("sure?"));
        assert!(!p.ask_confirm("sure?"));
        assert!(!p.ask_confirm("sure?"));
    }

    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unwritable_prompt_is_dismissed_without_reading() {
        let mut p = LinePrompter::new(&b"yes\nnew text\n"[..], ClosedOutput);
        assert!(!p.ask_confirm("sure?"));
        assert_eq!(p.ask_text("old"), None);
        // Nothing was consumed, so a working prompt still sees the first answer.
        assert_eq!(p.read_answer().as_deref(), Some("yes"));
    }
}
