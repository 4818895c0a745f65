// Clipboard access. The terminal implementation emits an OSC 52 escape,
// which most modern terminals (and tmux with set-clipboard on) turn into a
// system clipboard write, including over SSH.

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use std::io;

pub trait Clipboard {
    fn write_text(&self, text: &str) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn write_text(&self, text: &str) -> io::Result<()> {
        execute!(io::stdout(), CopyToClipboard::to_clipboard_from(text))
    }
}
