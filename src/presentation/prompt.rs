//! Terminal prompts: queued confirmations and hidden password entry.

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

use crate::application::services::ConfirmStore;
use crate::domain::entities::ConfirmRequest;

/// Interprets a typed answer. Anything but an explicit yes declines.
#[must_use]
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn question(request: &ConfirmRequest) -> String {
    let options = &request.options;
    let warning = if options.destructive {
        " This cannot be undone."
    } else {
        ""
    };
    format!(
        "{}: {}{warning} [{}/{}] ",
        options.title, options.message, options.confirm_label, options.cancel_label
    )
}

/// Answers every request that reaches the head of the queue.
///
/// With `assume_yes` requests are accepted without reading input. End of
/// input declines whatever is still queued.
pub async fn answer_confirmations<R>(store: ConfirmStore, input: R, assume_yes: bool)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    loop {
        let request = store.next_request().await;
        if assume_yes {
            debug!(id = request.id, "Confirmation accepted by --yes");
            store.respond(true);
            continue;
        }

        eprint!("{}", question(&request));
        match lines.next_line().await {
            Ok(Some(line)) => {
                store.respond(parse_answer(&line));
            }
            Ok(None) | Err(_) => {
                store.cancel_all();
                return;
            }
        }
    }
}

/// What a key press does to a secret being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretAction {
    /// Keep reading.
    Continue,
    /// Enter was pressed.
    Submit,
    /// Esc, Ctrl+C or Ctrl+D.
    Cancel,
}

/// Buffer for a secret typed with echo disabled.
#[derive(Default)]
pub struct SecretInput {
    value: String,
}

impl SecretInput {
    /// Applies one key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> SecretAction {
        if key.kind != KeyEventKind::Press {
            return SecretAction::Continue;
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return SecretAction::Submit,
            KeyCode::Esc => return SecretAction::Cancel,
            KeyCode::Char('c' | 'd') if control => return SecretAction::Cancel,
            KeyCode::Char('u') if control => self.value.clear(),
            KeyCode::Char(c) => self.value.push(c),
            KeyCode::Backspace => {
                self.value.pop();
            }
            _ => {}
        }
        SecretAction::Continue
    }

    /// The typed secret.
    #[must_use]
    pub fn into_value(self) -> String {
        self.value
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads a secret from the terminal without echoing it.
///
/// Blocks the calling thread. Returns `None` if entry was cancelled.
///
/// # Errors
/// Returns error if the terminal cannot be switched to raw mode or read.
pub fn read_hidden(label: &str) -> io::Result<Option<String>> {
    eprint!("{label}");
    io::stderr().flush()?;

    let raw = RawModeGuard::enable()?;
    let mut input = SecretInput::default();
    let action = loop {
        if let Event::Key(key) = event::read()? {
            match input.handle_key(key) {
                SecretAction::Continue => {}
                action => break action,
            }
        }
    };
    drop(raw);
    eprintln!();

    Ok((action == SecretAction::Submit).then(|| input.into_value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ConfirmOptions;
    use test_case::test_case;

    #[test_case("y" => true)]
    #[test_case("YES\n" => true)]
    #[test_case(" yes " => true)]
    #[test_case("n" => false)]
    #[test_case("" => false)]
    #[test_case("sure" => false)]
    fn test_parse_answer(line: &str) -> bool {
        parse_answer(line)
    }

    #[test]
    fn test_question_marks_destructive() {
        let request = ConfirmRequest {
            id: 1,
            options: ConfirmOptions::new("Delete client", "Remove Lucia Mendez?")
                .with_labels("Delete", "Keep")
                .destructive(),
        };

        assert_eq!(
            question(&request),
            "Delete client: Remove Lucia Mendez? This cannot be undone. [Delete/Keep] "
        );
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_secret_input_editing() {
        let mut input = SecretInput::default();
        for c in "hunterx".chars() {
            assert_eq!(input.handle_key(press(KeyCode::Char(c))), SecretAction::Continue);
        }
        input.handle_key(press(KeyCode::Backspace));
        input.handle_key(press(KeyCode::Char('2')));

        assert_eq!(input.handle_key(press(KeyCode::Enter)), SecretAction::Submit);
        assert_eq!(input.into_value(), "hunter2");
    }

    #[test]
    fn test_secret_input_ctrl_u_clears() {
        let mut input = SecretInput::default();
        input.handle_key(press(KeyCode::Char('x')));
        input.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        input.handle_key(press(KeyCode::Char('y')));

        assert_eq!(input.into_value(), "y");
    }

    #[test_case(press(KeyCode::Esc) ; "escape")]
    #[test_case(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL) ; "ctrl c")]
    #[test_case(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL) ; "ctrl d")]
    fn test_secret_input_cancel(key: KeyEvent) {
        let mut input = SecretInput::default();
        assert_eq!(input.handle_key(key), SecretAction::Cancel);
    }

    #[test]
    fn test_secret_input_ignores_release() {
        let mut input = SecretInput::default();
        let mut release = press(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;

        input.handle_key(release);

        assert_eq!(input.into_value(), "");
    }

    #[tokio::test]
    async fn test_answers_from_input() {
        let store = ConfirmStore::new();
        let first = store.confirm(ConfirmOptions::new("a", "?"));
        let second = store.confirm(ConfirmOptions::new("b", "?"));

        let input: &[u8] = b"yes\nno\n";
        let handle = tokio::spawn(answer_confirmations(store.clone(), input, false));

        assert!(first.await);
        assert!(!second.await);
        handle.abort();
    }

    #[tokio::test]
    async fn test_end_of_input_declines() {
        let store = ConfirmStore::new();
        let answer = store.confirm(ConfirmOptions::new("a", "?"));

        let input: &[u8] = b"";
        answer_confirmations(store, input, false).await;

        assert!(!answer.await);
    }

    #[tokio::test]
    async fn test_assume_yes() {
        let store = ConfirmStore::new();
        let handle = tokio::spawn(answer_confirmations(store.clone(), tokio::io::empty(), true));

        assert!(store.confirm(ConfirmOptions::new("a", "?")).await);
        handle.abort();
    }
}
