//! Line-oriented console front-end.

use crate::commands::{fields, session};
use crate::provider::LocalIdentityProvider;
use crate::state::AppState;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  signin <email>   sign in with an account
  signout          end the session
  copy <key>       copy a field (or 'aggregate' for all fields)
  dismiss          clear the last sign-in error
  show             print the current view
  help             print this help
  quit             exit
";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignIn(Option<String>),
    SignOut,
    Copy(String),
    Dismiss,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let mut words = line.split_whitespace();
        let verb = words.next()?;
        let argument = words.next().map(str::to_string);

        let command = match verb {
            "signin" | "login" => Ok(Self::SignIn(argument)),
            "signout" | "logout" => Ok(Self::SignOut),
            "copy" => argument
                .map(Self::Copy)
                .ok_or_else(|| "usage: copy <key>".to_string()),
            "dismiss" => Ok(Self::Dismiss),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}', type 'help'")),
        };
        Some(command)
    }
}

/// Read commands from `input` until EOF or `quit`, printing to `output`.
pub async fn run_console<R, W>(
    state: &AppState,
    provider: &LocalIdentityProvider,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(HELP.as_bytes()).await?;
    write_view(state, &mut output).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(message)) => {
                output.write_all(format!("{message}\n").as_bytes()).await?;
                continue;
            }
        };
        debug!(?command, "console command");

        match command {
            Command::SignIn(account) => {
                if let Some(account) = account {
                    provider.choose_account(account);
                }
                session::sign_in(state).await;
            }
            Command::SignOut => {
                if let Err(err) = session::sign_out(state).await {
                    let notice = format!("! {}\n", err.message);
                    output.write_all(notice.as_bytes()).await?;
                }
            }
            Command::Copy(key) => {
                let notice = match fields::copy_field(state, &key).await {
                    Ok(feedback) => format!("Copied {}.\n", feedback.key),
                    Err(err) => format!("! {}\n", err.message),
                };
                output.write_all(notice.as_bytes()).await?;
            }
            Command::Dismiss => {
                session::dismiss_error(state);
            }
            Command::Show => {}
            Command::Help => {
                output.write_all(HELP.as_bytes()).await?;
                continue;
            }
            Command::Quit => break,
        }

        write_view(state, &mut output).await?;
    }

    output.flush().await?;
    Ok(())
}

async fn write_view<W>(state: &AppState, output: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let view = fields::access_view(state);
    output.write_all(format!("\n{view}\n").as_bytes()).await?;
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use paygate_clipboard::{Clipboard, ClipboardError};
    use paygate_core::AppConfig;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Mutex<Option<String>>,
    }

    #[async_trait]
    impl Clipboard for MemoryClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    fn console_state() -> (AppState, Arc<LocalIdentityProvider>, Arc<MemoryClipboard>) {
        let mut config = AppConfig::default();
        config.access.allowlist = vec!["tung.42@gmail.com".to_string()];

        let clipboard = Arc::new(MemoryClipboard::default());
        let mut provider = None;
        let state = AppState::new(config, clipboard.clone(), |publisher| {
            let local = Arc::new(LocalIdentityProvider::new(publisher));
            provider = Some(Arc::clone(&local));
            local
        })
        .expect("valid config");

        (state, provider.expect("provider built"), clipboard)
    }

    async fn run_script(script: &str) -> (String, Arc<MemoryClipboard>) {
        let (state, provider, clipboard) = console_state();
        let mut output = Vec::new();
        run_console(&state, &provider, script.as_bytes(), &mut output)
            .await
            .expect("console run");
        (String::from_utf8(output).expect("utf-8 output"), clipboard)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(
            Command::parse("signin tung.42@gmail.com"),
            Some(Ok(Command::SignIn(Some("tung.42@gmail.com".to_string()))))
        );
        assert_eq!(Command::parse("signin"), Some(Ok(Command::SignIn(None))));
        assert_eq!(
            Command::parse("copy bankName"),
            Some(Ok(Command::Copy("bankName".to_string())))
        );
        assert!(matches!(Command::parse("copy"), Some(Err(_))));
        assert!(matches!(Command::parse("dance"), Some(Err(_))));
        assert_eq!(Command::parse("quit"), Some(Ok(Command::Quit)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_allowed_flow() {
        let (output, clipboard) =
            run_script("signin tung.42@gmail.com\ncopy accountNumber\nquit\n").await;

        assert!(output.contains("Bank Information of Pham Tung"));
        assert!(output.contains("Copied accountNumber."));
        assert!(output.contains("Account Number: 19027906069012  [Copied!]"));
        assert_eq!(
            clipboard.contents.lock().unwrap().as_deref(),
            Some("19027906069012")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_denied_flow() {
        let (output, clipboard) =
            run_script("signin eve@example.com\ncopy bankName\nsignout\n").await;

        assert!(output.contains("Access denied. eve@example.com is not authorized"));
        assert!(output.contains("! Sign in with an authorized account"));
        assert!(clipboard.contents.lock().unwrap().is_none());
        assert!(output
            .trim_end()
            .ends_with("Sign in to view this information: signin <email>"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_sign_in_without_account() {
        let (output, _clipboard) = run_script("signin\ndismiss\n").await;
        assert!(output.contains("! Sign-in was cancelled before it finished."));
    }
}
