//! Fixed outbound links and the system browser opener

use arboard::Clipboard;
use std::process::{Command, Stdio};
use tracing::{error, info, warn};

pub const RESULTS_PDF_URL: &str = "https://natboard.edu.in/natboard-data/pdf/NEETPG2025RESULT/NEET-PG%202025%20Notice%20Board%20Result%20-%2019.08.2025%20-%20DS.pdf";
pub const MCC_COUNSELLING_URL: &str = "https://mcc.nic.in/pg-medical-counselling/";
pub const NBE_WEBSITE_URL: &str = "https://nbe.edu.in/";

/// A labelled external destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalLink {
    pub label: &'static str,
    pub url: &'static str,
}

pub const CHECK_RESULTS: ExternalLink = ExternalLink {
    label: "Check Your NEET PG Results",
    url: RESULTS_PDF_URL,
};

pub const START_COUNSELLING: ExternalLink = ExternalLink {
    label: "Start Counselling Registration",
    url: MCC_COUNSELLING_URL,
};

pub const MCC_PORTAL: ExternalLink = ExternalLink {
    label: "MCC Counselling Portal",
    url: MCC_COUNSELLING_URL,
};

pub const NBE_WEBSITE: ExternalLink = ExternalLink {
    label: "NBE Official Website",
    url: NBE_WEBSITE_URL,
};

/// What happened when a link was activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Opened,
    /// The browser could not be launched; the URL went to the clipboard
    Copied,
    /// Neither worked; the URL has to be copied by hand
    Failed(String),
}

impl LinkOutcome {
    /// Text for the message dialog, if the user needs to be told anything
    pub fn message(&self, link: &ExternalLink) -> Option<String> {
        match self {
            Self::Opened => None,
            Self::Copied => Some(format!(
                "Could not open a browser.\n{} was copied to the clipboard:\n{}",
                link.label, link.url
            )),
            Self::Failed(reason) => Some(format!(
                "Could not open {} ({}).\nVisit: {}",
                link.label, reason, link.url
            )),
        }
    }
}

/// Platform command that hands a URL to the default browser
fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Opens external links, falling back to the clipboard
pub struct LinkService;

/// Run an opener to completion; a non-zero exit counts as a failure
fn run_opener(mut cmd: Command) -> std::io::Result<()> {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("opener exited with {}", status)))
    }
}

impl LinkService {
    fn launch(url: &str) -> std::io::Result<()> {
        run_opener(opener_command(url))
    }

    fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
        Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()))
    }

    /// Open the link in the system browser, falling back to the clipboard
    pub fn open(link: &ExternalLink) -> LinkOutcome {
        Self::open_with(link, Self::launch, Self::copy_to_clipboard)
    }

    fn open_with<L, C, E1, E2>(link: &ExternalLink, launch: L, copy: C) -> LinkOutcome
    where
        L: FnOnce(&str) -> Result<(), E1>,
        C: FnOnce(&str) -> Result<(), E2>,
        E1: std::fmt::Display,
        E2: std::fmt::Display,
    {
        match launch(link.url) {
            Ok(()) => {
                info!("Opened {} in browser", link.url);
                LinkOutcome::Opened
            }
            Err(e) => {
                warn!("Failed to launch browser for {}: {}", link.url, e);
                match copy(link.url) {
                    Ok(()) => LinkOutcome::Copied,
                    Err(e) => {
                        error!("Failed to copy to clipboard: {}", e);
                        LinkOutcome::Failed(e.to_string())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_success_has_no_message() {
        let outcome = LinkService::open_with(&NBE_WEBSITE, |_| Ok::<_, String>(()), |_| Ok::<_, String>(()));
        assert_eq!(outcome, LinkOutcome::Opened);
        assert_eq!(outcome.message(&NBE_WEBSITE), None);
    }

    #[test]
    fn test_falls_back_to_clipboard() {
        let mut copied = String::new();
        let outcome = LinkService::open_with(
            &CHECK_RESULTS,
            |_| Err("no display"),
            |url| {
                copied = url.to_string();
                Ok::<_, String>(())
            },
        );
        assert_eq!(outcome, LinkOutcome::Copied);
        assert_eq!(copied, RESULTS_PDF_URL);
        assert!(outcome.message(&CHECK_RESULTS).unwrap().contains("clipboard"));
    }

    #[cfg(unix)]
    #[test]
    fn test_opener_exiting_non_zero_falls_back_to_clipboard() {
        let mut copied = false;
        let outcome = LinkService::open_with(
            &START_COUNSELLING,
            |_| {
                let mut cmd = Command::new("sh");
                cmd.args(["-c", "exit 3"]);
                run_opener(cmd)
            },
            |_| {
                copied = true;
                Ok::<_, String>(())
            },
        );
        assert_eq!(outcome, LinkOutcome::Copied);
        assert!(copied);
    }

    #[cfg(unix)]
    #[test]
    fn test_opener_exiting_zero_is_opened() {
        let outcome = LinkService::open_with(
            &NBE_WEBSITE,
            |_| run_opener(Command::new("true")),
            |_| Err("clipboard should not be touched"),
        );
        assert_eq!(outcome, LinkOutcome::Opened);
    }

    #[test]
    fn test_both_fail_reports_url() {
        let outcome = LinkService::open_with(&MCC_PORTAL, |_| Err("no browser"), |_| Err("no clipboard"));
        assert_eq!(outcome, LinkOutcome::Failed("no clipboard".into()));
        assert!(outcome.message(&MCC_PORTAL).unwrap().contains(MCC_COUNSELLING_URL));
    }
}
