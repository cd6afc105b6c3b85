use clap::{Parser, Subcommand};
use shared::domain::View;

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(
    name = "swipe",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]"
)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in; the password is not checked.
    Login {
        email: String,
        /// Display name, defaults to the part of the email before '@'.
        name: Vec<String>,
    },
    /// Sign out.
    Logout,
    /// Show the visible stack.
    Cards,
    /// Drag the top card horizontally and release.
    Drag {
        #[arg(allow_negative_numbers = true)]
        dx: f64,
    },
    /// Save the top card without dragging.
    Save,
    /// Skip the top card without dragging.
    Reject,
    /// Send a key press (ArrowLeft or ArrowRight).
    Key { key: String },
    /// List saved events.
    Shortlist,
    /// Remove an event from the shortlist.
    Remove { event_id: i64 },
    /// Empty the shortlist and go back to the first card.
    Clear,
    /// Tag counts and groups.
    Tags,
    /// Profile summary and recent activity.
    Profile,
    /// Switch to discover, shortlist or profile.
    View {
        #[arg(value_parser = parse_view)]
        view: View,
    },
    /// Search the catalog.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    Status,
    #[command(visible_alias = "exit")]
    Quit,
}

fn parse_view(raw: &str) -> Result<View, String> {
    View::parse(raw).ok_or_else(|| format!("unknown view '{raw}'"))
}

/// Parses one prompt line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    ReplLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}
