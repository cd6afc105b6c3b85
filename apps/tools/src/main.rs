use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{ActivityRecord, CurrentUser, Event, UserId};
use storage::{keys, load_json, KeyValueStore, Storage};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/swipe.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every stored key.
    ListKeys,
    /// Print the raw JSON stored under a key.
    Show { key: String },
    /// List users that have saved data.
    Users,
    /// Print a user's shortlist and recent activity.
    DumpUser { user_id: i64 },
    /// Delete a user's shortlist and activity, and sign them out.
    ClearUser { user_id: i64 },
    /// Delete every key starting with a prefix, e.g. `userActivity_`.
    Purge { prefix: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::ListKeys => {
            for key in storage.keys().await? {
                println!("{key}");
            }
        }
        Command::Show { key } => {
            let Some(raw) = storage.get(&key).await? else {
                bail!("no value stored under '{key}'");
            };
            let pretty = serde_json::from_str::<serde_json::Value>(&raw)
                .and_then(|value| serde_json::to_string_pretty(&value))
                .unwrap_or(raw);
            println!("{pretty}");
        }
        Command::Users => {
            let owners: BTreeSet<UserId> = storage
                .keys()
                .await?
                .iter()
                .filter_map(|key| keys::owner_of(key))
                .collect();
            let signed_in: Option<CurrentUser> = load_json(&storage, keys::CURRENT_USER).await?;
            for owner in owners {
                let marker = match &signed_in {
                    Some(user) if user.id == owner => format!(" (signed in as {})", user.email),
                    _ => String::new(),
                };
                println!("{owner}{marker}");
            }
        }
        Command::DumpUser { user_id } => {
            let user_id = UserId(user_id);
            let shortlist: Vec<Event> = load_json(&storage, &keys::shortlist(user_id))
                .await
                .context("reading shortlist")?
                .unwrap_or_default();
            let activity: Vec<ActivityRecord> =
                load_json(&storage, &keys::user_activity(user_id))
                    .await
                    .context("reading activity")?
                    .unwrap_or_default();

            println!("shortlist ({}):", shortlist.len());
            for event in &shortlist {
                println!("  {} {} [{}]", event.id, event.title, event.tags.join(", "));
            }
            println!("activity ({}):", activity.len());
            for record in &activity {
                println!(
                    "  {} {} {} {}",
                    record.timestamp.to_rfc3339(),
                    record.action.icon(),
                    record.action.label(),
                    record.event_title
                );
            }
        }
        Command::ClearUser { user_id } => {
            let user_id = UserId(user_id);
            for key in keys::user_scoped(user_id) {
                storage.remove(&key).await?;
            }
            let signed_in: Option<CurrentUser> = load_json(&storage, keys::CURRENT_USER)
                .await
                .unwrap_or(None);
            if signed_in.is_some_and(|user| user.id == user_id) {
                storage.remove(keys::CURRENT_USER).await?;
            }
            println!("cleared data for user_id={user_id}");
        }
        Command::Purge { prefix } => {
            let removed = storage.remove_prefix(&prefix).await?;
            println!("removed {removed} keys");
        }
    }

    Ok(())
}
