use std::{io::Write, path::PathBuf, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use client_core::{
    gesture::GestureOutcome, navigation::KeyCommand, session::Credentials, DiscoveryClient,
};
use shared::{
    catalog::format_date,
    domain::{Event, EventId},
};
use storage::{KeyValueStore, MemoryStore, Storage, UnavailableStore};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{Command, ReplLine};

#[derive(Parser, Debug)]
#[command(about = "Swipe through events and build a shortlist")]
struct Args {
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Keep everything in memory; nothing is written to disk.
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(&args.config);
    if let Some(url) = args.database_url {
        settings.database_url = url;
    }
    if let Some(path) = args.catalog {
        settings.catalog_path = Some(path);
    }

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = Arc::new(config::load_catalog(settings.catalog_path.as_deref())?);
    let store = open_store(&settings.database_url, args.ephemeral).await;
    info!(events = catalog.len(), "catalog loaded");

    let mut client = DiscoveryClient::new(catalog, store);
    spawn_event_logger(&client);

    if let Some(user) = client.restore_session().await {
        println!("Welcome back, {}.", user.name);
    }
    client.restore_app_state(Utc::now().timestamp_millis()).await;

    println!("{}", ReplLine::command().render_help());
    run_repl(&mut client).await?;

    client.save_app_state(Utc::now().timestamp_millis()).await;
    Ok(())
}

async fn open_store(database_url: &str, ephemeral: bool) -> Arc<dyn KeyValueStore> {
    if ephemeral {
        return Arc::new(MemoryStore::new());
    }

    let database_url = config::normalize_database_url(database_url);
    match open_durable(&database_url).await {
        Ok(storage) => {
            info!(database_url = %database_url, "opened durable store");
            Arc::new(storage)
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "storage unavailable; changes will not be saved");
            Arc::new(UnavailableStore::new(err.to_string()))
        }
    }
}

async fn open_durable(database_url: &str) -> Result<Storage> {
    let storage = Storage::new(database_url)
        .await
        .with_context(|| format!("failed to open '{database_url}'"))?;
    storage.health_check().await?;
    Ok(storage)
}

fn spawn_event_logger(client: &DiscoveryClient) {
    let mut events = client.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(?event, "client event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event logger lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

async fn run_repl(client: &mut DiscoveryClient) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}> ", client.current_view().as_str());
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            return Ok(());
        };
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            return Ok(());
        }
        execute(client, command).await;
    }
}

async fn execute(client: &mut DiscoveryClient, command: Command) {
    match command {
        Command::Login { email, name } => {
            let mut credentials = Credentials::new(email, "");
            if !name.is_empty() {
                credentials = credentials.with_name(name.join(" "));
            }
            match client.sign_in(credentials).await {
                Ok(user) => println!("Signed in as {} <{}>.", user.name, user.email),
                Err(err) => println!("{err}"),
            }
        }
        Command::Logout => {
            client.sign_out().await;
            println!("Signed out.");
        }
        Command::Cards => print_cards(client),
        Command::Drag { dx } => {
            if !client.pointer_down(0, 0.0, 0.0) {
                println!("Nothing to drag. Sign in first.");
                return;
            }
            client.pointer_move(dx, 0.0);
            match client.pointer_up(Instant::now()).await {
                Some(GestureOutcome::Cancel) => println!("Not far enough, card snapped back."),
                Some(outcome) => {
                    println!("{}", outcome.as_str());
                    settle(client).await;
                }
                None => {}
            }
        }
        Command::Save => {
            let decided = client.save_current(Instant::now()).await;
            after_decision(client, decided).await;
        }
        Command::Reject => {
            let decided = client.reject_current(Instant::now()).await;
            after_decision(client, decided).await;
        }
        Command::Key { key: name } => match KeyCommand::from_key(&name) {
            Some(key) => {
                if client.handle_key(key, Instant::now()).await {
                    settle(client).await;
                }
            }
            None => println!("Only ArrowLeft and ArrowRight are bound."),
        },
        Command::Shortlist => print_shortlist(client.shortlist()),
        Command::Remove { event_id } => {
            let event_id = EventId(event_id);
            if !client.remove_from_shortlist(event_id).await {
                println!("Event {event_id} is not on the shortlist.");
            }
        }
        Command::Clear => {
            client.clear_shortlist();
            println!("Shortlist cleared.");
            print_cards(client);
        }
        Command::Tags => {
            let groups = client.events_by_tag();
            for (tag, count) in client.tag_counts() {
                let titles: Vec<_> = groups
                    .get(&tag)
                    .map(|events| events.iter().map(|event| event.title.as_str()).collect())
                    .unwrap_or_default();
                println!("{tag} ({count}): {}", titles.join(", "));
            }
        }
        Command::Profile => print_profile(client),
        Command::View { view } => client.switch_view(view),
        Command::Search { query } => {
            for event in client.catalog().search(&query.join(" ")) {
                println!("{}", describe(event));
            }
        }
        Command::Status => {
            let status = client.status();
            println!(
                "signed_in={} view={} cursor={} shortlist={} tags={}",
                status.signed_in,
                status.current_view.as_str(),
                status.cursor,
                status.shortlist_count,
                status.unique_tags_count
            );
        }
        Command::Quit => {}
    }
}

async fn after_decision(client: &mut DiscoveryClient, decided: bool) {
    if decided {
        settle(client).await;
    } else {
        println!("No card to decide. Sign in first.");
    }
}

/// Waits out the exit animation, then lets the deck advance.
async fn settle(client: &mut DiscoveryClient) {
    if let Some(due) = client.next_deadline() {
        tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await;
        client.tick(Instant::now());
    }
    print_cards(client);
}

fn print_cards(client: &DiscoveryClient) {
    if !client.is_signed_in() {
        println!("Sign in to start swiping.");
        return;
    }
    for (slot, event) in client.visible_cards().iter().enumerate() {
        let marker = if slot == 0 { ">" } else { " " };
        println!("{marker} {}", describe(event));
    }
}

fn print_shortlist(entries: &[Event]) {
    if entries.is_empty() {
        println!("Your shortlist is empty.");
        return;
    }
    for event in entries {
        println!("{}  [{}]", describe(event), event.tags.join(", "));
    }
}

fn print_profile(client: &DiscoveryClient) {
    let Some(profile) = client.profile(Utc::now()) else {
        println!("Sign in to see your profile.");
        return;
    };
    println!(
        "({}) {} <{}>",
        profile.avatar_initial, profile.display_name, profile.email
    );
    println!(
        "{} saved events, {} tags",
        profile.total_events, profile.total_tags
    );
    for stat in &profile.tag_stats {
        println!("  {}: {}", stat.tag, stat.count);
    }
    for entry in &profile.timeline {
        println!(
            "  {} {} {} ({})",
            entry.record.action.icon(),
            entry.record.action.label(),
            entry.record.event_title,
            entry.relative_time
        );
    }
}

fn describe(event: &Event) -> String {
    format!(
        "#{} {} {} | {} {} | {} | {}",
        event.id,
        event.emoji,
        event.title,
        format_date(&event.date),
        event.time,
        event.location,
        event.price
    )
}
