//! Roster browsing commands.

use console::style;
use serde_json::{Map, Value};

use clubhouse_core::UserId;
use clubhouse_directory::backend::Backend;
use clubhouse_directory::models::{Identity, MemberRecord, PREF_CLUB_ID};
use clubhouse_directory::preferences::ThemeState;
use clubhouse_directory::services::directory::{DirectoryStore, RosterStatus};
use clubhouse_directory::services::session::SessionManager;
use clubhouse_directory::sources::{BundledRoster, DocumentSource};

/// List the members visible to the caller.
pub async fn roster(
    email: Option<&str>,
    search: Option<&str>,
    bundled: bool,
    club: Option<&str>,
    theme: &ThemeState,
) -> Result<(), Box<dyn std::error::Error>> {
    if bundled {
        let store = DirectoryStore::new(BundledRoster::load()?);
        store.reload(Some(&demo_identity(club))).await;
        print_roster(&store, search, theme);
        return Ok(());
    }

    let (store, sessions) = login_and_load(email).await?;
    print_roster(&store, search, theme);
    sessions.logout().await;
    Ok(())
}

/// Show one member's profile.
#[allow(clippy::print_stdout)]
pub async fn detail(
    id: &str,
    email: Option<&str>,
    bundled: bool,
    club: Option<&str>,
    theme: &ThemeState,
) -> Result<(), Box<dyn std::error::Error>> {
    let member = if bundled {
        let store = DirectoryStore::new(BundledRoster::load()?);
        store.reload(Some(&demo_identity(club))).await;
        store.member_by_id(id)
    } else {
        let (store, sessions) = login_and_load(email).await?;
        let member = store.member_by_id(id);
        sessions.logout().await;
        member
    };

    match member {
        Some(member) => print_member(&member, theme),
        None => println!("No member with id {id}."),
    }
    Ok(())
}

/// Log in against the hosted backend and load the caller's roster.
async fn login_and_load(
    email: Option<&str>,
) -> Result<(DirectoryStore<Backend>, SessionManager<Backend>), Box<dyn std::error::Error>> {
    let email = email.ok_or("an email is required unless --bundled is set")?;

    let (backend, sessions) = super::connect()?;
    let password = super::prompt_password("Password")?;
    sessions.login(email, &password).await?;

    let store = DirectoryStore::new(backend);
    store.reload(sessions.identity().as_ref()).await;
    Ok((store, sessions))
}

/// Stand-in identity for bundled browsing; early builds shipped the roster
/// without a backend to authenticate against.
fn demo_identity(club: Option<&str>) -> Identity {
    let mut preferences = Map::new();
    if let Some(club) = club {
        preferences.insert(PREF_CLUB_ID.to_owned(), Value::from(club));
    }

    Identity {
        id: UserId::new("demo"),
        display_name: "Demo".to_owned(),
        email: String::new(),
        created_at: None,
        preferences,
    }
}

#[allow(clippy::print_stdout)]
fn print_roster<S: DocumentSource>(
    store: &DirectoryStore<S>,
    search: Option<&str>,
    theme: &ThemeState,
) {
    match store.status() {
        RosterStatus::Failed(reason) => {
            println!("Could not load the roster: {reason}");
            return;
        }
        RosterStatus::Empty => {
            println!("No members to show.");
            return;
        }
        RosterStatus::Loading | RosterStatus::Loaded => {}
    }

    let members = search.map_or_else(|| store.members(), |term| store.search(term));
    if members.is_empty() {
        println!("No members match that search.");
        return;
    }

    println!("{}", heading("Members", theme));
    for member in &members {
        let mut line = member.full_name();
        if !member.classification.is_empty() {
            line.push_str(" - ");
            line.push_str(&member.classification);
        }
        match &member.officer_title {
            Some(title) => println!("  {line} {}", badge(title, theme)),
            None => println!("  {line}"),
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_member(member: &MemberRecord, theme: &ThemeState) {
    println!("{}", heading(&member.full_name(), theme));
    if let Some(title) = &member.officer_title {
        println!("  {}", badge(title, theme));
    }
    if !member.classification.is_empty() {
        println!("  Classification: {}", member.classification);
    }
    if !member.relationship_status.is_empty() {
        println!("  Relationship: {}", member.relationship_status);
    }
    if member.show_email && !member.email.is_empty() {
        println!("  Email: {}", member.email);
    }
    if member.show_phone && !member.phone.is_empty() {
        println!("  Phone: {}", member.phone);
    }
    println!("  Photo: {}", member.image_url);
}

fn heading(text: &str, theme: &ThemeState) -> String {
    if theme.is_dark() {
        style(text).bold().white().to_string()
    } else {
        style(text).bold().black().to_string()
    }
}

fn badge(title: &str, theme: &ThemeState) -> String {
    let badge = format!("[{title}]");
    if theme.is_dark() {
        style(badge).yellow().to_string()
    } else {
        style(badge).blue().to_string()
    }
}
