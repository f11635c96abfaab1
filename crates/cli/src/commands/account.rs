//! Account commands (signup, login).

use clubhouse_core::ClubId;

/// Create an account, open a session, and record the club scope.
#[allow(clippy::print_stdout)]
pub async fn signup(name: &str, email: &str, club: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (_, sessions) = super::connect()?;
    let password = super::prompt_password("Choose a password")?;

    let identity = sessions
        .signup(name, email, &password, &ClubId::new(club))
        .await?;

    println!("Welcome, {}! You joined club {club}.", identity.display_name);
    sessions.logout().await;
    Ok(())
}

/// Verify credentials and print the resulting identity.
#[allow(clippy::print_stdout)]
pub async fn login(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (_, sessions) = super::connect()?;
    let password = super::prompt_password("Password")?;

    let identity = sessions.login(email, &password).await?;

    println!("Logged in as {} <{}>", identity.display_name, identity.email);
    match identity.club_id() {
        Some(club) => println!("Club scope: {club}"),
        None => println!("No club scope recorded; you will see the full directory."),
    }

    sessions.logout().await;
    Ok(())
}
