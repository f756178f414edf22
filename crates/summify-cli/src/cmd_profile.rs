use std::path::Path;

use clap::Subcommand;
use summify_client::{BackendClient, ClientConfig, Profile, Session};

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ProfileCmd {
    /// Update profile fields; fields not given keep their current value
    Set {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

// ── Dispatch ──

pub fn run(
    cmd: Option<ProfileCmd>,
    store_root: &Path,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = summify_store::read_config(&summify_store::config_path(store_root))?;
    let user = crate::resolve_user(&config, user)?;
    let client = BackendClient::new(ClientConfig::resolve(&config), Session::resolve(&config));

    let profile = match cmd {
        None => client.fetch_profile(&user)?,
        Some(ProfileCmd::Set {
            username,
            bio,
            location,
        }) => {
            if username.is_none() && bio.is_none() && location.is_none() {
                anyhow::bail!("nothing to update: pass --username, --bio or --location");
            }
            let current = client.fetch_profile(&user)?;
            let wanted = merge(current, username, bio, location);
            client.update_profile(&user, &wanted)?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!("{}", render_text(&profile));
    }
    Ok(())
}

// ── Helpers ──

/// The backend replaces all three fields at once, so unchanged ones are
/// carried over from `current`.
fn merge(
    current: Profile,
    username: Option<String>,
    bio: Option<String>,
    location: Option<String>,
) -> Profile {
    Profile {
        username: username.unwrap_or(current.username),
        bio: bio.unwrap_or(current.bio),
        location: location.unwrap_or(current.location),
    }
}

fn render_text(profile: &Profile) -> String {
    let rows = [
        ("Username:", &profile.username),
        ("Bio:", &profile.bio),
        ("Location:", &profile.location),
    ];
    rows.iter()
        .map(|(label, value)| {
            let value = if value.is_empty() { "-" } else { value.as_str() };
            format!("{label:<10}{value}\n")
        })
        .collect()
}
