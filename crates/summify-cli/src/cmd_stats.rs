use std::path::Path;

use summify_client::{BackendClient, ClientConfig, Session, Statistics};

/// `summify stats`
pub fn execute(store_root: &Path, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = summify_store::read_config(&summify_store::config_path(store_root))?;
    let user = crate::resolve_user(&config, user)?;
    let client = BackendClient::new(ClientConfig::resolve(&config), Session::resolve(&config));
    let stats = client.fetch_statistics(&user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_text(&stats));
    }
    Ok(())
}

fn render_text(stats: &Statistics) -> String {
    let rows = [
        ("Total quizzes taken:", stats.quizzes_taken),
        ("Total PDFs summarized:", stats.pdfs_summarized),
        ("Total YouTube videos summarized:", stats.yt_summaries_generated),
    ];
    rows.iter()
        .map(|(label, value)| format!("{label:<34}{value}\n"))
        .collect()
}
