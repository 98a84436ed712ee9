//! Mock API with seeded data, driven through the page controllers
//!
//! This demo:
//! - Starts the in-memory mock API
//! - Seeds a user, a player and two profiles through the typed client
//! - Opens the players list page for a coach and prints its rows
//! - Keeps serving until Ctrl+C
//!
//! Run with `cargo run --example mock_api`, optionally passing a YAML
//! configuration path.

use anyhow::Result;
use this_admin::prelude::*;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,this_admin=debug")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AdminConfig::from_yaml_file(&path)?,
        None => AdminConfig::default_config(),
    };

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    let state = MockApiState::new(
        InMemoryStore::with_builtin_relations(),
        config.registry(),
        this_admin::entities::schema_validator(),
    );
    let server = tokio::spawn(this_admin::server::serve(listener, state));

    let api = ApiClient::from_config(&config.api)?;
    seed(&api).await?;

    let access = authorize_page(
        Arc::new(config.access_guard()),
        Subject::user("demo-coach", ["coach"]),
        AccessService::Project,
        Player::ENTITY,
        AccessOperation::Read,
    )?;
    let players: Arc<dyn ResourceService<Player>> = Arc::new(api.resource::<Player>());
    let mut page = ListPage::open(players, access)?;
    page.load().await;

    println!("Players ({:?}):", page.phase());
    let labels: Vec<&str> = page.visible_columns().iter().map(|c| c.label).collect();
    println!("  columns: {}", labels.join(", "));
    for player in page.rows() {
        let cells = page.cells(player)?;
        println!("  {:?} {:?}", player.id, cells);
    }
    println!("\nServing on http://127.0.0.1:3000, press Ctrl+C to stop");

    server.await??;
    Ok(())
}

async fn seed(api: &ApiClient) -> Result<()> {
    let users = api.resource::<User>();
    let user = users
        .create(&serde_json::to_value(User::new("kid@academy.org", "roq-1", "tenant-1"))?)
        .await?;
    let user_id = user.id.unwrap_or_default();

    let players = api.resource::<Player>();
    let player = players
        .create(&serde_json::to_value(Player::new(&user_id))?)
        .await?;
    let player_id = player.id.unwrap_or_default();

    let profiles = api.resource::<PlayerProfile>();
    for notes in ["Left-footed", "Prefers the wing"] {
        profiles
            .create(&serde_json::to_value(PlayerProfile::new(&player_id, Some(notes)))?)
            .await?;
    }

    tracing::info!(user_id = %user_id, player_id = %player_id, "seeded demo data");
    Ok(())
}
