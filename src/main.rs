use anyhow::{anyhow, bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kanban_client::api::HttpBoardApi;
use kanban_client::config::Config;
use kanban_client::domain::{BoardState, CardId, ProjectId};
use kanban_client::services::{BoardReconciler, BoardService, MoveOutcome, MoveRequest};

const USAGE: &str = "usage:
  kanban-client whoami
  kanban-client projects
  kanban-client show <project_id>
  kanban-client move <project_id> <card_id> <dest_board_id> [dest_index]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,kanban_client=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).ok_or_else(|| anyhow!(USAGE))?;

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env, using defaults: {}", e);
        Config::default()
    });
    let (email, password) = match (&config.email, &config.password) {
        (Some(email), Some(password)) => (email.clone(), password.clone()),
        _ => bail!("KANBAN_EMAIL and KANBAN_PASSWORD must be set"),
    };

    let api = HttpBoardApi::from_config(&config)?;
    let session = api
        .login(&email, &password)
        .await
        .map_err(|e| anyhow!("login failed: {}", e.user_message()))?;
    tracing::info!(api = api.base_url(), "Signed in");

    match command {
        "whoami" => {
            let user = api.current_user(&session).await?;
            let role = if user.is_owner() { "owner" } else { "member" };
            println!("{} <{}> ({})", user.display_name(), user.email, role);
        }
        "projects" => {
            let listing = api.list_projects(&session).await?;
            if listing.is_empty() {
                println!("No projects");
            }
            for project in &listing.owner_projects {
                println!("[{}] {} (owner)", project.id, project.title);
            }
            for project in &listing.member_projects {
                println!("[{}] {}", project.id, project.title);
            }
        }
        "show" => {
            let project_id: ProjectId = parse_arg(&args, 1, "project_id")?;
            let (project, state) = BoardService::load_project(&api, &session, project_id).await?;
            println!("{} ({})", project.title, project.status);
            print_board(&state);
        }
        "move" => {
            let project_id: ProjectId = parse_arg(&args, 1, "project_id")?;
            let card_id: CardId = parse_arg(&args, 2, "card_id")?;
            let dest_board_id = parse_arg(&args, 3, "dest_board_id")?;

            let (_, state) = BoardService::load_project(&api, &session, project_id).await?;
            let (source_board_id, source_index) = state
                .location(card_id)
                .ok_or_else(|| anyhow!("card {} is not on project {}", card_id, project_id))?;
            let dest_index = match args.get(4) {
                Some(_) => parse_arg(&args, 4, "dest_index")?,
                None => usize::MAX,
            };

            let mut reconciler = BoardReconciler::new(state);
            let request = MoveRequest {
                card_id,
                source_board_id,
                source_index,
                dest_board_id,
                dest_index,
            };

            match reconciler.move_card(&api, &session, request).await? {
                MoveOutcome::NoOp => println!("Nothing to move"),
                MoveOutcome::Confirmed => println!("Moved card {}", card_id),
                MoveOutcome::RolledBack(_) => {
                    for notice in reconciler.take_notices() {
                        eprintln!("{}", notice.message);
                    }
                }
            }
            print_board(reconciler.state());
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}

fn parse_arg<T>(args: &[String], idx: usize, name: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(idx)
        .ok_or_else(|| anyhow!("missing <{}>\n{}", name, USAGE))?;
    raw.parse().with_context(|| format!("invalid <{}>: {}", name, raw))
}

fn print_board(state: &BoardState) {
    for board in state.boards() {
        println!("\n[{}] {}", board.id, board.title);
        for card in state.cards_in(board.id).unwrap_or_default() {
            let due = card
                .due_date
                .map(|d| format!("  due {}", d.format("%d.%m")))
                .unwrap_or_default();
            println!("  #{:<6} {}{}", card.id, card.title, due);
        }
    }
}
