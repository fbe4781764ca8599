use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use database::{DatabaseConfig, MatchRecord, StatsDatabase};
use itertools::Itertools;
use serde_json::{json, Value};
use stats::{Catalog, Map, Page, Player, Server, StatsConfig, StatsError, StatsReader};
use types::GameVersion;

#[derive(Parser, Debug)]
struct Params {
    /// SQLite database path or `sqlite:` URL.
    #[arg(short, long)]
    database: Option<String>,

    /// YAML file with read-layer settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    highscore_results: Option<usize>,

    /// Apply schema migrations before querying.
    #[arg(long)]
    migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    page: usize,

    #[arg(long, default_value_t = 20)]
    per_page: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    Players(PageArgs),
    Player {
        handle: String,
        #[command(flatten)]
        games: PageArgs,
        #[arg(long)]
        weapons: bool,
    },
    Servers(PageArgs),
    Server {
        handle: String,
        #[command(flatten)]
        games: PageArgs,
    },
    Maps(PageArgs),
    Map {
        name: String,
        #[command(flatten)]
        games: PageArgs,
    },
    Weapons,
    Weapon {
        name: String,
    },
}

fn game_json(version: &GameVersion, game: &MatchRecord) -> Value {
    let mode = version
        .modes
        .get(game.mode as usize)
        .copied()
        .unwrap_or("unknown");
    json!({
        "id": game.id,
        "time": game.time,
        "map": game.map,
        "mode": mode,
        "mutators": version.mutator_names(mode, game.mutators).iter().join("-"),
        "timeplayed": game.timeplayed,
        "uniqueplayers": game.uniqueplayers,
    })
}

fn games_json(version: &GameVersion, games: Page<MatchRecord>) -> Value {
    json!(games.map(|g| game_json(version, &g)))
}

async fn run(args: Params) -> Result<Value, StatsError> {
    let config = StatsConfig::from_cli_or_yaml_file(args.highscore_results, args.config.as_deref())?;
    let pool = DatabaseConfig::from_cli_or_env_or_yaml(args.database, config.database_url.clone())
        .create_pool()
        .await?;
    if args.migrate {
        StatsDatabase::new(pool.clone()).run_migrations().await?;
    }
    let reader = StatsReader::new(pool, config)?;
    let version = reader.version();

    let output = match args.command {
        Command::Players(p) => json!(reader.list::<Player>(p.page, p.per_page).await?),
        Command::Player {
            handle,
            games,
            weapons,
        } => {
            let detail = reader
                .player_detail(&handle, games.page, games.per_page, weapons)
                .await?;
            let mut output = json!({
                "handle": detail.player.handle,
                "game_ids": detail.player.game_ids,
                "games": games_json(version, detail.games),
            });
            if let Some(weapons) = detail.weapons {
                output["weapons"] = weapons
                    .into_iter()
                    .map(|w| (w.name.clone(), json!(w)))
                    .collect::<serde_json::Map<_, _>>()
                    .into();
            }
            output
        }
        Command::Servers(p) => json!(reader.list::<Server>(p.page, p.per_page).await?),
        Command::Server { handle, games } => {
            let (server, page) = reader
                .get_with_games::<Server>(&handle, games.page, games.per_page)
                .await?;
            json!({
                "handle": server.key(),
                "game_ids": server.game_ids,
                "games": games_json(version, page),
            })
        }
        Command::Maps(p) => json!(reader.list::<Map>(p.page, p.per_page).await?),
        Command::Map { name, games } => {
            let detail = reader.map_detail(&name, games.page, games.per_page).await?;
            json!({
                "name": detail.map.name,
                "game_ids": detail.map.game_ids,
                "topraces": detail.topraces,
                "games": games_json(version, detail.games),
            })
        }
        Command::Weapons => json!(reader.weapons().await?),
        Command::Weapon { name } => json!(reader.weapon(&name).await?),
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    match run(args).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        },
        Err(e) if e.is_not_found() => {
            log::error!("{e}");
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
