use std::env;
use std::process::ExitCode;

use rpg_world::data::DataPaths;
use rpg_world::load_game_data;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // First argument overrides the content root, then $GAME_DATA_DIR, then ./GameData.
    let paths = match env::args().nth(1) {
        Some(root) => DataPaths::new(root),
        None => DataPaths::from_env(),
    };

    println!("Using game data in: {}", paths.root.display());

    let game = load_game_data(&paths);

    println!(
        "{} prototypes, {} locations, {} NPCs",
        game.prototypes().len(),
        game.locations().len(),
        game.npcs().len()
    );

    for location in game.locations().values() {
        println!("\n{} [{}]", location.name, location.id);
        for path in location.paths() {
            println!("  -> {}: {}", path.destination, path.description);
        }
        for item in location.items.iter() {
            println!("  * {}", item.listing_with_stats());
        }
        for presence in location.npcs() {
            println!("  @ {}", presence.npc_id);
        }
    }

    if game.success() {
        println!("\nGame data OK ({} warnings).", game.diagnostics().warnings().count());
        ExitCode::SUCCESS
    } else {
        eprintln!("\nGame data failed to load cleanly:");
        for diag in game.diagnostics().errors() {
            eprintln!("{}", diag);
        }
        ExitCode::FAILURE
    }
}
