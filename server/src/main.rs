mod network;
mod room;
mod zones;

use clap::Parser;
use log::info;
use network::AppState;
use room::Room;
use shared::MAX_CLIENTS;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use zones::ZoneStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Directory for persisted zone files
    #[arg(long, default_value = "data/zones")]
    zones_dir: String,

    /// Directory of static client assets
    #[arg(long, default_value = "public")]
    static_dir: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let (room_tx, room_rx) = mpsc::channel(1024);
    let room_task = tokio::spawn(room::run(Room::new(MAX_CLIENTS), room_rx));

    let state = AppState {
        room_tx,
        zones: ZoneStore::new(&args.zones_dir),
    };
    let app = network::router(state, &args.static_dir);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Labyrinth server listening on http://{}", addr);
    info!("Zones persisted under {}", args.zones_dir);

    tokio::select! {
        result = network::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    room_task.abort();
    Ok(())
}
