mod game;
mod movement;
mod network;

use clap::Parser;
use game::PlayerMirror;
use log::info;
use movement::{Avatar, PathClamp};
use network::RoomClient;
use shared::{PathSet, ZoneData, GRID, SPAWN_X, SPAWN_Y, WALK_SPEED};
use std::time::Duration;
use tokio::time::{interval, Instant};

const FRAME: Duration = Duration::from_millis(33);
const AVATAR_HALF_HEIGHT: f32 = GRID / 2.0;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:3000")]
    server: String,

    /// Display name sent on join
    #[arg(short, long, default_value = "Guest")]
    name: String,

    /// Zone JSON file providing the path rectangles
    #[arg(short, long)]
    zone: Option<String>,

    /// Disable path clamping entirely
    #[arg(long)]
    free_walk: bool,

    /// How long to stay in the room before disconnecting, in seconds
    #[arg(short, long, default_value = "10")]
    duration_secs: u64,
}

fn load_paths(path: &str) -> Result<PathSet, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let zone: ZoneData = serde_json::from_slice(&bytes)?;
    info!(
        "Loaded zone {} with {} path rects",
        zone.scene_key,
        zone.paths.len()
    );
    Ok(PathSet::from_rects(zone.paths))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let paths = match &args.zone {
        Some(path) => load_paths(path)?,
        None => PathSet::new(),
    };

    info!("Starting headless client...");
    let client = RoomClient::connect(&args.server, &args.name).await?;
    let (mut room_tx, mut room_rx) = client.split();

    let mut mirror = PlayerMirror::new();
    let mut avatar = Avatar::new(SPAWN_X, SPAWN_Y, AVATAR_HALF_HEIGHT);
    let mut clamp = PathClamp::new(args.free_walk);

    let mut frame = interval(FRAME);
    let deadline = Instant::now() + Duration::from_secs(args.duration_secs);
    let dt = FRAME.as_secs_f32();
    let mut t = 0.0f32;

    loop {
        tokio::select! {
            event = room_rx.next_event() => {
                match event {
                    Some(event) => mirror.apply(event),
                    None => {
                        info!("Server closed the connection");
                        break;
                    }
                }
            }

            _ = frame.tick() => {
                if Instant::now() >= deadline {
                    break;
                }
                t += dt;

                // scripted walk: a slow circle around the spawn point
                avatar.vel_x = (t * 0.5).sin() * WALK_SPEED;
                avatar.vel_y = (t * 0.5).cos() * WALK_SPEED;
                avatar.x += avatar.vel_x * dt;
                avatar.y += avatar.vel_y * dt;

                clamp.constrain(&mut avatar, &paths);

                room_tx.send_move(avatar.x, avatar.y).await?;
            }
        }
    }

    info!(
        "Leaving with {} other players still in the room",
        mirror.len()
    );
    room_tx.close().await;

    Ok(())
}
