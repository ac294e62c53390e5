use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use tracing::info;

use interlude::audio::RodioBackend;
use interlude::library::{Catalog, spawn_scan};
use interlude::playlist::{JsonPlaylistStore, PlaylistManager};
use interlude::scheduler::{OutputVolume, PlaybackScheduler};
use interlude::session::Session;

mod commands;
mod event_loop;
mod input;
mod settings;

use commands::ControlCmd;
use event_loop::{ConsoleSignals, EventLoopState};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let music_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.library.music_dir.clone());
    info!(dir = %music_dir.display(), "music folder");

    let catalog = Catalog::default();
    spawn_scan(music_dir.clone(), settings.library.clone(), catalog.clone());

    let backend = RodioBackend::open_default()?;
    let volume = OutputVolume {
        music: settings.mixer.music,
        master: settings.mixer.master,
    };
    let scheduler =
        PlaybackScheduler::new(backend, volume, catalog, settings.scheduler.into());
    let playlists = PlaylistManager::new(JsonPlaylistStore::from_settings(&settings.storage));
    let session = Session::new(scheduler, playlists)
        .with_host_music_replaced(settings.host.replace_host_music);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    input::spawn_stdin_reader(control_tx)?;
    println!("interlude ready, type `help` for commands");

    let mut state = EventLoopState {
        session,
        signals: ConsoleSignals {
            in_session: true,
            paused: false,
        },
        music_dir,
        library: settings.library,
    };
    event_loop::run(&mut state, &control_rx, settings.scheduler.tick_rate_hz);
    Ok(())
}
