use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use interlude::audio::RodioBackend;
use interlude::config::LibrarySettings;
use interlude::library::spawn_scan;
use interlude::playlist::JsonPlaylistStore;
use interlude::scheduler::{HostSignals, OutputVolume};
use interlude::session::Session;

use super::commands::{ControlCmd, HELP};

pub type ConsoleSession = Session<RodioBackend, OutputVolume, JsonPlaylistStore>;

/// Host state the console simulates: whether a session is loaded and
/// whether it is paused.
#[derive(Debug, Copy, Clone)]
pub struct ConsoleSignals {
    pub in_session: bool,
    pub paused: bool,
}

impl HostSignals for ConsoleSignals {
    fn in_session(&self) -> bool {
        self.in_session
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// State tracked by the runtime event loop across ticks.
pub struct EventLoopState {
    pub session: ConsoleSession,
    pub signals: ConsoleSignals,
    pub music_dir: PathBuf,
    pub library: LibrarySettings,
}

/// Fixed-cadence loop: drain pending commands, run one host frame, sleep
/// until the next tick. Returns when `quit` arrives or every sender is gone.
pub fn run(state: &mut EventLoopState, control_rx: &mpsc::Receiver<ControlCmd>, tick_rate_hz: u32) {
    let period = Duration::from_secs(1) / tick_rate_hz.max(1);
    let mut next_tick = Instant::now();

    'ticks: loop {
        loop {
            match control_rx.try_recv() {
                Ok(cmd) => {
                    debug!(?cmd, "console command");
                    if state.apply(cmd) == Flow::Quit {
                        break 'ticks;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'ticks,
            }
        }

        state.session.frame(&state.signals);

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            // Fell behind; do not try to catch up with a burst of ticks.
            next_tick = now;
        }
    }

    info!("shutting down");
    state.session.shutdown();
}

impl EventLoopState {
    fn apply(&mut self, cmd: ControlCmd) -> Flow {
        let result = match cmd {
            ControlCmd::Quit => return Flow::Quit,
            ControlCmd::Help => {
                println!("{HELP}");
                Ok(())
            }
            ControlCmd::Tracks => {
                self.print_tracks();
                Ok(())
            }
            ControlCmd::Playlists => {
                self.print_playlists();
                Ok(())
            }
            ControlCmd::Status => {
                self.print_status();
                Ok(())
            }
            ControlCmd::Play(track) => self.session.play(&track),
            ControlCmd::Use(name) => self.session.activate(Some(&name)),
            ControlCmd::NoPlaylist => self.session.activate(None),
            ControlCmd::New(name) => self.session.create(&name),
            ControlCmd::Delete(name) => self.session.delete(&name),
            ControlCmd::Add { playlist, track } => {
                self.session.add_track(&playlist, &track).map(|added| {
                    if !added {
                        println!("{track} is already in {playlist}");
                    }
                })
            }
            ControlCmd::Remove { playlist, track } => self
                .session
                .remove_track(&playlist, &track)
                .map(|removed| {
                    if !removed {
                        println!("{track} is not in {playlist}");
                    }
                }),
            ControlCmd::Shuffle(name) => self
                .session
                .toggle_shuffle(&name)
                .map(|on| println!("shuffle {}", on_off(on))),
            ControlCmd::Repeat(name) => self
                .session
                .toggle_repeat(&name)
                .map(|on| println!("repeat {}", on_off(on))),
            ControlCmd::Next => {
                self.session.scheduler_mut().play_next();
                Ok(())
            }
            ControlCmd::Prev => {
                self.session.scheduler_mut().play_previous();
                Ok(())
            }
            ControlCmd::Stop => {
                self.session.scheduler_mut().stop();
                Ok(())
            }
            ControlCmd::Pause => {
                self.signals.paused = true;
                Ok(())
            }
            ControlCmd::Resume => {
                self.signals.paused = false;
                Ok(())
            }
            ControlCmd::Enter => {
                self.signals.in_session = true;
                Ok(())
            }
            ControlCmd::Leave => {
                self.signals.in_session = false;
                Ok(())
            }
            ControlCmd::Volume { music, master } => {
                let host = self.session.scheduler_mut().host_mut();
                host.music = music;
                if let Some(master) = master {
                    host.master = master;
                }
                Ok(())
            }
            ControlCmd::Rescan => {
                let catalog = self.session.scheduler().catalog().clone();
                if spawn_scan(self.music_dir.clone(), self.library.clone(), catalog).is_none() {
                    println!("a scan is already running");
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("{e}");
        }
        Flow::Continue
    }

    fn print_tracks(&self) {
        let tracks = self.session.scheduler().catalog().snapshot();
        if tracks.is_empty() {
            println!("no tracks in {}", self.music_dir.display());
            return;
        }
        for track in tracks.iter() {
            match track.duration {
                Some(d) => println!("{}  [{}]", track.name, format_duration(d)),
                None => println!("{}", track.name),
            }
        }
    }

    fn print_playlists(&self) {
        let active = self.session.active_name();
        let playlists = self.session.playlists();
        if playlists.is_empty() {
            println!("no playlists, create one with `new <name>`");
            return;
        }
        for p in playlists.iter() {
            let marker = if Some(p.name()) == active { "*" } else { " " };
            println!(
                "{marker} {}  ({} tracks, shuffle {}, repeat {})",
                p.name(),
                p.len(),
                on_off(p.shuffle()),
                on_off(p.repeat())
            );
        }
    }

    fn print_status(&self) {
        let scheduler = self.session.scheduler();
        let catalog = scheduler.catalog();
        println!(
            "session: {}{}",
            if self.signals.in_session { "in" } else { "out" },
            if self.signals.paused { ", paused" } else { "" }
        );
        match scheduler.active_playlist() {
            Some(p) => println!(
                "playlist: {} at {} of {} (shuffle {}, repeat {})",
                p.name(),
                p.cursor() + 1,
                p.len(),
                on_off(p.shuffle()),
                on_off(p.repeat())
            ),
            None => println!("playlist: none"),
        }
        match scheduler.current_track() {
            Some(t) => println!(
                "track: {} ({}){}",
                t.name,
                t.duration.map(format_duration).unwrap_or_else(|| "?".into()),
                if scheduler.is_playing() { "" } else { ", not playing" }
            ),
            None => println!("track: none"),
        }
        let volume = scheduler.host();
        println!(
            "volume: music {:.2} master {:.2}",
            volume.music, volume.master
        );
        println!(
            "silence: {} / {} ticks",
            scheduler.ticks_since_last_music(),
            scheduler.timing().min_ticks_between_music
        );
        println!(
            "library: {} tracks{}",
            catalog.len(),
            if catalog.is_scanning() { ", scanning" } else { "" }
        );
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
