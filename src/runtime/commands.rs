//! Console command language.

use thiserror::Error;

/// One line typed on stdin.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCmd {
    Tracks,
    Playlists,
    Play(String),
    Use(String),
    NoPlaylist,
    New(String),
    Delete(String),
    Add { playlist: String, track: String },
    Remove { playlist: String, track: String },
    Shuffle(String),
    Repeat(String),
    Next,
    Prev,
    Stop,
    Pause,
    Resume,
    Enter,
    Leave,
    Volume { music: f32, master: Option<f32> },
    Rescan,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("`{0}` is not a gain between 0 and 1")]
    BadGain(String),
}

pub const HELP: &str = "\
tracks                      list scanned tracks
playlists                   list playlists
play <track>                play one track now
use <playlist> | none       set or clear the active playlist
new <playlist>              create a playlist
delete <playlist>           delete a playlist
add <playlist> <track>      append a track
remove <playlist> <track>   remove a track
shuffle <playlist>          toggle shuffle
repeat <playlist>           toggle repeat
next | prev                 skip within the active playlist
stop | pause | resume       control playback
enter | leave               simulate entering or leaving a session
volume <music> [master]     set mixer gains (0..1)
rescan                      rescan the music folder
status                      show what is going on
quit                        exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// Playlist names are a single word; track names run to the end of the
/// line so they may contain spaces.
pub fn parse(line: &str) -> Result<Option<ControlCmd>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word {
        "tracks" | "ls" => ControlCmd::Tracks,
        "playlists" | "pl" => ControlCmd::Playlists,
        "play" => ControlCmd::Play(required(rest, "play", "a track name")?),
        "use" => match rest {
            "none" => ControlCmd::NoPlaylist,
            _ => ControlCmd::Use(required(rest, "use", "a playlist name")?),
        },
        "none" => ControlCmd::NoPlaylist,
        "new" => ControlCmd::New(required(rest, "new", "a playlist name")?),
        "delete" => ControlCmd::Delete(required(rest, "delete", "a playlist name")?),
        "add" => {
            let (playlist, track) = pair(rest, "add")?;
            ControlCmd::Add { playlist, track }
        }
        "remove" => {
            let (playlist, track) = pair(rest, "remove")?;
            ControlCmd::Remove { playlist, track }
        }
        "shuffle" => ControlCmd::Shuffle(required(rest, "shuffle", "a playlist name")?),
        "repeat" => ControlCmd::Repeat(required(rest, "repeat", "a playlist name")?),
        "next" | "n" => ControlCmd::Next,
        "prev" | "p" => ControlCmd::Prev,
        "stop" => ControlCmd::Stop,
        "pause" => ControlCmd::Pause,
        "resume" => ControlCmd::Resume,
        "enter" => ControlCmd::Enter,
        "leave" => ControlCmd::Leave,
        "volume" | "vol" => {
            let mut gains = rest.split_whitespace();
            let music = gains
                .next()
                .ok_or(ParseError::MissingArgument("volume", "a music gain"))?;
            ControlCmd::Volume {
                music: gain(music)?,
                master: gains.next().map(gain).transpose()?,
            }
        }
        "rescan" => ControlCmd::Rescan,
        "status" | "st" => ControlCmd::Status,
        "help" | "?" => ControlCmd::Help,
        "quit" | "exit" | "q" => ControlCmd::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

fn required(rest: &str, cmd: &'static str, what: &'static str) -> Result<String, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(cmd, what))
    } else {
        Ok(rest.to_string())
    }
}

fn pair(rest: &str, cmd: &'static str) -> Result<(String, String), ParseError> {
    match rest.split_once(char::is_whitespace) {
        Some((playlist, track)) if !track.trim().is_empty() => {
            Ok((playlist.to_string(), track.trim().to_string()))
        }
        _ => Err(ParseError::MissingArgument(cmd, "a playlist and a track")),
    }
}

fn gain(s: &str) -> Result<f32, ParseError> {
    match s.parse::<f32>() {
        Ok(g) if (0.0..=1.0).contains(&g) => Ok(g),
        _ => Err(ParseError::BadGain(s.to_string())),
    }
}
