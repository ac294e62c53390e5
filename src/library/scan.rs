use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use lofty::file::AudioFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::catalog::Catalog;
use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and build a track list sorted by name.
///
/// When two files share a stem, the first one in name order wins; playlists
/// refer to tracks by name only, so the second one could never be selected.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut tracks: Vec<Track> = Vec::new();

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!(path = %path.display(), "skipping track with non UTF-8 name");
            continue;
        };
        if !seen.insert(name.to_string()) {
            warn!(track = name, path = %path.display(), "duplicate track name, keeping first");
            continue;
        }

        let file_size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read file metadata");
                continue;
            }
        };

        let mut track = Track::new(name, path, file_size);
        // Header probe only; the full decode happens when the track is loaded.
        if let Ok(tagged) = lofty::read_from_path(path) {
            track.duration = Some(tagged.properties().duration());
        }
        debug!(track = %track.name, "found track");
        tracks.push(track);
    }

    tracks.sort_by(|a, b| a.name.cmp(&b.name));
    tracks
}

/// Scan `dir` on a worker thread and publish the result into `catalog`.
///
/// Returns `None` without spawning when a scan is already in flight. The
/// music folder is created when missing so users know where to drop files.
pub fn spawn_scan(
    dir: PathBuf,
    settings: LibrarySettings,
    catalog: Catalog,
) -> Option<JoinHandle<usize>> {
    if !catalog.begin_scan() {
        debug!("scan already running, ignoring request");
        return None;
    }

    let worker_catalog = catalog.clone();
    let spawned = thread::Builder::new()
        .name("interlude-scan".into())
        .spawn(move || {
            if !dir.exists() {
                match fs::create_dir_all(&dir) {
                    Ok(()) => info!(dir = %dir.display(), "created music folder"),
                    Err(e) => warn!(dir = %dir.display(), error = %e, "cannot create music folder"),
                }
            }

            let tracks = scan(&dir, &settings);
            let count = tracks.len();
            worker_catalog.replace(tracks);
            worker_catalog.end_scan();
            info!(count, dir = %dir.display(), "track scan finished");
            count
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "cannot spawn scan thread");
            catalog.end_scan();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn settings() -> LibrarySettings {
        LibrarySettings {
            extensions: vec!["ogg".into(), ".MP3".into()],
            ..LibrarySettings::default()
        }
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = settings();
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.OGG"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_uses_file_stem_as_name_and_records_size() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.ogg"), b"12345").unwrap();
        fs::write(dir.path().join("A.ogg"), b"1").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &settings());
        let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "b"]);
        assert_eq!(tracks[1].file_size, 5);
        assert!(!tracks[0].loaded);
    }

    #[test]
    fn scan_keeps_first_of_duplicate_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"mp3").unwrap();
        fs::write(dir.path().join("song.ogg"), b"ogg").unwrap();

        let tracks = scan(dir.path(), &settings());
        assert_eq!(tracks.len(), 1);
        assert!(tracks[0].path.ends_with("song.mp3"));
    }

    #[test]
    fn scan_skips_hidden_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.ogg"), b"x").unwrap();
        fs::write(dir.path().join("visible.ogg"), b"x").unwrap();

        let tracks = scan(dir.path(), &settings());
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.ogg"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.ogg"), b"x").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..settings()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "root");
    }
}
