use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, warn};

use super::commands::{self, ControlCmd};

/// Read stdin line by line on its own thread and forward parsed commands.
/// End of input is treated as `quit`.
pub fn spawn_stdin_reader(tx: Sender<ControlCmd>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("interlude-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "cannot read stdin");
                        break;
                    }
                };
                match commands::parse(&line) {
                    Ok(Some(cmd)) => {
                        if tx.send(cmd).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{e}"),
                }
            }
            debug!("stdin closed");
            let _ = tx.send(ControlCmd::Quit);
        })
}
