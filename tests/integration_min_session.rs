// Drives the compiled binary through a PTY so the real crossterm event loop
// and terminal setup are exercised end to end.
//
// Notes:
// - Requires a TTY; expectrl allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn start_pause_and_quit() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("pomo");
    let cmd = format!("{} --no-audio --tick-rate-ms 50", bin.display());

    let mut p = spawn(cmd)?;

    // let the alternate screen come up
    std::thread::sleep(Duration::from_millis(200));

    p.send("s")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("x")?;
    std::thread::sleep(Duration::from_millis(100));

    p.send("q")?;
    p.expect(Eof)?;
    Ok(())
}
