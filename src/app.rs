use std::io;

use ratatui::{backend::Backend, Terminal};
use tracing::debug;

use crate::{
    audio::{LoopAudioPlayer, OneShotAudioPlayer},
    clock::Clock,
    input::{command_for_key, Command},
    pomodoro::Pomodoro,
    runtime::{AppEvent, EventSource, Runner},
    ui::TimerScreen,
};

/// Drive the timer from `runner` until the user quits, redrawing as needed.
///
/// `note` is shown under the controls on every frame.
pub fn run<B, E, C, L, O>(
    terminal: &mut Terminal<B>,
    runner: &mut Runner<E>,
    pomodoro: &mut Pomodoro<C, L, O>,
    note: Option<&str>,
) -> io::Result<()>
where
    B: Backend,
    E: EventSource,
    C: Clock,
    L: LoopAudioPlayer,
    O: OneShotAudioPlayer,
{
    draw(terminal, pomodoro, note)?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                pomodoro.tick_now();
                draw(terminal, pomodoro, note)?;
            }
            AppEvent::Resize => {
                draw(terminal, pomodoro, note)?;
            }
            AppEvent::Key(key) => match command_for_key(key) {
                Some(Command::Quit) => {
                    debug!("quit requested");
                    return Ok(());
                }
                Some(Command::Timer(action)) => {
                    debug!(?action, "user action");
                    pomodoro.apply(action);
                    draw(terminal, pomodoro, note)?;
                }
                None => {}
            },
        }
    }
}

fn draw<B, C, L, O>(
    terminal: &mut Terminal<B>,
    pomodoro: &Pomodoro<C, L, O>,
    note: Option<&str>,
) -> io::Result<()>
where
    B: Backend,
    C: Clock,
    L: LoopAudioPlayer,
    O: OneShotAudioPlayer,
{
    let view = pomodoro.view();
    terminal.draw(|f| f.render_widget(TimerScreen::new(&view).with_note(note), f.area()))?;
    Ok(())
}
