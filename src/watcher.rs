use crate::build;
use crate::config::BuildConfig;
use crate::engine::MessageCompiler;
use crate::helpers;
use crate::helpers::emojis::*;
use anyhow::Result;
use futures_timer::Delay;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

const SETTLE_DELAY: Duration = Duration::from_millis(50);

fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Any | EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any) => true,
        // metadata changes, reads and backend-specific noise never change the output
        EventKind::Modify(ModifyKind::Metadata(_) | ModifyKind::Other) | EventKind::Access(_) | EventKind::Other => {
            false
        }
    }
}

fn is_output_path(path: &Path, output: Option<&Path>) -> bool {
    output.is_some_and(|output| path == output || helpers::get_abs_path(path) == output)
}

pub fn is_relevant_event(event: &Event, output: Option<&Path>) -> bool {
    is_content_change(&event.kind)
        && event
            .paths
            .iter()
            .any(|path| helpers::is_template_file(path) && !is_output_path(path, output))
}

/// Takes everything currently queued. The flag is set once the producer is gone
/// and the queue is empty.
fn drain(rx: &Receiver<notify::Result<Event>>) -> (Vec<Event>, bool) {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(Ok(event)) => events.push(event),
            Ok(Err(e)) => log::warn!("watch error: {e}"),
            Err(TryRecvError::Empty) => return (events, false),
            Err(TryRecvError::Disconnected) => return (events, true),
        }
    }
}

/// Runs `rebuild` once per settled batch of relevant events.
///
/// Passes run on this task only, so they never overlap: events that arrive while
/// a pass is running wait in the channel and are folded into a single follow-up
/// pass.
async fn watch_loop(
    rx: &Receiver<notify::Result<Event>>,
    output: Option<&Path>,
    stop: &AtomicBool,
    mut rebuild: impl FnMut(),
) {
    loop {
        if stop.load(Ordering::SeqCst) {
            log::info!("Exiting...");
            break;
        }

        let (mut events, mut disconnected) = drain(rx);
        if !events.is_empty() {
            // Wait for events to settle
            Delay::new(SETTLE_DELAY).await;
            let (more, gone) = drain(rx);
            events.extend(more);
            disconnected |= gone;
        }

        let relevant = events.iter().filter(|event| is_relevant_event(event, output)).count();
        if relevant > 0 {
            log::debug!("{relevant} of {} events are relevant -> full pass", events.len());
            rebuild();
        } else if disconnected {
            log::debug!("watcher closed");
            break;
        } else {
            Delay::new(SETTLE_DELAY).await;
        }
    }
}

/// Watches the input directory and rebuilds on template changes until Ctrl-C.
pub fn start<C: MessageCompiler + ?Sized>(config: &BuildConfig, compiler: &C) -> Result<()> {
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        Config::default(),
    )?;
    watcher.watch(config.input_dir(), RecursiveMode::Recursive)?;
    log::info!("{EYES}watching for changes in {}...", config.input_dir().display());

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))?;

    let output = config.output_path().map(helpers::get_abs_path);

    futures::executor::block_on(watch_loop(&rx, output.as_deref(), &stop, || {
        let timing_total = Instant::now();
        if build::build(config, compiler).is_ok() {
            log::info!(
                "{SPARKLES}Finished compilation in {:.2}s",
                timing_total.elapsed().as_secs_f64()
            );
        }
    }));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    fn modified(path: &str) -> Event {
        event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), path)
    }

    fn run(events: Vec<Event>, output: Option<&Path>) -> usize {
        let (tx, rx) = mpsc::channel();
        for e in events {
            tx.send(Ok(e)).unwrap();
        }
        drop(tx);

        let stop = AtomicBool::new(false);
        let mut passes = 0;
        futures::executor::block_on(watch_loop(&rx, output, &stop, || passes += 1));
        passes
    }

    #[test]
    fn template_changes_are_relevant() {
        assert!(is_relevant_event(&modified("/in/en/a.json"), None));
        assert!(is_relevant_event(&event(EventKind::Create(CreateKind::File), "/in/b.json"), None));
        assert!(is_relevant_event(&event(EventKind::Remove(RemoveKind::File), "/in/b.json"), None));
    }

    #[test]
    fn other_files_and_event_kinds_are_ignored() {
        assert!(!is_relevant_event(&modified("/in/notes.txt"), None));
        assert!(!is_relevant_event(
            &event(EventKind::Access(AccessKind::Any), "/in/a.json"),
            None
        ));
        assert!(!is_relevant_event(
            &event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)), "/in/a.json"),
            None
        ));
    }

    #[test]
    fn output_file_never_triggers_a_rebuild() {
        let output = Path::new("/in/out.json");
        assert!(!is_relevant_event(&modified("/in/out.json"), Some(output)));
        assert!(is_relevant_event(&modified("/in/a.json"), Some(output)));
    }

    #[test]
    fn one_change_triggers_exactly_one_pass() {
        assert_eq!(run(vec![modified("/in/greeting.json")], None), 1);
    }

    #[test]
    fn a_burst_of_changes_is_coalesced_into_one_pass() {
        let events = vec![
            modified("/in/a.json"),
            modified("/in/b.json"),
            event(EventKind::Create(CreateKind::File), "/in/c.json"),
            modified("/in/a.json"),
        ];
        assert_eq!(run(events, None), 1);
    }

    #[test]
    fn irrelevant_changes_trigger_nothing() {
        let output = Path::new("/in/i18n.json");
        let events = vec![modified("/in/readme.md"), modified("/in/i18n.json")];
        assert_eq!(run(events, Some(output)), 0);
    }

    #[test]
    fn stop_flag_ends_the_loop() {
        let (_tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let stop = AtomicBool::new(true);
        futures::executor::block_on(watch_loop(&rx, None, &stop, || panic!("no pass expected")));
    }
}
