//! Build Demo: Simulates a deployment streaming its build output.
//!
//! A producer thread plays the part of the remote service, pushing a
//! snapshot, command echoes and a burst of stdout lines. Watch the last ten
//! lines redraw in place instead of scrolling.

use buildtail::{BuildLogger, ChannelEvent, ChannelHandle, LogEntry, LoggerConfig, StateSnapshot};
use std::thread;
use std::time::Duration;

const PACKAGES: &[&str] = &[
    "react", "react-dom", "next", "typescript", "eslint", "prettier", "webpack", "babel-loader",
    "postcss", "autoprefixer", "tailwindcss", "zod", "date-fns", "lodash", "axios",
];

fn main() -> buildtail::Result<()> {
    let (tx, channel) = ChannelHandle::bounded(16);

    let producer = thread::spawn(move || {
        let pause = Duration::from_millis(80);
        let snapshot = StateSnapshot::found("dpl_demo").with_logs(vec![LogEntry::command("npm install")]);
        let _ = tx.send(ChannelEvent::State(snapshot));

        for package in PACKAGES {
            thread::sleep(pause);
            let _ = tx.send(ChannelEvent::Logs(LogEntry::stdout(format!("added {package}"))));
        }
        let _ = tx.send(ChannelEvent::Logs(LogEntry::stderr("npm WARN deprecated request@2.88.2")));

        let _ = tx.send(ChannelEvent::Logs(LogEntry::command("npm run build")));
        for step in 1..=30 {
            thread::sleep(pause);
            let _ = tx.send(ChannelEvent::Logs(LogEntry::stdout(format!(
                "[{step:>2}/30] compiling chunk {step}"
            ))));
        }

        thread::sleep(pause);
        let _ = tx.send(ChannelEvent::Backend);
    });

    let mut logger = BuildLogger::new("demo.now.sh", channel, LoggerConfig::default());
    logger.on_close(|| println!("> Build completed"));
    logger.on_error(|failure| eprintln!("> Build failed: {failure:?}"));

    let state = logger.run()?;
    let _ = producer.join();
    println!("> Final state: {state:?}");

    Ok(())
}
