//! End-to-end: a recorded event feed through the feed actor and logger.

use buildtail::{
    BuildLogger, BuildState, ChannelHandle, Console, DeploymentFailure, LifecycleEvent,
    LoggerConfig, Palette,
};
use std::io::Cursor;

type Output = (String, String, Vec<LifecycleEvent>, BuildState);

fn replay(feed: &str, config: LoggerConfig) -> Output {
    let channel = ChannelHandle::from_reader(Cursor::new(feed.to_string())).unwrap();
    let console = Console::new(Vec::new(), Vec::new(), Palette { color: false });
    let mut logger = BuildLogger::with_console("my-app.now.sh", channel, config, console);
    let events = logger.subscribe();

    let state = logger.run().unwrap();
    let out = String::from_utf8(logger.console().out().clone()).unwrap();
    let err = String::from_utf8(logger.console().err().clone()).unwrap();
    (out, err, events.try_iter().collect(), state)
}

#[test]
fn successful_build() {
    let feed = r#"
{"event":"state","data":{"id":"dpl_1","logs":[{"type":"command","data":"npm install"}]}}
{"event":"logs","data":{"type":"stdout","data":"ok\ndone"}}
{"event":"logs","data":{"type":"stderr","data":"warn: x"}}
{"event":"backend"}
{"event":"logs","data":{"type":"stdout","data":"after close"}}
"#;
    let (out, err, events, state) = replay(feed, LoggerConfig::default());

    assert_eq!(state, BuildState::Completed);
    assert_eq!(out, "> Building\n> ▲ npm install\n> ok\n> done\n");
    assert_eq!(err, "> warn: x\n");
    assert_eq!(events, [LifecycleEvent::Close]);
}

#[test]
fn missing_deployment() {
    let feed = concat!(
        "{\"event\":\"error\",\"data\":\"websocket error\"}\n",
        "{\"event\":\"state\",\"data\":{}}\n",
        "{\"event\":\"backend\"}\n",
    );
    let (out, err, events, state) = replay(feed, LoggerConfig::default());

    assert_eq!(state, BuildState::Errored(DeploymentFailure::NotFound));
    assert_eq!(out, "");
    assert_eq!(err, "> Deployment not found\n");
    assert_eq!(events, [LifecycleEvent::Error(DeploymentFailure::NotFound)]);
}

#[test]
fn debug_shows_transport_error() {
    let feed = concat!(
        "{\"event\":\"error\",\"data\":\"websocket error\"}\n",
        "{\"event\":\"state\",\"data\":{\"id\":\"dpl_1\",\"backend\":true}}\n",
    );
    let (out, _, events, state) = replay(feed, LoggerConfig::default().with_debug(true));

    assert_eq!(state, BuildState::Completed);
    assert_eq!(out, "> [debug] Socket error websocket error\n");
    assert_eq!(events, [LifecycleEvent::Close]);
}

#[test]
fn truncated_feed_leaves_build_running() {
    let feed = concat!(
        "{\"event\":\"logs\",\"data\":{\"type\":\"command\",\"data\":\"make\"}}\n",
        "this line is not json\n",
        "{\"event\":\"heartbeat\"}\n",
    );
    let (out, _, events, state) = replay(feed, LoggerConfig::default().with_quiet(true));

    assert_eq!(state, BuildState::Building);
    assert_eq!(out, "");
    assert!(events.is_empty());
}
