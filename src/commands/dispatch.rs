use eyre::{Context, Result};
use serde::Serialize;

use shimtrace::event::{Event, ListenerSet, dispatch_raw, dispatch_structured};

pub fn run(name: &str, fields: &str, raw: bool, listeners: usize, fail_at: Option<usize>) -> Result<()> {
    let payload: serde_json::Value = serde_json::from_str(fields).context("Failed to parse --fields JSON")?;
    log::info!("Dispatching '{}' to {} echo listener(s)", name, listeners);

    if raw {
        let mut set: ListenerSet<serde_json::Value> = ListenerSet::new();
        for idx in 0..listeners {
            set.subscribe(echo(idx, fail_at));
        }
        return dispatch_raw(&set, name, &payload);
    }

    let fields = match payload {
        serde_json::Value::Object(map) => map,
        other => eyre::bail!("--fields must be a JSON object, got: {}", other),
    };

    let mut set: ListenerSet<Event> = ListenerSet::new();
    for idx in 0..listeners {
        set.subscribe(echo(idx, fail_at));
    }
    dispatch_structured(&set, name, &fields)
}

/// Listener that prints what it receives, failing when positioned at `fail_at`
fn echo<E: Serialize + 'static>(idx: usize, fail_at: Option<usize>) -> impl Fn(&E) -> Result<()> + 'static {
    move |event: &E| {
        if fail_at == Some(idx) {
            eyre::bail!("listener #{} failed on purpose", idx);
        }
        println!("listener #{} <- {}", idx, serde_json::to_string(event)?);
        Ok(())
    }
}
