// Console event sink: informational events to stdout, reports to stderr

use shelfkeep_core::{log_debug, CatalogEvent, EventSink};

#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    echo_info: bool,
}

impl ConsoleSink {
    /// Print every event
    pub fn verbose() -> Self {
        ConsoleSink { echo_info: true }
    }

    /// Print reports only; informational events go to the debug log
    pub fn quiet() -> Self {
        ConsoleSink { echo_info: false }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: &CatalogEvent) {
        if event.is_report() {
            eprintln!("{}", event);
        } else if self.echo_info {
            println!("{}", event);
        } else {
            log_debug!("{}", event);
        }
    }
}
