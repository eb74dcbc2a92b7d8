//! Console rendering helpers for the CLI.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial console progress sink.

/// Progress sink that prints one line per stage transition to stdout.
pub struct ConsoleProgressSink;

impl pipeline_core::ports::ProgressSinkPort for ConsoleProgressSink {
    fn on_progress(&self, event: pipeline_core::ports::StageEvent) {
        match (event.current_step, event.total_steps) {
            (std::option::Option::Some(current), std::option::Option::Some(total)) => {
                println!("[{:>3.0}%] {} ({}/{})", event.fraction * 100.0, event.stage.label(), current, total);
            }
            _ => {
                println!("[{:>3.0}%] {}", event.fraction * 100.0, event.stage.label());
            }
        }
    }
}
