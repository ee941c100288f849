mod node_launcher;
mod output_relay;

pub use node_launcher::NodeRenderLauncher;
pub use output_relay::{log_lines, spawn_relays, RelayedLine, StreamKind};
