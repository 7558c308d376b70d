//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements   | Connects to                  |
//! |----------------|--------------|------------------------------|
//! | `log_sink`     | EventSink    | `log` facade                 |
//! | `csv_sink`     | EventSink    | Any `io::Write` (run log)    |
//! | `config_file`  | ConfigPort   | JSON file on disk            |

pub mod config_file;
pub mod csv_sink;
pub mod log_sink;
