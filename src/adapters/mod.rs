//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements         | Connects to                    |
//! |--------------|--------------------|--------------------------------|
//! | `hardware`   | TorchPort          | `embedded-hal` output pin      |
//! | `log_sink`   | EventSink          | `log` facade                   |
//! | `permission` | PermissionPort     | Fixed grant/deny policy        |
//! | `replay`     | MotionSourcePort   | Caller-fed samples             |
//! | `trace`      | —                  | JSON-lines trace files         |

pub mod hardware;
pub mod log_sink;
pub mod permission;
pub mod replay;
pub mod trace;
