//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to                         |
//! |-------------|---------------|-------------------------------------|
//! | `hardware`  | SensorPort    | `embedded-hal` input pins, ADC      |
//! |             | ActuatorPort  | H-bridge motors, release servo      |
//! | `log_sink`  | EventSink     | `log` output                        |

pub mod hardware;
pub mod log_sink;
