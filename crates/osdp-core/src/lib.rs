//! OSDP Core Library
//!
//! Building blocks shared by every layer of an OSDP stack:
//! - CRC-16 frame checksums
//! - Hex/binary conversion for keys and dumps
//! - Device-tagged diagnostic logger
//! - Online / secure-channel status bitmasks
//! - Millisecond timestamps for timeouts
//! - Configuration, tracing setup and version reporting

pub mod checksum;
pub mod config;
pub mod error;
pub mod hex;
pub mod logger;
pub mod status;
pub mod time;
pub mod tracing_init;
pub mod version;

pub use checksum::{CRC16_SEED, compute_crc16, crc16_itu_t};
pub use config::Config;
pub use error::{Error, Result};
pub use logger::{LogLevel, LogSink, Logger};
pub use status::{DeviceStatusEntry, DeviceTable, Mode, get_sc_status_mask, get_status_mask};
pub use time::{millis_now, millis_since};
pub use version::{source_info, version};
