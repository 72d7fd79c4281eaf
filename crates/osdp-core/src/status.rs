//! Per-device status bitmasks.
//!
//! The device table belongs to the control-panel state machine; this module
//! only projects it into a `u32` at query time. Nothing is cached and nothing
//! is locked, so a mask reflects whatever the owner had written when it was
//! read.

/// Largest device table a `u32` mask can describe.
pub const MAX_DEVICES: usize = 32;

/// Which side of the link this context is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Control panel polling up to [`MAX_DEVICES`] peripherals.
    ControlPanel,
    /// A single peripheral device.
    Peripheral,
}

/// Condition a device must meet to have its bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPredicate {
    Online,
    /// Online with an active secure channel.
    SecureChannelActive,
}

/// Read-only view of one device slot. The slot index is its position in the
/// table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStatusEntry {
    pub online: bool,
    pub sc_active: bool,
}

impl DeviceStatusEntry {
    pub const fn new(online: bool, sc_active: bool) -> Self {
        Self { online, sc_active }
    }

    const fn satisfies(self, predicate: StatusPredicate) -> bool {
        match predicate {
            StatusPredicate::Online => self.online,
            StatusPredicate::SecureChannelActive => self.online && self.sc_active,
        }
    }
}

/// Anything that owns a device table and knows its mode.
pub trait DeviceTable {
    fn mode(&self) -> Mode;

    fn entries(&self) -> &[DeviceStatusEntry];
}

/// Project `devices` into a bitmask for `predicate`.
///
/// # Panics
///
/// In control-panel mode, if more than [`MAX_DEVICES`] entries are supplied.
pub fn status_mask(devices: &[DeviceStatusEntry], mode: Mode, predicate: StatusPredicate) -> u32 {
    match mode {
        Mode::ControlPanel => {
            assert!(
                devices.len() <= MAX_DEVICES,
                "{} devices configured, status mask holds at most {MAX_DEVICES}",
                devices.len()
            );
            devices
                .iter()
                .enumerate()
                .filter(|(_, pd)| pd.satisfies(predicate))
                .fold(0, |mask, (i, _)| mask | (1 << i))
        }
        // A peripheral has no online state of its own, only its SC flag.
        Mode::Peripheral => match predicate {
            StatusPredicate::Online => 1,
            StatusPredicate::SecureChannelActive => {
                devices.first().map_or(0, |pd| u32::from(pd.sc_active))
            }
        },
    }
}

/// Bit per device that is online.
pub fn get_status_mask(ctx: &impl DeviceTable) -> u32 {
    status_mask(ctx.entries(), ctx.mode(), StatusPredicate::Online)
}

/// Bit per device that is online with an active secure channel.
pub fn get_sc_status_mask(ctx: &impl DeviceTable) -> u32 {
    status_mask(ctx.entries(), ctx.mode(), StatusPredicate::SecureChannelActive)
}
