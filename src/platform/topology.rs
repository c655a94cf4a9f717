//! Display topology and display counting through the display-config API

use super::windows::wide_to_string;
use super::{PlatformError, TopologySupport};
use crate::domain::Topology;
use tracing::{debug, trace};
use windows::Win32::Devices::Display::*;
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::Graphics::Gdi::{
    DEVMODEW, DISPLAY_DEVICEW, ENUM_DISPLAY_SETTINGS_MODE, EnumDisplayDevicesW,
    EnumDisplaySettingsW,
};
use windows::core::PCWSTR;

const DISPLAY_DEVICE_MIRRORING_DRIVER: u32 = 0x0000_0008;

/// A device must enumerate at least this many modes to count as attached
const PROBED_MODES: u32 = 4;

/// Checks once whether the display-config API answers on this system
pub fn probe() -> TopologySupport {
    let mut paths = 0u32;
    let mut modes = 0u32;
    let status = unsafe { GetDisplayConfigBufferSizes(QDC_ALL_PATHS, &mut paths, &mut modes) };
    if status == ERROR_SUCCESS {
        debug!(paths, modes, "display-config API available");
        TopologySupport::Available
    } else {
        TopologySupport::Unavailable(format!(
            "GetDisplayConfigBufferSizes returned {:?}",
            status
        ))
    }
}

/// Reads the raw id of the active topology from the current database
pub fn read_topology() -> Result<u32, PlatformError> {
    let mut path_count = 0u32;
    let mut mode_count = 0u32;

    unsafe {
        let status = GetDisplayConfigBufferSizes(QDC_DATABASE_CURRENT, &mut path_count, &mut mode_count);
        if status != ERROR_SUCCESS {
            return Err(PlatformError::call_with("GetDisplayConfigBufferSizes", format!("{status:?}")));
        }

        let mut paths = vec![DISPLAYCONFIG_PATH_INFO::default(); path_count as usize];
        let mut modes = vec![DISPLAYCONFIG_MODE_INFO::default(); mode_count as usize];
        let mut topology = DISPLAYCONFIG_TOPOLOGY_ID::default();

        let status = QueryDisplayConfig(
            QDC_DATABASE_CURRENT,
            &mut path_count,
            paths.as_mut_ptr(),
            &mut mode_count,
            modes.as_mut_ptr(),
            Some(&mut topology),
        );
        if status != ERROR_SUCCESS {
            return Err(PlatformError::call_with("QueryDisplayConfig", format!("{status:?}")));
        }

        trace!(raw = topology.0, "read display topology");
        Ok(topology.0 as u32)
    }
}

/// Asks the OS to switch to `topology`
pub fn apply_topology(topology: Topology) -> Result<(), PlatformError> {
    let flags = SDC_APPLY | SET_DISPLAY_CONFIG_FLAGS(topology.raw());
    let status = unsafe { SetDisplayConfig(None, None, flags) };
    if status == 0 {
        Ok(())
    } else {
        Err(PlatformError::call_with("SetDisplayConfig", format!("status {status}")))
    }
}

/// Counts display devices that are really attached
///
/// Mirroring pseudo-devices are skipped, and so are devices that still
/// enumerate after being unplugged: those report only a handful of
/// display modes.
pub fn display_count() -> u32 {
    let mut count = 0;
    let mut index = 0;

    loop {
        let mut device = DISPLAY_DEVICEW {
            cb: std::mem::size_of::<DISPLAY_DEVICEW>() as u32,
            ..Default::default()
        };
        let found = unsafe { EnumDisplayDevicesW(PCWSTR::null(), index, &mut device, 0) };
        if !found.as_bool() {
            break;
        }
        index += 1;

        if device.StateFlags & DISPLAY_DEVICE_MIRRORING_DRIVER != 0 {
            continue;
        }
        if has_modes(&device) {
            trace!(device = %wide_to_string(&device.DeviceName), "display device counted");
            count += 1;
        }
    }

    count
}

fn has_modes(device: &DISPLAY_DEVICEW) -> bool {
    let name = PCWSTR(device.DeviceName.as_ptr());
    (0..PROBED_MODES).all(|mode| {
        let mut devmode = DEVMODEW {
            dmSize: std::mem::size_of::<DEVMODEW>() as u16,
            ..Default::default()
        };
        unsafe { EnumDisplaySettingsW(name, ENUM_DISPLAY_SETTINGS_MODE(mode), &mut devmode).as_bool() }
    })
}
