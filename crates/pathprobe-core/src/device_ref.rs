//! Device reference helpers.
//!
//! Inventory gateway records name the backing device either plainly
//! (`"core-rtr1"`) or with a virtual-system suffix separated by `/`
//! (`"fw1/vsys2"`). Device lookups always use the bare device name.

/// Strip a virtual-system suffix from a device reference.
///
/// Everything from the first `/` onwards is removed.
///
/// ```
/// # use pathprobe_core::device_ref::strip_vsys;
/// assert_eq!(strip_vsys("fw1/vsys2"), "fw1");
/// assert_eq!(strip_vsys("core-rtr1"), "core-rtr1");
/// ```
pub fn strip_vsys(device_ref: &str) -> &str {
    split_vsys(device_ref).map_or(device_ref, |(device, _)| device)
}

/// Split `"device/vsys"` into `("device", "vsys")`.
///
/// Returns `None` when there is no `/` in the reference.
///
/// ```
/// # use pathprobe_core::device_ref::split_vsys;
/// assert_eq!(split_vsys("fw1/vsys2"), Some(("fw1", "vsys2")));
/// assert_eq!(split_vsys("fw1"), None);
/// ```
pub fn split_vsys(device_ref: &str) -> Option<(&str, &str)> {
    let idx = device_ref.find('/')?;
    Some((&device_ref[..idx], &device_ref[idx + 1..]))
}
