//! Process name matching

/// Returns true if the executable file name `exe` belongs to program `name`
///
/// `name` may be given with or without the `.exe` suffix; the comparison is
/// case-insensitive, mirroring how Windows treats executable names.
pub fn matches_program(exe: &str, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    let exe = exe.to_ascii_lowercase();
    let name = name.to_ascii_lowercase();
    let stem = exe.strip_suffix(".exe").unwrap_or(&exe);
    let wanted = name.strip_suffix(".exe").unwrap_or(&name);
    stem == wanted
}
