use regex::Regex;

/// Count pending upgrades in `apt-get -s upgrade` output.
///
/// The simulator prints one `Inst <pkg> ...` line per package it would
/// upgrade; the marker is format-stable and not localized under LC_ALL=C.
pub fn count_pending_upgrades(simulation: &str) -> u32 {
    simulation
        .lines()
        .filter(|line| line.starts_with("Inst "))
        .count() as u32
}

/// Count per-package completion markers in `apt-get upgrade` output.
/// dpkg prints one `Setting up <pkg> (<version>) ...` line per package it
/// configured.
pub fn count_completed_upgrades(output: &str) -> u32 {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with("Setting up "))
        .count() as u32
}

/// Pull the removed-package count out of the apt summary line
/// (`0 upgraded, 0 newly installed, 4 to remove and 2 not upgraded.`).
pub fn extract_removed_count(output: &str) -> Option<u32> {
    let re = Regex::new(r"(\d+) to remove").ok()?;
    re.captures(output)?.get(1)?.as_str().parse().ok()
}
