//! Pure helpers for container runtime argument construction and output parsing.

/// Length of the short container id the runtime prints.
pub const SHORT_ID_LEN: usize = 12;

/// Substring that marks a volume as a `pack` build/launch cache.
pub const CACHE_VOLUME_MARKER: &str = "pack-cache";

/// Extract the short container id from `docker run -d` output.
///
/// Returns `None` when fewer than 12 characters were printed.
#[must_use]
pub fn short_container_id(stdout: &str) -> Option<String> {
    stdout
        .trim_start()
        .get(..SHORT_ID_LEN)
        .filter(|id| id.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_string)
}

/// Extract the host-side port from `docker container port` output.
///
/// Accepts either arrow direction. The host side is the one carrying an
/// `ip:port` pair, so `"0.0.0.0:32768->8080/tcp"` and
/// `"8080/tcp -> 0.0.0.0:32768"` both yield `"32768"`. Only the first
/// mapping line is considered.
#[must_use]
pub fn parse_host_port(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let host = line.split("->").map(str::trim).find(|side| side.contains(':'))?;
    let (_, port) = host.rsplit_once(':')?;
    let port = port.trim();
    (!port.is_empty() && port.chars().all(|c| c.is_ascii_digit())).then(|| port.to_string())
}

/// Volume names from `docker volume ls -q` that belong to the `pack` cache.
#[must_use]
pub fn filter_cache_volumes(output: &str) -> Vec<String> {
    non_empty_lines(output)
        .into_iter()
        .filter(|name| name.contains(CACHE_VOLUME_MARKER))
        .collect()
}

/// Split command output into its non-empty lines.
#[must_use]
pub fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove ANSI escape sequences (colors, cursor movement) from `text`.
#[must_use]
pub fn strip_color(text: &str) -> String {
    console::strip_ansi_codes(text).into_owned()
}

/// Render a program and its arguments for error messages.
#[must_use]
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Unit tests ────────────────────────────────────────────────────────────────
