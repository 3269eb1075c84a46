//! # Error Suggestions
//!
//! Helpers producing operator-facing errors that say what went wrong and how
//! to fix it. Commands use these instead of bare library errors for the
//! mistakes people make most often.
//!
//! ```rust,ignore
//! use pride::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("No pride found in {}", path.display());
//!
//! // Use:
//! return Err(suggestions::not_a_workspace(path));
//! ```

use std::path::Path;

/// Error for a command that needs a workspace but was run outside one.
pub fn not_a_workspace(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "No pride found in {path} or any of its parent directories\n\n\
         hint: Run 'pride init' to create a pride here\n\
         hint: Use -C/--pride-dir to point at an existing pride",
        path = path.display()
    )
}

/// Error for `init` finding an existing workspace.
pub fn workspace_exists(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "An existing pride has been found in {path}\n\n\
         hint: Use 'pride init --force' to re-initialize it\n\
         hint: Add --ignore-config to start from an empty configuration",
        path = path.display()
    )
}

/// Error for `remove` without any module names.
pub fn no_modules_to_remove() -> anyhow::Error {
    anyhow::anyhow!(
        "No modules to remove have been specified\n\n\
         hint: Run 'pride list --short' to see the registered modules"
    )
}

/// Error for an invalid module pattern.
pub fn invalid_regex(pattern: &str, error: &regex::Error) -> anyhow::Error {
    let hint = match error {
        regex::Error::Syntax(msg) if msg.contains("unclosed") => {
            "hint: Check for unclosed brackets, parentheses, or braces"
        }
        regex::Error::Syntax(msg) if msg.contains("repetition") => {
            "hint: Repetition operators (+, *, ?) must follow a pattern"
        }
        _ => "hint: Patterns must match the whole module name, e.g. 'lib-.*'",
    };

    anyhow::anyhow!(
        "Invalid regex pattern: {pattern}\n\
         error: {error}\n\n\
         {hint}"
    )
}

/// Error for a `--vcs` value no backend answers to.
pub fn unknown_vcs(vcs: &str, known: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(vcs, known)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown version control system type: {vcs}{did_you_mean}\n\n\
         Supported types are: {types}",
        types = known.join(", ")
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b.len()]
}
