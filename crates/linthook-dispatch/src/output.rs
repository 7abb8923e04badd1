//! Turning raw tool output into warning lines.

use std::path::Path;

/// Split tool output into trimmed, non-empty lines.
///
/// For Go, `# package` banners printed by the build system are dropped.
pub fn parse_output(output: &str, language: &str) -> Vec<String> {
    output
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !(language == "go" && line.starts_with("# ")))
        .map(str::to_string)
        .collect()
}

/// Keep lines about `file`, plus lines that carry no location at all.
///
/// A line is about another file when it starts with `path:line` and that
/// path names a different file.
pub fn filter_for_file(lines: Vec<String>, file: &Path) -> Vec<String> {
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        return lines;
    };

    lines
        .into_iter()
        .filter(|line| match location_path(line) {
            Some(path) => Path::new(path).file_name().and_then(|n| n.to_str()) == Some(name),
            None => true,
        })
        .collect()
}

/// The `path` of a leading `path:line` location, if the line has one.
fn location_path(line: &str) -> Option<&str> {
    let (path, rest) = line.split_once(':')?;
    let has_line_number = rest.starts_with(|c: char| c.is_ascii_digit());
    (!path.is_empty() && !path.contains(char::is_whitespace) && has_line_number).then_some(path)
}
