// CLI command implementations

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::{CliError, CliResult, OutputFormatter};

/// Expand file arguments, treating each as a glob pattern
pub fn expand_files(patterns: &[String]) -> Vec<String> {
    use glob::glob;

    let mut files = Vec::new();
    for pattern in patterns {
        match glob(pattern) {
            Ok(paths) => {
                let mut matched = false;
                for path in paths.flatten() {
                    files.push(path.to_string_lossy().to_string());
                    matched = true;
                }
                // keep literal names so missing files get reported per-file
                if !matched {
                    files.push(pattern.clone());
                }
            }
            Err(_) => files.push(pattern.clone()),
        }
    }
    files
}

fn modified_timestamp(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let secs = modified
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    let when = chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0)?;
    Some(when.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Read tags from audio file(s)
pub fn command_read(
    files: Vec<String>,
    output: Option<String>,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    if files.is_empty() {
        return Err(CliError::Other("No files specified".to_string()));
    }

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(BufWriter::new(File::create(&path)?))
    } else {
        Box::new(std::io::stdout())
    };

    for file_path in expand_files(&files) {
        let path = Path::new(&file_path);
        if !path.exists() {
            formatter.print_error(&format!("File not found: {}", file_path));
            continue;
        }

        match ferrotag::read_tags(path) {
            Ok(Some(tag)) => {
                match modified_timestamp(path) {
                    Some(when) => {
                        formatter.print_info(&format!("{} (modified {})", file_path, when))
                    }
                    None => formatter.print_info(&file_path),
                }
                let json = serde_json::to_value(&tag)?;
                formatter.output_tag(&json, &mut *writer)?;
            }
            Ok(None) => {
                formatter.print_info(&format!("{}: no ID3 tag", file_path));
            }
            Err(e) => {
                formatter.print_error(&format!("{}: {}", file_path, e));
            }
        }
    }

    Ok(())
}

/// Parse the tag argument: inline JSON or a JSON file
fn parse_tag_input(tags: Option<String>, from_file: Option<String>) -> CliResult<ferrotag::TagMap> {
    let text = match (tags, from_file) {
        (Some(inline), _) => inline,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (None, None) => {
            return Err(CliError::Other(
                "No tags specified; use --tags or --from-file".to_string(),
            ))
        }
    };
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let tag = ferrotag::Tag::from_json(&value)?;

    let mut map = tag.entries;
    map.extend(tag.raw);
    Ok(map)
}

/// Write tags to a file, replacing any existing tag
pub fn command_write(
    file: String,
    tags: Option<String>,
    from_file: Option<String>,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    if !Path::new(&file).exists() {
        return Err(CliError::FileNotFound(file));
    }
    let map = parse_tag_input(tags, from_file)?;
    ferrotag::write_tags(&map, &file)?;
    formatter.print_success(&format!("{}: tags written", file));
    Ok(())
}

/// Merge tags into a file's existing tag
pub fn command_update(
    file: String,
    tags: Option<String>,
    from_file: Option<String>,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    if !Path::new(&file).exists() {
        return Err(CliError::FileNotFound(file));
    }
    let map = parse_tag_input(tags, from_file)?;
    ferrotag::update_tags(&map, &file)?;
    formatter.print_success(&format!("{}: tags updated", file));
    Ok(())
}

/// Remove tags from audio file(s)
pub fn command_remove(files: Vec<String>, formatter: &OutputFormatter) -> CliResult<()> {
    if files.is_empty() {
        return Err(CliError::Other("No files specified".to_string()));
    }

    for file_path in expand_files(&files) {
        match ferrotag::remove_tags(&file_path) {
            Ok(true) => formatter.print_success(&format!("{}: tag removed", file_path)),
            Ok(false) => formatter.print_info(&format!("{}: no tag to remove", file_path)),
            Err(e) => formatter.print_error(&format!("{}: {}", file_path, e)),
        }
    }

    Ok(())
}
