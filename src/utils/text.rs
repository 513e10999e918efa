use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static INVALID_ID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\-_]").unwrap());

/// Replaces every character outside `[a-zA-Z0-9-_]` with `_` so the title can
/// be embedded in an image-host public id.
pub fn sanitize_title(title: &str) -> String {
    INVALID_ID_CHARS.replace_all(title, "_").to_string()
}

/// Builds the public id for one uploaded gallery photo. `seq` keeps ids
/// unique when several photos are uploaded within the same millisecond.
pub fn photo_public_id(folder: &str, sanitized_title: &str, seq: usize) -> String {
    format!(
        "{}_{}_photo_{}_{}",
        folder,
        sanitized_title,
        chrono::Utc::now().timestamp_millis(),
        seq
    )
}

/// Parses a comma-separated list of gallery indices ("2,0,5") into a sorted
/// ascending list. Empty or missing input yields an empty list; anything
/// non-numeric is a validation error.
pub fn parse_index_csv(field: &str, input: Option<&str>) -> Result<Vec<usize>> {
    let Some(raw) = input else { return Ok(Vec::new()) };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut indices = raw
        .split(',')
        .map(|part| {
            part.trim().parse::<usize>().map_err(|_| {
                AppError::Validation(format!("{} must be a comma-separated list of indices", field))
            })
        })
        .collect::<Result<Vec<usize>>>()?;
    indices.sort_unstable();
    Ok(indices)
}

/// Descriptions may arrive as repeated form fields or as one comma-separated
/// value; a lone value containing commas is split and trimmed.
pub fn split_descriptions(mut values: Vec<String>) -> Vec<String> {
    if values.len() == 1 && values[0].contains(',') {
        return values[0].split(',').map(|d| d.trim().to_string()).collect();
    }
    for v in &mut values {
        *v = v.trim().to_string();
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Launch Day!"), "Launch_Day_");
        assert_eq!(sanitize_title("already-safe_Title9"), "already-safe_Title9");
        assert_eq!(sanitize_title("spaces and % signs"), "spaces_and___signs");
        assert_eq!(sanitize_title(""), "");
    }

    #[test]
    fn test_photo_public_id_embeds_folder_and_title() {
        let id = photo_public_id("gallery", "My_Title", 3);
        assert!(id.starts_with("gallery_My_Title_photo_"));
        assert!(id.ends_with("_3"));
    }

    #[test]
    fn test_parse_index_csv() {
        assert_eq!(parse_index_csv("removeIndices", None).unwrap(), Vec::<usize>::new());
        assert_eq!(parse_index_csv("removeIndices", Some("")).unwrap(), Vec::<usize>::new());
        assert_eq!(parse_index_csv("removeIndices", Some("2,0,5")).unwrap(), vec![0, 2, 5]);
        assert_eq!(parse_index_csv("removeIndices", Some(" 1 , 3 ")).unwrap(), vec![1, 3]);
        assert!(parse_index_csv("removeIndices", Some("1,x")).is_err());
        assert!(parse_index_csv("removeIndices", Some("-1")).is_err());
    }

    #[test]
    fn test_split_descriptions() {
        assert_eq!(
            split_descriptions(vec!["first, second".to_string()]),
            vec!["first", "second"]
        );
        assert_eq!(
            split_descriptions(vec!["one, with comma".to_string(), "two".to_string()]),
            vec!["one, with comma", "two"]
        );
        assert_eq!(split_descriptions(vec![" padded ".to_string()]), vec!["padded"]);
        assert_eq!(split_descriptions(Vec::new()), Vec::<String>::new());
    }
}
