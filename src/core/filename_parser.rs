use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaType {
    TvShow { title: String, season: u32, episode: u32 },
    Movie { title: String, year: u32 },
    Generic { title: String },
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("filename regex is valid"))
}

pub fn parse_filename(filename: &str) -> MediaType {
    let stem =
        std::path::Path::new(filename).file_stem().and_then(|s| s.to_str()).unwrap_or(filename);

    parse_tv_show(stem).or_else(|| parse_movie(stem)).unwrap_or_else(|| MediaType::Generic {
        title: clean_title(stem),
    })
}

fn parse_tv_show(stem: &str) -> Option<MediaType> {
    static TV: OnceLock<Regex> = OnceLock::new();
    // "Show.Name.S01E02.1080p"
    let re = regex(&TV, r"(?i)^(.+?)[\.\s\-_\[\]]*s(\d{1,2})e(\d{1,3})");

    let captures = re.captures(stem)?;
    let title = clean_title(captures.get(1)?.as_str());
    let season = captures.get(2)?.as_str().parse().ok()?;
    let episode = captures.get(3)?.as_str().parse().ok()?;

    Some(MediaType::TvShow { title, season, episode })
}

fn parse_movie(stem: &str) -> Option<MediaType> {
    static MOVIE: OnceLock<Regex> = OnceLock::new();
    // "Movie Title (2016) [1080p]"
    let re = regex(&MOVIE, r"^(.+?)[\s\.\-_]*\((\d{4})\)");

    let captures = re.captures(stem)?;
    let title = clean_title(captures.get(1)?.as_str());
    let year = captures.get(2)?.as_str().parse().ok()?;

    Some(MediaType::Movie { title, year })
}

fn clean_title(title: &str) -> String {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();

    let cleaned = regex(&BRACKETS, r"[\[\(][^\]\)]*[\]\)]").replace_all(title, "");
    let cleaned = cleaned.replace(['.', '_', '-'], " ");
    let cleaned = regex(&SPACES, r"\s+").replace_all(&cleaned, " ").trim().to_string();

    let alphabetic: Vec<char> = cleaned.chars().filter(|c| c.is_alphabetic()).collect();
    let single_case = alphabetic.iter().all(|c| c.is_uppercase())
        || alphabetic.iter().all(|c| c.is_lowercase());

    if alphabetic.is_empty() || !single_case {
        return cleaned;
    }

    cleaned
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl MediaType {
    pub fn display_title(&self) -> String {
        match self {
            MediaType::TvShow { title, season, episode } => {
                format!("{} - S{:02}E{:02}", title, season, episode)
            }
            MediaType::Movie { title, year } => format!("{} ({})", title, year),
            MediaType::Generic { title } => title.clone(),
        }
    }
}

/// Base name for files derived from a video, e.g. the results export.
pub fn results_base_name(video_file_name: &str) -> String {
    parse_filename(video_file_name).display_title()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_parsing() {
        let tv = parse_filename("the.office.s02e03.720p.WEBRip.mkv");
        assert_eq!(
            tv,
            MediaType::TvShow { title: "The Office".to_string(), season: 2, episode: 3 }
        );

        let movie = parse_filename("Your Name (2016) [1080p] BluRay.mkv");
        assert_eq!(movie, MediaType::Movie { title: "Your Name".to_string(), year: 2016 });

        let generic = parse_filename("[Group] my_home_video.mp4");
        assert_eq!(generic, MediaType::Generic { title: "My Home Video".to_string() });
    }

    #[test]
    fn test_title_cleaning() {
        assert_eq!(clean_title("[Release] show.name_here"), "Show Name Here");
        assert_eq!(clean_title("SHOW_NAME"), "Show Name");
        assert_eq!(clean_title("Mixed.Case-Title"), "Mixed Case Title");
        assert_eq!(clean_title("2001"), "2001");
    }

    #[test]
    fn test_results_base_name() {
        assert_eq!(results_base_name("Breaking.Bad.S01E07.mp4"), "Breaking Bad - S01E07");
        assert_eq!(results_base_name("Arrival (2016).mkv"), "Arrival (2016)");
        assert_eq!(results_base_name("lecture.mp4"), "Lecture");
    }
}
