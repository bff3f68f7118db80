use url::Url;

use crate::domain::{EntryContent, FeedEntry};

/// Characters that delimit tokens within a feed line.
const SEPARATORS: &[char] = &[' ', '\t', ',', ';', '|'];

/// Line-oriented feed text → typed entries.
///
/// Each non-empty line classifies independently, by priority:
/// two or more http(s) URLs → image pair, exactly one → image with
/// thumbnail = original, a lone non-http(s) URL-shaped token → invalid link,
/// anything else → plain text.
#[derive(Clone, Default)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Pure and total: never fails, empty or whitespace-only input yields an
    /// empty list.
    pub fn parse(&self, text: &str) -> Vec<FeedEntry> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| FeedEntry::new(self.classify(line)))
            .collect()
    }

    fn classify(&self, line: &str) -> EntryContent {
        let tokens: Vec<&str> = line
            .split(SEPARATORS)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        // Display validity is scheme+host only; file extensions say nothing
        // about whether a URL serves an image.
        let valid: Vec<(&str, Url)> = tokens
            .iter()
            .filter_map(|t| Url::parse(t).ok().map(|u| (*t, u)))
            .filter(|(_, u)| is_displayable(u))
            .collect();

        match valid.as_slice() {
            [(_, first), (_, second), ..] => EntryContent::Image {
                thumbnail: first.clone(),
                original: second.clone(),
                caption: caption(line, &valid),
            },
            [(_, only)] => EntryContent::Image {
                thumbnail: only.clone(),
                original: only.clone(),
                caption: caption(line, &valid),
            },
            [] => match tokens.iter().find(|t| Url::parse(t).is_ok()) {
                Some(token) => EntryContent::InvalidLink((*token).to_string()),
                None => EntryContent::Text(line.to_string()),
            },
        }
    }
}

fn is_displayable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}

/// The line with every matched URL token removed, trimmed of whitespace and
/// leftover separators; `None` when nothing remains.
fn caption(line: &str, matched: &[(&str, Url)]) -> Option<String> {
    let mut caption = line.to_string();
    for (token, _) in matched {
        caption = caption.replace(token, "");
    }
    let trimmed = caption.trim_matches(SEPARATORS);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<FeedEntry> {
        FeedParser::new().parse(text)
    }

    fn expect_image(entry: &FeedEntry) -> (&Url, &Url, Option<&str>) {
        match &entry.content {
            EntryContent::Image {
                thumbnail,
                original,
                caption,
            } => (thumbnail, original, caption.as_deref()),
            other => panic!("expected image entry, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_whitespace_only_input() {
        assert!(parse("   \n  \n   ").is_empty());
    }

    #[test]
    fn test_single_url_no_caption() {
        let input = "https://example.com/image.png";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);

        let (thumbnail, original, caption) = expect_image(&entries[0]);
        assert_eq!(thumbnail.as_str(), input);
        assert_eq!(original.as_str(), input);
        assert_eq!(caption, None);
    }

    #[test]
    fn test_single_url_without_extension_is_still_an_image() {
        let input = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQqNZNZvSkBzt5rPSmUNYKNG1MpuC6h1LppdQ";
        let entries = parse(input);
        assert_eq!(entries.len(), 1);

        let (thumbnail, _, caption) = expect_image(&entries[0]);
        assert_eq!(thumbnail.as_str(), input);
        assert_eq!(caption, None);
    }

    #[test]
    fn test_two_urls() {
        let entries = parse("https://example.com/thumb.jpg https://example.com/original.jpg");
        assert_eq!(entries.len(), 1);

        let (thumbnail, original, caption) = expect_image(&entries[0]);
        assert_eq!(thumbnail.as_str(), "https://example.com/thumb.jpg");
        assert_eq!(original.as_str(), "https://example.com/original.jpg");
        assert_eq!(caption, None);
    }

    #[test]
    fn test_single_url_with_caption() {
        let entries = parse("https://example.com/image.jpg Beautiful landscape");
        let (_, _, caption) = expect_image(&entries[0]);
        assert_eq!(caption, Some("Beautiful landscape"));
    }

    #[test]
    fn test_two_urls_with_trailing_caption() {
        let entries =
            parse("https://example.com/thumb.jpg https://example.com/original.jpg Amazing photo");
        let (thumbnail, original, caption) = expect_image(&entries[0]);
        assert_eq!(thumbnail.as_str(), "https://example.com/thumb.jpg");
        assert_eq!(original.as_str(), "https://example.com/original.jpg");
        assert_eq!(caption, Some("Amazing photo"));
    }

    #[test]
    fn test_separators_all_yield_the_same_two_url_parse() {
        let expected = parse("https://a.com/t.jpg https://b.com/o.jpg");
        for sep in [" ", "\t", ",", ";", "|", " , ", " | "] {
            let entries = parse(&format!("https://a.com/t.jpg{sep}https://b.com/o.jpg"));
            assert_eq!(entries.len(), 1, "separator {sep:?}");
            assert_eq!(
                entries[0].content, expected[0].content,
                "separator {sep:?}"
            );
        }
    }

    #[test]
    fn test_non_http_scheme_is_invalid_link() {
        let entries = parse("ftp://example.com/image.jpg");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].content,
            EntryContent::InvalidLink("ftp://example.com/image.jpg".into())
        );
    }

    #[test]
    fn test_plain_word_is_text() {
        let entries = parse("lalala");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, EntryContent::Text("lalala".into()));
    }

    #[test]
    fn test_query_string_retained_verbatim() {
        let input = "https://example.com/images?q=tbn:abc&size=large#frag";
        let entries = parse(input);
        let (thumbnail, _, _) = expect_image(&entries[0]);
        assert_eq!(thumbnail.as_str(), input);
    }

    #[test]
    fn test_line_trimmed_before_classification() {
        let entries = parse("  https://example.com/image.jpg  ");
        let (_, _, caption) = expect_image(&entries[0]);
        assert_eq!(caption, None);
    }

    #[test]
    fn test_parse_is_deterministic_per_line() {
        let input = "https://a.com/1.jpg\nlalala\nftp://x/y";
        let a = parse(input);
        let b = parse(input);
        let contents_a: Vec<_> = a.iter().map(|e| &e.content).collect();
        let contents_b: Vec<_> = b.iter().map(|e| &e.content).collect();
        assert_eq!(contents_a, contents_b);
    }

    #[test]
    fn test_ids_are_unique_within_a_parse() {
        let entries = parse("https://a.com/1.jpg\nhttps://a.com/1.jpg");
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_real_world_mixed_feed() {
        let input = "\
https://img1.akspic.ru/attachments/crops/5/6/4/3/7/173465/173465-glacier-1440x2960.jpg
https://www.gstatic.com/404
https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQqNZNZvSkBzt5rPSmUNYKNG1MpuC6h1LppdQ
lalala
https://upload.wikimedia.org/wikipedia/commons/4/43/ESO-VLT-Laser-phot-33a-07.jpg";
        let entries = parse(input);
        assert_eq!(entries.len(), 5);

        let images = entries.iter().filter(|e| e.is_image()).count();
        let texts = entries
            .iter()
            .filter(|e| matches!(e.content, EntryContent::Text(_)))
            .count();
        assert_eq!(images, 4);
        assert_eq!(texts, 1);
    }
}
