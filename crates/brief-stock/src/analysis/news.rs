//! Top-N news selection

use serde::{Deserialize, Serialize};

/// News item as delivered by a news collaborator; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNewsItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

/// Validated news item; absent fields are omitted when serialized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl NewsItem {
    fn from_raw(raw: RawNewsItem) -> Option<Self> {
        let item = Self {
            title: clean(raw.title),
            link: clean(raw.link),
            publisher: clean(raw.publisher),
        };

        if item.title.is_none() && item.link.is_none() && item.publisher.is_none() {
            None
        } else {
            Some(item)
        }
    }
}

fn clean(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Keeps the first `limit` usable items, in collaborator order
///
/// Items carrying no title, link or publisher are skipped and do not count
/// toward the limit.
pub fn summarize_news(items: Vec<RawNewsItem>, limit: usize) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter_map(NewsItem::from_raw)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, link: &str, publisher: &str) -> RawNewsItem {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawNewsItem {
            title: opt(title),
            link: opt(link),
            publisher: opt(publisher),
        }
    }

    #[test]
    fn test_takes_first_n_in_order() {
        let items = (1..=6)
            .map(|i| raw(&format!("Headline {i}"), "https://news.test/a", "Wire"))
            .collect();

        let news = summarize_news(items, 3);
        assert_eq!(news.len(), 3);
        assert_eq!(news[0].title.as_deref(), Some("Headline 1"));
        assert_eq!(news[2].title.as_deref(), Some("Headline 3"));
    }

    #[test]
    fn test_partial_fields_kept() {
        let news = summarize_news(vec![raw("Only a title", "", "")], 5);
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].link, None);
        assert_eq!(news[0].publisher, None);

        let json = serde_json::to_value(&news[0]).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Only a title"}));
    }

    #[test]
    fn test_blank_items_skipped() {
        let items = vec![
            RawNewsItem::default(),
            raw("  ", " ", ""),
            raw("Real", "", "Reuters"),
        ];

        let news = summarize_news(items, 1);
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].title.as_deref(), Some("Real"));
        assert_eq!(news[0].publisher.as_deref(), Some("Reuters"));
    }

    #[test]
    fn test_fewer_than_limit() {
        assert!(summarize_news(Vec::new(), 5).is_empty());
        assert_eq!(summarize_news(vec![raw("a", "", "")], 5).len(), 1);
    }

    #[test]
    fn test_raw_item_tolerates_missing_keys() {
        let item: RawNewsItem = serde_json::from_str(r#"{"link": "https://x.test"}"#).unwrap();
        assert_eq!(item.title, None);
        assert_eq!(item.link.as_deref(), Some("https://x.test"));
    }
}
