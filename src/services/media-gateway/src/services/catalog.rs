//! Built-in article catalog used by catalog-mode recommendations and as the
//! recommendation fallback

use once_cell::sync::Lazy;
use reqwest::Url;
use serde::{Deserialize, Serialize};

static IMAGE_SERVICE: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://image.pollinations.ai/prompt/").expect("image service URL is valid")
});

const IMAGE_QUERY: &str = "width=600&height=400&nologo=true";
pub const DEFAULT_RECOMMENDATIONS: usize = 3;

/// A recommended article as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub source: String,
    pub time: String,
    pub snippet: String,
    pub image: String,
    pub image_prompt: String,
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: u64,
    pub category: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub time: &'static str,
    pub image_prompt: &'static str,
}

impl CatalogEntry {
    pub fn to_article(&self) -> Article {
        Article {
            id: self.id,
            title: self.title.to_string(),
            category: self.category.to_string(),
            source: self.source.to_string(),
            time: self.time.to_string(),
            snippet: format!("Recommended because you like {}...", self.category),
            image: image_url(self.image_prompt),
            image_prompt: self.image_prompt.to_string(),
        }
    }

    /// One line of the catalog listing embedded in prompts
    pub fn listing(&self) -> String {
        format!("ID {}: {} ({})", self.id, self.title, self.category)
    }
}

pub static CATALOG: [CatalogEntry; 12] = [
    CatalogEntry {
        id: 101,
        category: "Technology",
        title: "SpaceX Starship Successfully Reaches Orbit",
        source: "TechCrunch",
        time: "1h ago",
        image_prompt: "SpaceX rocket launching into space realistic",
    },
    CatalogEntry {
        id: 102,
        category: "Technology",
        title: "Apple Vision Pro 2: Leaked Features Revealed",
        source: "The Verge",
        time: "3h ago",
        image_prompt: "Futuristic VR headset apple style",
    },
    CatalogEntry {
        id: 103,
        category: "Technology",
        title: "Python 4.0: Rumors vs Reality",
        source: "RealPython",
        time: "5h ago",
        image_prompt: "Python programming code on computer screen matrix style",
    },
    CatalogEntry {
        id: 104,
        category: "Sports",
        title: "Argentina Wins Copa America in Thrilling Final",
        source: "ESPN",
        time: "2h ago",
        image_prompt: "Lionel Messi holding trophy stadium crowd",
    },
    CatalogEntry {
        id: 105,
        category: "Sports",
        title: "Cricket World Cup 2027 Hosts Announced",
        source: "ICC News",
        time: "6h ago",
        image_prompt: "Cricket stadium panorama with flags",
    },
    CatalogEntry {
        id: 106,
        category: "Finance",
        title: "Bitcoin Hits New All-Time High at $80k",
        source: "Bloomberg",
        time: "30m ago",
        image_prompt: "Bitcoin golden coin chart background",
    },
    CatalogEntry {
        id: 107,
        category: "Finance",
        title: "Global Recession Fears: What Experts Say",
        source: "Financial Times",
        time: "4h ago",
        image_prompt: "Stock market chart crashing red arrows",
    },
    CatalogEntry {
        id: 108,
        category: "Health",
        title: "New Vaccine Shows Promise Against Malaria",
        source: "WHO News",
        time: "1d ago",
        image_prompt: "Scientist in lab looking at microscope",
    },
    CatalogEntry {
        id: 109,
        category: "Health",
        title: "Top 10 Foods for Better Mental Health",
        source: "Healthline",
        time: "8h ago",
        image_prompt: "Healthy food fruits and vegetables on table",
    },
    CatalogEntry {
        id: 110,
        category: "Politics",
        title: "UN Summit Discusses Climate Change Action",
        source: "BBC News",
        time: "2h ago",
        image_prompt: "United Nations flags waving blue sky",
    },
    CatalogEntry {
        id: 111,
        category: "Gaming",
        title: "GTA VI Trailer Breaks YouTube Records",
        source: "IGN",
        time: "12h ago",
        image_prompt: "Vice City style sunset sports car",
    },
    CatalogEntry {
        id: 112,
        category: "Gaming",
        title: "Esports Now Officially an Olympic Sport",
        source: "Kotaku",
        time: "1d ago",
        image_prompt: "Esports arena gamers with headsets",
    },
];

/// Image-generation URL for a free-text prompt. The prompt becomes a single
/// percent-encoded path segment.
pub fn image_url(prompt: &str) -> String {
    let mut url = IMAGE_SERVICE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(prompt);
    }
    url.set_query(Some(IMAGE_QUERY));
    url.to_string()
}

/// Catalog articles whose ids appear in `ids`, in catalog order
pub fn select(ids: &[u64]) -> Vec<Article> {
    CATALOG
        .iter()
        .filter(|entry| ids.contains(&entry.id))
        .map(CatalogEntry::to_article)
        .collect()
}

pub fn default_recommendations() -> Vec<Article> {
    CATALOG
        .iter()
        .take(DEFAULT_RECOMMENDATIONS)
        .map(CatalogEntry::to_article)
        .collect()
}

pub fn listing() -> String {
    CATALOG
        .iter()
        .map(CatalogEntry::listing)
        .collect::<Vec<_>>()
        .join("\n")
}
