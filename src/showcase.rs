use serde::{Deserialize, Serialize};

/// One canned before/after comparison: the same prompt rendered by both
/// profiles, with the times each took.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowcaseItem {
    pub id: u32,
    pub prompt: String,
    pub fast_image: String,
    pub quality_image: String,
    pub fast_time: String,
    pub quality_time: String,
}

/// Static comparison gallery with wraparound navigation.
#[derive(Debug, Clone)]
pub struct Showcase {
    items: Vec<ShowcaseItem>,
    current: usize,
}

impl Default for Showcase {
    fn default() -> Self {
        Showcase::new(vec![
            ShowcaseItem {
                id: 1,
                prompt: "A cyberpunk robot cat sitting on top of a skyscraper in neon rain, high detail, 8k.".to_string(),
                fast_image: "https://picsum.photos/seed/cat_fast/800/800".to_string(),
                quality_image: "https://picsum.photos/seed/cat_slow/800/800".to_string(),
                fast_time: "1.2s".to_string(),
                quality_time: "5.8s".to_string(),
            },
            ShowcaseItem {
                id: 2,
                prompt: "Majestic mountain landscape in Ha Giang during rice harvest season, Van Gogh oil painting style.".to_string(),
                fast_image: "https://picsum.photos/seed/landscape_fast/800/800".to_string(),
                quality_image: "https://picsum.photos/seed/landscape_slow/800/800".to_string(),
                fast_time: "1.1s".to_string(),
                quality_time: "6.2s".to_string(),
            },
            ShowcaseItem {
                id: 3,
                prompt: "Portrait of a medieval dragon warrior, shiny iron armor, cinematic lighting.".to_string(),
                fast_image: "https://picsum.photos/seed/dragon_fast/800/800".to_string(),
                quality_image: "https://picsum.photos/seed/dragon_slow/800/800".to_string(),
                fast_time: "1.3s".to_string(),
                quality_time: "5.5s".to_string(),
            },
        ])
    }
}

impl Showcase {
    pub fn new(items: Vec<ShowcaseItem>) -> Self {
        Showcase { items, current: 0 }
    }

    pub fn items(&self) -> &[ShowcaseItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&ShowcaseItem> {
        self.items.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) -> Option<&ShowcaseItem> {
        if !self.items.is_empty() {
            self.current = if self.current == self.items.len() - 1 {
                0
            } else {
                self.current + 1
            };
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<&ShowcaseItem> {
        if !self.items.is_empty() {
            self.current = if self.current == 0 {
                self.items.len() - 1
            } else {
                self.current - 1
            };
        }
        self.current()
    }

    /// Jumps to an entry; out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> Option<&ShowcaseItem> {
        if index < self.items.len() {
            self.current = index;
        }
        self.current()
    }
}
