//! Offline reference library
//!
//! A small set of bundled farming guides readable without a connection.
//! Which guides the user has marked as downloaded is remembered in the
//! key-value store.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::i18n::Localized;
use crate::session::{GUIDES_KEY, KeyValueStore};

/// Guide category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideCategory {
    Calendar,
    DiseaseChart,
    General,
}

/// One bundled guide
#[derive(Debug)]
pub struct OfflineGuide {
    pub id: &'static str,
    pub category: GuideCategory,
    pub title: Localized,
    pub content: Localized,
}

pub const OFFLINE_GUIDES: &[OfflineGuide] = &[
    OfflineGuide {
        id: "guide_1",
        category: GuideCategory::Calendar,
        title: Localized {
            en: "Wheat Sowing Calendar",
            ur: "گندم کی کاشت کا کیلنڈر",
            pa: "کنک بیجن دا ٹائم",
        },
        content: Localized {
            en: "Best time: Nov 1 - Nov 30.\nSeed Rate: 50kg/acre.\nFertilizer: 1 Bag DAP at sowing.",
            ur: "بہترین وقت: 1 نومبر - 30 نومبر۔\nبیج کی شرح: 50 کلوگرام فی ایکڑ۔\nکھاد: بوائی کے وقت 1 بوری ڈی اے پی۔",
            pa: "سب توں اچھا ٹائم: 1 توں 30 نومبر۔\nبیج: 50 کلو فی ایکڑ۔\nکھاد: 1 بوری ڈی اے پی۔",
        },
    },
    OfflineGuide {
        id: "guide_2",
        category: GuideCategory::DiseaseChart,
        title: Localized {
            en: "Common Rice Diseases",
            ur: "چاول کی عام بیماریاں",
            pa: "چاول دیاں بیماریاں",
        },
        content: Localized {
            en: "1. Blast: Brown spots on leaves.\n2. Bacterial Blight: Yellowing leaf tips.\nUse Copper Fungicide for Blight.",
            ur: "1. بلاسٹ: پتوں پر بھورے دھبے۔\n2. بیکٹیریل بلائٹ: پتوں کے سروں کا پیلا ہونا۔\nبلائٹ کے لیے کاپر فنگسائڈ استعمال کریں۔",
            pa: "1. بلاسٹ: پتیاں تے بھورے نشان۔\n2. بلائٹ: پتیاں دے کنارے پیلے۔\nکاپر والی دوائی ورتو۔",
        },
    },
];

/// Tracks which guides the user downloaded for offline use
pub struct GuideLibrary {
    store: Arc<dyn KeyValueStore>,
    downloaded: HashSet<String>,
}

impl GuideLibrary {
    /// Load the downloaded set from the store; unreadable state means an
    /// empty set.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let downloaded = match store.get(GUIDES_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<String>>(&blob) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!("Failed to parse downloaded guide list: {}", e);
                    HashSet::new()
                }
            },
            Ok(None) => HashSet::new(),
            Err(e) => {
                warn!("Failed to load downloaded guide list: {}", e);
                HashSet::new()
            }
        };

        Self { store, downloaded }
    }

    pub fn guides(&self) -> &'static [OfflineGuide] {
        OFFLINE_GUIDES
    }

    pub fn is_downloaded(&self, id: &str) -> bool {
        self.downloaded.contains(id)
    }

    /// Mark/unmark a guide as downloaded; returns the new state
    pub fn toggle_download(&mut self, id: &str) -> bool {
        let now_downloaded = if self.downloaded.contains(id) {
            self.downloaded.remove(id);
            false
        } else {
            self.downloaded.insert(id.to_string());
            true
        };
        self.persist();
        now_downloaded
    }

    fn persist(&self) {
        let mut ids: Vec<&str> = self.downloaded.iter().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        match serde_json::to_string(&ids) {
            Ok(blob) => {
                if let Err(e) = self.store.set(GUIDES_KEY, &blob) {
                    warn!("Failed to persist downloaded guide list: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize downloaded guide list: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::session::MemoryKvStore;

    #[test]
    fn test_guides_are_localized() {
        assert_eq!(OFFLINE_GUIDES.len(), 2);
        let guide = &OFFLINE_GUIDES[0];
        assert_eq!(guide.title.get(Language::English), "Wheat Sowing Calendar");
        assert_ne!(
            guide.content.get(Language::Urdu),
            guide.content.get(Language::English)
        );
    }

    #[test]
    fn test_toggle_download() {
        let store = Arc::new(MemoryKvStore::new());
        let mut library = GuideLibrary::new(store);

        assert!(!library.is_downloaded("guide_1"));
        assert!(library.toggle_download("guide_1"));
        assert!(library.is_downloaded("guide_1"));
        assert!(!library.toggle_download("guide_1"));
        assert!(!library.is_downloaded("guide_1"));
    }

    #[test]
    fn test_downloads_survive_reload() {
        let store = Arc::new(MemoryKvStore::new());
        {
            let mut library = GuideLibrary::new(store.clone());
            library.toggle_download("guide_2");
        }

        let library = GuideLibrary::new(store);
        assert!(library.is_downloaded("guide_2"));
        assert!(!library.is_downloaded("guide_1"));
    }

    #[test]
    fn test_corrupt_state_means_empty_set() {
        let store = Arc::new(MemoryKvStore::new());
        store.set(GUIDES_KEY, "{broken").unwrap();

        let library = GuideLibrary::new(store);
        assert!(!library.is_downloaded("guide_1"));
    }
}
